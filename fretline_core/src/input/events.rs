use crate::chart::{Lane, LANE_COUNT};

/// The three per-frame signals for one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaneInput {
    pub held: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    pub lanes: [LaneInput; LANE_COUNT],
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn lane(&self, lane: Lane) -> LaneInput {
        self.lanes[lane.index()]
    }

    /// Lane goes down this frame.
    pub fn press(mut self, lane: Lane) -> Self {
        let input = &mut self.lanes[lane.index()];
        input.held = true;
        input.just_pressed = true;
        self
    }

    /// Lane stays down.
    pub fn hold(mut self, lane: Lane) -> Self {
        self.lanes[lane.index()].held = true;
        self
    }

    /// Lane comes up this frame.
    pub fn release(mut self, lane: Lane) -> Self {
        let input = &mut self.lanes[lane.index()];
        input.held = false;
        input.just_released = true;
        self
    }
}

/// A key edge reported by an input polling thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneEvent {
    pub lane: Lane,
    pub pressed: bool,
}
