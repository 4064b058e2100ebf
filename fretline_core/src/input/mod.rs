pub mod events;

use self::events::{FrameInput, LaneEvent};
use crate::chart::LANE_COUNT;
use crossbeam_channel::{unbounded, Receiver, Sender};

pub struct InputQueue {
    sender: Sender<LaneEvent>,
    receiver: Receiver<LaneEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Pushes an event into the queue.
    /// This can be called from multiple threads (e.g. input polling thread).
    pub fn push(&self, event: LaneEvent) {
        let _ = self.sender.send(event);
    }

    /// Non-blocking. Returns None if queue is empty.
    pub fn pop(&self) -> Option<LaneEvent> {
        self.receiver.try_recv().ok()
    }

    pub fn sender(&self) -> Sender<LaneEvent> {
        self.sender.clone()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns queued key edges into the per-frame held/pressed/released flags the
/// gameplay engine consumes.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    held: [bool; LANE_COUNT],
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.held = [false; LANE_COUNT];
    }

    /// Applies one edge. A press on a lane that is already down and a release
    /// on a lane that is already up are ignored.
    pub fn apply(&mut self, event: LaneEvent, frame: &mut FrameInput) {
        let i = event.lane.index();
        if event.pressed && !self.held[i] {
            self.held[i] = true;
            frame.lanes[i].just_pressed = true;
        } else if !event.pressed && self.held[i] {
            self.held[i] = false;
            frame.lanes[i].just_released = true;
        }
    }

    /// Drains everything queued so far into one frame.
    pub fn next_frame(&mut self, queue: &InputQueue) -> FrameInput {
        let mut frame = FrameInput::default();
        while let Some(event) = queue.pop() {
            self.apply(event, &mut frame);
        }
        for (lane, held) in frame.lanes.iter_mut().zip(self.held) {
            lane.held = held;
        }
        frame
    }
}
