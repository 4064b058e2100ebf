use std::sync::Arc;

use super::TimeSource;

/// One engine's view of session time: seconds since its own zero point.
pub struct Conductor {
    source: Arc<dyn TimeSource>,
    origin: Option<f64>,
}

impl Conductor {
    pub fn new(source: Arc<dyn TimeSource>) -> Self {
        Self {
            source,
            origin: None,
        }
    }

    /// Captures the zero point from the source's current reading.
    pub fn start(&mut self) {
        self.origin = Some(self.source.now());
    }

    /// Uses a zero point that was sampled elsewhere on the same source.
    pub fn start_at(&mut self, origin: f64) {
        self.origin = Some(origin);
    }

    pub fn stop(&mut self) {
        self.origin = None;
    }

    pub fn is_running(&self) -> bool {
        self.origin.is_some()
    }

    /// Seconds since the zero point, or 0 when stopped.
    pub fn time(&self) -> f64 {
        match self.origin {
            Some(origin) => self.source.now() - origin,
            None => 0.0,
        }
    }

    pub fn source(&self) -> &Arc<dyn TimeSource> {
        &self.source
    }
}
