pub mod conductor;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use atomic_float::AtomicF64;

pub use conductor::Conductor;

/// Read-only source of "now", in seconds on a monotonic axis.
///
/// Sources are shared between engines; each engine samples them through its
/// own [`Conductor`], so no clock state is written by more than one engine.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall clock, measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to. Clones share the same time value, so a
/// test can hold one clone and step the engines that read the other.
#[derive(Debug, Clone)]
pub struct ManualClock {
    seconds: Arc<AtomicF64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            seconds: Arc::new(AtomicF64::new(0.0)),
        }
    }

    pub fn set(&self, seconds: f64) {
        self.seconds.store(seconds, Ordering::Release);
    }

    pub fn advance(&self, seconds: f64) {
        self.seconds.fetch_add(seconds, Ordering::AcqRel);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> f64 {
        self.seconds.load(Ordering::Acquire)
    }
}
