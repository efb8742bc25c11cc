use std::{cell::Cell, fmt, time::Instant};

pub trait Clock {
    type Instant: fmt::Debug + Copy;

    fn now(&self) -> Self::Instant;
    fn seconds_elapsed(&self, start: Self::Instant, end: Self::Instant) -> f32;
}

pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn seconds_elapsed(&self, start: Self::Instant, end: Self::Instant) -> f32 {
        let duration = end.duration_since(start);
        duration.as_secs_f32()
    }
}

/// Every reading is one frame after the previous one.
pub struct FixedStep {
    step: f32,
    frame: Cell<u64>,
}

impl FixedStep {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            frame: Cell::new(0),
        }
    }
}

impl Clock for FixedStep {
    type Instant = u64;

    fn now(&self) -> Self::Instant {
        let frame = self.frame.get();
        self.frame.set(frame + 1);
        frame
    }

    fn seconds_elapsed(&self, start: Self::Instant, end: Self::Instant) -> f32 {
        end.saturating_sub(start) as f32 * self.step
    }
}
