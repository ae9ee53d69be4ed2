use std::time::Duration;

use buzzer_core::Instant;

/// Convert a span since some monotonic origin into a core timestamp.
///
/// Used both for this process's clock and for rppal's interrupt event
/// timestamps, which count from the kernel's `CLOCK_MONOTONIC` origin.
pub fn instant_at(elapsed: Duration) -> Instant {
    Instant::from_micros(u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX))
}

/// Monotonic microsecond clock anchored at process start.
#[derive(Copy, Clone, Debug)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self { origin: std::time::Instant::now() }
    }

    pub fn now(&self) -> Instant {
        instant_at(self.origin.elapsed())
    }
}
