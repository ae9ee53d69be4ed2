//! Monotonic timestamps and the tunable timing constants.

use core::time::Duration;

/// A monotonic clock reading in microseconds from an arbitrary origin.
///
/// The origin is whatever the caller's clock considers zero; only differences
/// between two readings from the same clock are meaningful.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(u64);

impl Instant {
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000))
    }

    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, or zero if `earlier` is later.
    pub const fn saturating_duration_since(self, earlier: Instant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

/// Timing constants for debouncing, scanning and the startup light walk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timing {
    /// A button must stay down at least this long to count as a press.
    pub min_down: Duration,
    /// Delay between two scans in the polling model.
    pub poll_interval: Duration,
    /// How long each indicator stays lit during the self-test.
    pub self_test_dwell: Duration,
}

impl Timing {
    pub const DEFAULT: Timing = Timing {
        min_down: Duration::from_millis(100),
        poll_interval: Duration::from_micros(500),
        self_test_dwell: Duration::from_millis(500),
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_since_saturates_backwards() {
        let a = Instant::from_millis(10);
        let b = Instant::from_millis(25);
        assert_eq!(b.saturating_duration_since(a), Duration::from_millis(15));
        assert_eq!(a.saturating_duration_since(b), Duration::ZERO);
    }

    #[test]
    fn defaults_match_board_constants() {
        let t = Timing::default();
        assert_eq!(t.min_down, Duration::from_millis(100));
        assert_eq!(t.poll_interval, Duration::from_micros(500));
        assert_eq!(t.self_test_dwell, Duration::from_millis(500));
    }
}
