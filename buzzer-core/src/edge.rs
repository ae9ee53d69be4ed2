//! Per-button debounce logic for the interrupt model.
//!
//! A falling edge (button down) stamps the hold start; a rising edge (button
//! up) measures how long the button was held. Holds of at least `min_down`
//! are confirmed at release. Edges arriving while the gate is busy are
//! lockout: a press is not recorded and a release is discarded.
//!
//! State lives in one atomic per button so callbacks on different threads
//! never need a lock to record or consume a hold.

use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;

use crate::gate::Trackers;
use crate::timing::Instant;

/// Direction of an input transition. Buttons are active low.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    /// High to low: button pressed.
    Falling,
    /// Low to high: button released.
    Rising,
}

/// Zero means "not held"; otherwise the stored value is `micros + 1`.
const NOT_HELD: u64 = 0;

const fn encode(t: Instant) -> u64 {
    t.as_micros().saturating_add(1)
}

const fn decode(raw: u64) -> Option<Instant> {
    match raw {
        NOT_HELD => None,
        raw => Some(Instant::from_micros(raw - 1)),
    }
}

pub struct EdgeDebouncer<const N: usize> {
    holds: [AtomicU64; N],
    min_down: Duration,
}

impl<const N: usize> EdgeDebouncer<N> {
    pub const fn new(min_down: Duration) -> Self {
        Self {
            holds: [const { AtomicU64::new(NOT_HELD) }; N],
            min_down,
        }
    }

    pub fn pressed_since(&self, index: usize) -> Option<Instant> {
        self.holds
            .get(index)
            .and_then(|hold| decode(hold.load(Ordering::Acquire)))
    }

    /// Button went down. Ignored while `locked`.
    pub fn press(&self, index: usize, now: Instant, locked: bool) {
        if locked {
            return;
        }
        if let Some(hold) = self.holds.get(index) {
            hold.store(encode(now), Ordering::Release);
        }
    }

    /// Button came up. Consumes the hold and returns `true` if it lasted at
    /// least `min_down` and the gate was not `locked`.
    pub fn release(&self, index: usize, now: Instant, locked: bool) -> bool {
        let Some(hold) = self.holds.get(index) else {
            return false;
        };
        // Take the hold even when locked, so it cannot be confirmed twice.
        let Some(since) = decode(hold.swap(NOT_HELD, Ordering::AcqRel)) else {
            return false;
        };
        !locked && now.saturating_duration_since(since) >= self.min_down
    }

    /// Wipe every hold. Takes `&self` because callbacks share the table.
    pub fn clear(&self) {
        for hold in &self.holds {
            hold.store(NOT_HELD, Ordering::Release);
        }
    }
}

impl<const N: usize> Trackers for &EdgeDebouncer<N> {
    fn clear_all(&mut self) {
        self.clear();
    }
}
