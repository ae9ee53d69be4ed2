//! The process-wide exclusivity gate.
//!
//! A single busy flag, claimed with a compare-and-swap. Whoever claims it
//! clears every tracker, runs the winner's action and clears the trackers
//! again before the flag drops. Callers that find the gate busy get `false`
//! and nothing else happens.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// A table of per-button debounce state that can be wiped in one go.
pub trait Trackers {
    fn clear_all(&mut self);
}

pub struct ArbitrationGate {
    busy: AtomicBool,
    /// Bumped on every successful claim, wrapping.
    rounds: AtomicU32,
}

/// Reopens the gate when dropped, including when the action unwinds.
struct Claim<'a>(&'a AtomicBool);

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ArbitrationGate {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            rounds: AtomicU32::new(0),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Number of wins claimed so far. Comparing two readings tells whether a
    /// win started in between, even if it has already finished.
    pub fn round(&self) -> u32 {
        self.rounds.load(Ordering::Acquire)
    }

    /// Try to declare a winner.
    ///
    /// Returns `true` if this caller claimed the gate, in which case
    /// `trackers` has been cleared, `action` has run to completion and
    /// `trackers` has been cleared once more. Returns `false` without side
    /// effects if another winner is in progress.
    pub fn try_win<T, F>(&self, trackers: &mut T, action: F) -> bool
    where
        T: Trackers + ?Sized,
        F: FnOnce(),
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        let _claim = Claim(&self.busy);
        self.rounds.fetch_add(1, Ordering::AcqRel);

        trackers.clear_all();
        action();
        // Holds that started during the action must not stack onto the next round.
        trackers.clear_all();
        true
    }
}

impl Default for ArbitrationGate {
    fn default() -> Self {
        Self::new()
    }
}
