//! Per-button debounce logic for the polling model.
//!
//! Each scan compares the sampled level with the tracked phase. A button that
//! goes down records when it did; a button that is still down on a later scan
//! and has been down for at least `min_down` is a confirmed press. Anything
//! released earlier is contact bounce and is forgotten.

use core::time::Duration;

use crate::gate::Trackers;
use crate::timing::Instant;

/// Raw logic level of an input line. Buttons pull their line low.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub const fn is_pressed(self) -> bool {
        matches!(self, Level::Low)
    }
}

impl From<bool> for Level {
    /// `true` is a high line.
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Tracked state of one button.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Not yet seen released. Never eligible to win.
    Unknown,
    Released,
    Pressed { since: Instant },
}

impl Phase {
    pub const fn pressed_since(self) -> Option<Instant> {
        match self {
            Phase::Pressed { since } => Some(since),
            _ => None,
        }
    }
}

/// What the trackers fall back to once a win has been handled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Rearm {
    /// Every button is considered released and may start a new hold at once.
    /// A button held through the action fires again after another `min_down`.
    Immediate,
    /// Every button goes back to `Unknown` and must be seen released first,
    /// so a button held through the action cannot fire again.
    #[default]
    AfterRelease,
}

pub struct Debouncer<const N: usize> {
    phases: [Phase; N],
    min_down: Duration,
    rearm: Rearm,
}

impl<const N: usize> Debouncer<N> {
    /// All buttons start `Unknown`: one already held at power-on has to be
    /// released before it counts.
    pub const fn new(min_down: Duration, rearm: Rearm) -> Self {
        Self {
            phases: [Phase::Unknown; N],
            min_down,
            rearm,
        }
    }

    pub fn phase(&self, index: usize) -> Option<Phase> {
        self.phases.get(index).copied()
    }

    pub fn phases(&self) -> &[Phase; N] {
        &self.phases
    }

    /// Feed one sample for one button. Returns `true` on a confirmed hold.
    pub fn observe(&mut self, index: usize, level: Level, now: Instant) -> bool {
        let Some(phase) = self.phases.get_mut(index) else {
            return false;
        };

        match (*phase, level.is_pressed()) {
            (Phase::Unknown, false) => {
                *phase = Phase::Released;
                false
            }
            (Phase::Unknown, true) => false,
            (Phase::Released, true) => {
                *phase = Phase::Pressed { since: now };
                false
            }
            (Phase::Released, false) => false,
            (Phase::Pressed { .. }, false) => {
                // Released before the threshold: bounce.
                *phase = Phase::Released;
                false
            }
            (Phase::Pressed { since }, true) => {
                now.saturating_duration_since(since) >= self.min_down
            }
        }
    }

    /// Scan all buttons in index order and return the first confirmed hold.
    ///
    /// Buttons after the confirmed one are not sampled this tick, which makes
    /// the lowest index win a tie.
    pub fn scan(&mut self, levels: &[Level; N], now: Instant) -> Option<usize> {
        (0..N).find(|&index| self.observe(index, levels[index], now))
    }
}

impl<const N: usize> Trackers for Debouncer<N> {
    fn clear_all(&mut self) {
        let phase = match self.rearm {
            Rearm::Immediate => Phase::Released,
            Rearm::AfterRelease => Phase::Unknown,
        };
        self.phases = [phase; N];
    }
}
