//! Debouncer, gate and sequencer wired together for each scheduling model.

use core::cell::RefCell;

use critical_section::Mutex;
use log::trace;

use crate::debounce::{Debouncer, Level, Rearm};
use crate::edge::{Edge, EdgeDebouncer};
use crate::gate::ArbitrationGate;
use crate::registry::{ButtonId, Registry};
use crate::sequencer::{ActionSequencer, AudioCue, Indicators};
use crate::timing::{Instant, Timing};

/// Single-threaded scan loop arbitration.
///
/// Call [`tick`](Self::tick) once per poll interval with a fresh sample of
/// every input. Nothing here is shared, so no locking is involved beyond the
/// gate itself.
pub struct PollingArbiter<const N: usize, I, A> {
    registry: Registry<N>,
    debouncer: Debouncer<N>,
    gate: ArbitrationGate,
    sequencer: ActionSequencer<I, A>,
}

impl<const N: usize, I: Indicators, A: AudioCue> PollingArbiter<N, I, A> {
    pub fn new(registry: Registry<N>, timing: &Timing, rearm: Rearm, sequencer: ActionSequencer<I, A>) -> Self {
        Self {
            registry,
            debouncer: Debouncer::new(timing.min_down, rearm),
            gate: ArbitrationGate::new(),
            sequencer,
        }
    }

    pub fn debouncer(&self) -> &Debouncer<N> {
        &self.debouncer
    }

    /// Process one scan. Returns the winner if this scan produced one; the
    /// winner's action has already run by the time this returns.
    pub fn tick(&mut self, levels: &[Level; N], now: Instant) -> Option<ButtonId> {
        let index = self.debouncer.scan(levels, now)?;
        let button = *self.registry.get(index)?;

        let Self { debouncer, gate, sequencer, .. } = self;
        if gate.try_win(debouncer, || sequencer.run(&button)) {
            Some(button.id)
        } else {
            trace!("button {} confirmed while gate busy", button.id);
            None
        }
    }
}

/// Edge-callback arbitration, safe to drive from many threads at once.
///
/// Share it behind an `Arc` (or a `static`) and call
/// [`on_edge`](Self::on_edge) from every input callback. Releases are handled
/// one at a time inside a critical section that also covers the winner's
/// action, so a hold consumed just before someone else's win can never claim
/// the gate after it reopens. Presses only take the critical section when the
/// gate is free, and are dropped if a win started after they were observed.
pub struct InterruptArbiter<const N: usize, I, A> {
    registry: Registry<N>,
    edges: EdgeDebouncer<N>,
    gate: ArbitrationGate,
    sequencer: Mutex<RefCell<ActionSequencer<I, A>>>,
}

impl<const N: usize, I: Indicators, A: AudioCue> InterruptArbiter<N, I, A> {
    pub fn new(registry: Registry<N>, timing: &Timing, sequencer: ActionSequencer<I, A>) -> Self {
        Self {
            registry,
            edges: EdgeDebouncer::new(timing.min_down),
            gate: ArbitrationGate::new(),
            sequencer: Mutex::new(RefCell::new(sequencer)),
        }
    }

    pub fn edges(&self) -> &EdgeDebouncer<N> {
        &self.edges
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Handle one edge on button `index`. Returns the winner if this edge
    /// completed a winning hold; its action has run by the time this returns.
    pub fn on_edge(&self, index: usize, edge: Edge, now: Instant) -> Option<ButtonId> {
        match edge {
            Edge::Falling => {
                let round = self.gate.round();
                if self.gate.is_busy() {
                    return None;
                }
                // A win that ran while we waited for the section has already
                // reset every hold; this press predates it and is dropped too.
                critical_section::with(|_| {
                    let locked = self.gate.is_busy() || self.gate.round() != round;
                    self.edges.press(index, now, locked)
                });
                None
            }
            Edge::Rising => critical_section::with(|cs| {
                if !self.edges.release(index, now, self.gate.is_busy()) {
                    return None;
                }
                let button = *self.registry.get(index)?;
                let mut edges = &self.edges;
                let won = self
                    .gate
                    .try_win(&mut edges, || self.sequencer.borrow_ref_mut(cs).run(&button));
                if won {
                    Some(button.id)
                } else {
                    trace!("button {} lost the race", button.id);
                    None
                }
            }),
        }
    }
}
