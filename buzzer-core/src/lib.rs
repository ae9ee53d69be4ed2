//! Debounce and arbitration engine for the quiz buzzer board.
//!
//! This crate is `no_std`-compatible so the same engine backs the Raspberry Pi
//! controller and the host-side tests. It never touches hardware directly:
//! input levels are passed in, indicator lights are written through an
//! `embedded-hal` I2C bus, and audio is behind the [`AudioCue`] trait.
//!
//! Two scheduling models are supported:
//! - [`PollingArbiter`]: one scan loop samples every button each tick.
//! - [`InterruptArbiter`]: edge callbacks arrive from any number of threads.
//!
//! Both funnel into the same [`ArbitrationGate`], which lets exactly one
//! confirmed press through at a time and clears every tracker around it.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod arbiter;
pub mod debounce;
pub mod edge;
pub mod expander;
pub mod gate;
pub mod registry;
pub mod sequencer;
pub mod timing;

pub use arbiter::{InterruptArbiter, PollingArbiter};
pub use debounce::{Debouncer, Level, Phase, Rearm};
pub use edge::{Edge, EdgeDebouncer};
pub use expander::Pcf8575Bank;
pub use gate::{ArbitrationGate, Trackers};
pub use registry::{Button, ButtonId, Indicator, Registry, RegistryError, NUM_BUTTONS, QUIZ_BOARD};
pub use sequencer::{ActionSequencer, AudioCue, Indicators};
pub use timing::{Instant, Timing};
