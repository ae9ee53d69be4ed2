//! The light-and-sound action for a winning button.

use core::fmt::Debug;

use log::{info, warn};

use crate::registry::{Button, ButtonId, Indicator};

/// Switchable indicator lights.
///
/// Switching one indicator never affects another indicator's bits, and
/// switching an indicator to the state it is already in is harmless.
pub trait Indicators {
    type Error: Debug;

    fn set(&mut self, indicator: Indicator, on: bool) -> Result<(), Self::Error>;

    fn activate(&mut self, indicator: Indicator) -> Result<(), Self::Error> {
        self.set(indicator, true)
    }

    fn deactivate(&mut self, indicator: Indicator) -> Result<(), Self::Error> {
        self.set(indicator, false)
    }
}

/// Fire-and-forget sound playback keyed by button.
///
/// `play` may block until playback has been launched but must not wait for
/// it to finish.
pub trait AudioCue {
    type Error: Debug;

    fn play(&mut self, button: ButtonId) -> Result<(), Self::Error>;
}

pub struct ActionSequencer<I, A> {
    indicators: I,
    audio: A,
}

impl<I: Indicators, A: AudioCue> ActionSequencer<I, A> {
    pub const fn new(indicators: I, audio: A) -> Self {
        Self { indicators, audio }
    }

    pub fn indicators(&mut self) -> &mut I {
        &mut self.indicators
    }

    pub fn audio(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Light up `button`, play its cue, then switch its lights off again.
    ///
    /// Failures are logged and the sequence carries on; a stuck light or a
    /// missing sound must not hold up the next round.
    pub fn run(&mut self, button: &Button) {
        info!("button {} wins", button.id);

        self.switch(button.id, "self", button.self_indicator, true);
        self.switch(button.id, "map", button.map_indicator, true);
        if let Err(e) = self.audio.play(button.id) {
            warn!("button {}: audio cue failed: {:?}", button.id, e);
        }
        self.switch(button.id, "self", button.self_indicator, false);
        self.switch(button.id, "map", button.map_indicator, false);
    }

    fn switch(&mut self, id: ButtonId, which: &str, indicator: Indicator, on: bool) {
        if let Err(e) = self.indicators.set(indicator, on) {
            warn!(
                "button {}: failed to switch {} indicator {} (group {:#04x}, mask {:#06x}): {:?}",
                id,
                which,
                if on { "on" } else { "off" },
                indicator.group,
                indicator.mask,
                e
            );
        }
    }
}
