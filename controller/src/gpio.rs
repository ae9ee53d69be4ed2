//! Button input lines on the Raspberry Pi header.
//!
//! Every button is a momentary switch to ground on its own BCM GPIO line,
//! read with the internal pull-up enabled: low = pressed, high = released.

use std::sync::Arc;

use buzzer_core::{ButtonId, Edge, Instant, Level, Registry};
use log::{debug, trace};
use rppal::gpio::{self, Gpio, InputPin, Trigger};
use thiserror::Error;

use crate::clock::instant_at;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("GPIO controller unavailable")]
    Gpio(#[source] gpio::Error),
    #[error("button {button}: cannot claim GPIO {line}")]
    Claim {
        button: ButtonId,
        line: u8,
        #[source]
        source: gpio::Error,
    },
    #[error("button {button}: cannot attach {direction} interrupt on GPIO {line}")]
    Interrupt {
        button: ButtonId,
        line: u8,
        direction: &'static str,
        #[source]
        source: gpio::Error,
    },
}

/// The claimed input pins, in registry order.
///
/// Dropping this releases the lines and detaches any interrupt callbacks.
pub struct Inputs<const N: usize> {
    pins: Vec<(ButtonId, InputPin)>,
}

impl<const N: usize> Inputs<N> {
    /// Claim every button's line as a pulled-up input.
    pub fn claim(registry: &Registry<N>) -> Result<Self, SetupError> {
        let gpio = Gpio::new().map_err(SetupError::Gpio)?;
        let pins = registry
            .iter()
            .map(|button| {
                let pin = gpio.get(button.input).map_err(|source| SetupError::Claim {
                    button: button.id,
                    line: button.input,
                    source,
                })?;
                debug!("button {}: GPIO {} as pulled-up input", button.id, button.input);
                Ok((button.id, pin.into_input_pullup()))
            })
            .collect::<Result<Vec<_>, SetupError>>()?;
        Ok(Self { pins })
    }

    /// Read every line once.
    pub fn sample(&self) -> [Level; N] {
        std::array::from_fn(|i| level(self.pins[i].1.read()))
    }

    /// Route both edges of every line to `handler(index, edge, at)`.
    ///
    /// `at` is the kernel's timestamp of the edge on `CLOCK_MONOTONIC`, not
    /// the time the callback got to run. rppal runs each pin's callback on
    /// its own thread, so `handler` is called concurrently for different
    /// buttons.
    pub fn attach<F>(&mut self, handler: F) -> Result<(), SetupError>
    where
        F: Fn(usize, Edge, Instant) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        for (index, (button, pin)) in self.pins.iter_mut().enumerate() {
            let handler = Arc::clone(&handler);
            let button = *button;
            pin.set_async_interrupt(Trigger::Both, None, move |event| {
                let edge = match event.trigger {
                    Trigger::FallingEdge => Edge::Falling,
                    Trigger::RisingEdge => Edge::Rising,
                    _ => return,
                };
                let at = instant_at(event.timestamp);
                trace!("button {}: {:?} edge at {}us", button, edge, at.as_micros());
                handler(index, edge, at);
            })
            .map_err(|source| SetupError::Interrupt {
                button,
                line: pin.pin(),
                direction: "falling/rising",
                source,
            })?;
        }
        Ok(())
    }
}

fn level(raw: gpio::Level) -> Level {
    match raw {
        gpio::Level::Low => Level::Low,
        gpio::Level::High => Level::High,
    }
}
