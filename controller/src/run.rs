//! Startup sequence and the two arbitration loops.

use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use buzzer_core::{
    self_test, ActionSequencer, InterruptArbiter, Pcf8575Bank, PollingArbiter, Registry, NUM_BUTTONS,
};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rppal::hal::Delay;
use rppal::i2c::I2c;

use crate::audio::ExternalPlayer;
use crate::clock::MonotonicClock;
use crate::config::Settings;
use crate::gpio::Inputs;

pub type Lights = Pcf8575Bank<I2c>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Scan every input on a fixed interval
    Poll,
    /// React to edge interrupts on each input
    Interrupt,
}

pub fn open_lights(settings: &Settings) -> Result<Lights> {
    let i2c = I2c::with_bus(settings.i2c_bus)
        .with_context(|| format!("opening /dev/i2c-{}", settings.i2c_bus))?;
    debug!("indicator expanders on /dev/i2c-{}", settings.i2c_bus);
    Ok(Pcf8575Bank::new(i2c))
}

/// Walk every indicator once, showing progress on the terminal.
pub fn self_test(registry: &Registry<NUM_BUTTONS>, lights: &mut Lights, settings: &Settings) -> Result<()> {
    let pb = ProgressBar::new(registry.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} buttons")
            .context("building progress bar")?
            .progress_chars("=> "),
    );
    pb.set_message("Self-test");

    self_test::run(registry, lights, &mut Delay::new(), settings.timing().self_test_dwell, |button| {
        pb.set_position(button.id.index() as u64);
        pb.set_message(format!("Self-test: button {}", button.id));
    });
    pb.finish_with_message("Self-test done");
    Ok(())
}

/// Claim the inputs, run the self-test, then arbitrate until killed.
pub fn run(settings: &Settings, mode: Mode, skip_self_test: bool) -> Result<()> {
    let registry = Registry::quiz_board();
    let timing = settings.timing();

    let mut inputs = Inputs::claim(&registry).context("configuring button inputs")?;
    let mut lights = open_lights(settings)?;

    if skip_self_test {
        info!("self-test skipped");
        // Lamps left on by a previous run would otherwise stay lit.
        self_test::all_off(&registry, &mut lights);
    } else {
        self_test(&registry, &mut lights, settings)?;
    }

    let player = ExternalPlayer::new(settings.player.clone(), settings.sound_dir.clone());
    let missing = player.check_cues(&registry);
    if missing > 0 {
        info!("{} of {} buttons will play no sound", missing, registry.len());
    }
    let sequencer = ActionSequencer::new(lights, player);

    info!(
        "arbitrating {} buttons ({:?} mode, min down {:?})",
        registry.len(),
        mode,
        timing.min_down
    );

    match mode {
        Mode::Poll => {
            let mut arbiter = PollingArbiter::new(registry, &timing, settings.rearm(), sequencer);
            let clock = MonotonicClock::start();
            loop {
                arbiter.tick(&inputs.sample(), clock.now());
                thread::sleep(timing.poll_interval);
            }
        }
        Mode::Interrupt => {
            let arbiter = Arc::new(InterruptArbiter::new(registry, &timing, sequencer));
            inputs
                .attach(move |index, edge, at| {
                    arbiter.on_edge(index, edge, at);
                })
                .context("attaching button interrupts")?;
            // Callbacks run on rppal's threads; `inputs` must stay alive.
            loop {
                thread::park();
            }
        }
    }
}

/// Print the wiring table.
pub fn print_board(registry: &Registry<NUM_BUTTONS>) {
    println!("{:>6}  {:>4}  {:<11}  {:<11}", "button", "gpio", "self", "map");
    for button in registry.iter() {
        println!(
            "{:>6}  {:>4}  {:#04x}/{:#06x}  {:#04x}/{:#06x}",
            button.id,
            button.input,
            button.self_indicator.group,
            button.self_indicator.mask,
            button.map_indicator.group,
            button.map_indicator.mask,
        );
    }
}
