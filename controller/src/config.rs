//! Command-line tunables shared by every subcommand.

use std::path::PathBuf;
use std::time::Duration;

use buzzer_core::{Rearm, Timing};
use clap::{Args, ValueEnum};

const DEFAULT: Timing = Timing::DEFAULT;

#[derive(Args, Debug)]
pub struct Settings {
    /// Minimum hold time before a press counts
    #[arg(long, global = true, value_name = "MS", default_value_t = DEFAULT.min_down.as_millis() as u64)]
    pub min_down_ms: u64,

    /// Delay between two input scans in poll mode
    #[arg(long, global = true, value_name = "US", default_value_t = DEFAULT.poll_interval.as_micros() as u64)]
    pub poll_interval_us: u64,

    /// How long each light stays on during the self-test
    #[arg(long, global = true, value_name = "MS", default_value_t = DEFAULT.self_test_dwell.as_millis() as u64)]
    pub dwell_ms: u64,

    /// I2C bus the indicator expanders sit on (/dev/i2c-N)
    #[arg(long, global = true, value_name = "N", default_value_t = 1)]
    pub i2c_bus: u8,

    /// Directory holding button_<id>.wav cues
    #[arg(long, global = true, value_name = "DIR", default_value = "sounds")]
    pub sound_dir: PathBuf,

    /// Program used to play a cue; receives the file path as its only argument
    #[arg(long, global = true, value_name = "CMD", default_value = "aplay")]
    pub player: String,

    /// When buttons become eligible again after a win
    #[arg(long, global = true, value_enum, default_value_t = RearmArg::AfterRelease)]
    pub rearm: RearmArg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RearmArg {
    /// Straight away; a button held through the action fires again
    Immediate,
    /// Only after the button has been let go
    AfterRelease,
}

impl From<RearmArg> for Rearm {
    fn from(arg: RearmArg) -> Self {
        match arg {
            RearmArg::Immediate => Rearm::Immediate,
            RearmArg::AfterRelease => Rearm::AfterRelease,
        }
    }
}

impl Settings {
    pub fn timing(&self) -> Timing {
        Timing {
            min_down: Duration::from_millis(self.min_down_ms),
            poll_interval: Duration::from_micros(self.poll_interval_us),
            self_test_dwell: Duration::from_millis(self.dwell_ms),
        }
    }

    pub fn rearm(&self) -> Rearm {
        self.rearm.into()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        settings: Settings,
    }

    #[test]
    fn defaults_match_core_timing() {
        let h = Harness::parse_from(["quizbuzz"]);
        assert_eq!(h.settings.timing(), Timing::DEFAULT);
        assert_eq!(h.settings.rearm(), Rearm::AfterRelease);
        assert_eq!(h.settings.i2c_bus, 1);
    }

    #[test]
    fn overrides_are_applied() {
        let h = Harness::parse_from([
            "quizbuzz",
            "--min-down-ms",
            "60",
            "--poll-interval-us",
            "1000",
            "--dwell-ms",
            "0",
            "--rearm",
            "immediate",
        ]);
        let t = h.settings.timing();
        assert_eq!(t.min_down, Duration::from_millis(60));
        assert_eq!(t.poll_interval, Duration::from_millis(1));
        assert_eq!(t.self_test_dwell, Duration::ZERO);
        assert_eq!(h.settings.rearm(), Rearm::Immediate);
    }
}
