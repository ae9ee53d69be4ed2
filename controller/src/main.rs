mod audio;
mod clock;
mod config;
mod gpio;
mod run;

use anyhow::Result;
use buzzer_core::Registry;
use clap::{Parser, Subcommand};
use env_logger::Env;

use crate::config::Settings;
use crate::run::Mode;

#[derive(Parser)]
#[command(name = "quizbuzz")]
#[command(about = "Quiz buzzer controller: first confirmed press wins")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the self-test, then arbitrate button presses until killed
    Run {
        /// How button inputs are observed
        #[arg(long, value_enum, default_value_t = Mode::Poll)]
        mode: Mode,
        /// Start arbitrating without walking the indicator lights first
        #[arg(long)]
        skip_self_test: bool,
    },
    /// Walk every indicator light once and exit
    SelfTest,
    /// Print the button wiring table
    Board,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Run { mode, skip_self_test } => run::run(&cli.settings, mode, skip_self_test)?,
        Command::SelfTest => {
            let registry = Registry::quiz_board();
            let mut lights = run::open_lights(&cli.settings)?;
            run::self_test(&registry, &mut lights, &cli.settings)?;
        }
        Command::Board => run::print_board(&Registry::quiz_board()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults_to_polling_with_self_test() {
        let cli = Cli::parse_from(["quizbuzz", "run"]);
        match cli.command {
            Command::Run { mode, skip_self_test } => {
                assert_eq!(mode, Mode::Poll);
                assert!(!skip_self_test);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = Cli::parse_from(["quizbuzz", "run", "--mode", "interrupt", "--min-down-ms", "80"]);
        assert!(matches!(cli.command, Command::Run { mode: Mode::Interrupt, .. }));
        assert_eq!(cli.settings.min_down_ms, 80);
    }
}
