//! Application orchestration and command routing.
//!
//! Parses command-line arguments, sets up logging and the config file, and
//! delegates to the command handlers.

use crate::commands::{self, VisualizeArgs};
use crate::{config, logging, setup};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

/// Siri-style animated waveform of your microphone, in the terminal
#[derive(Parser)]
#[command(name = "siriwave")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "Siri-style animated waveform of your microphone, in the terminal.\n\nDEFAULT COMMAND:\n    If no command is given, 'visualize' runs. Its options can be used\n    without naming it.\n\nEXAMPLES:\n    # Visualize the default microphone\n    $ siriwave\n\n    # Try it without a microphone\n    $ siriwave --demo\n\n    # Eight blue waves from input device 2\n    $ siriwave -d 2 -w 8 -c '#3fa9f5'\n\n    # Edit configuration file\n    $ siriwave config")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/siriwave/siriwave.toml\n    Logs:               ~/.local/state/siriwave/siriwave.log.*"
)]
struct Cli {
    #[command(flatten)]
    visualize: VisualizeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the live waveform (default)
    ///
    /// Press Space to freeze the input, Escape/q to quit.
    #[command(visible_alias = "v")]
    Visualize(VisualizeArgs),

    /// Open configuration file in your preferred editor
    ///
    /// Uses $EDITOR or falls back to nano/vi. The default file is
    /// created first if it does not exist.
    #[command(visible_alias = "c")]
    Config,

    /// List available audio input devices
    ///
    /// Shows device IDs, names, and configurations to pick a device for
    /// --device or siriwave.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries
    ///
    /// Display the last 50 lines of the most recent log file.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   siriwave completions bash > siriwave.bash
    ///   siriwave completions zsh > _siriwave
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If the default config file cannot be written
/// - If command execution fails
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that print to the terminal and need no logging or config
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "siriwave", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => return commands::handle_list_devices(),
        Some(Commands::Logs) => return commands::handle_logs(),
        _ => {}
    }

    logging::init_logging()?;

    let config_path = config::get_config_path()?;
    if setup::ensure_config(&config_path)? {
        tracing::info!("First run: created {}", config_path.display());
    }

    match cli.command {
        None => commands::handle_visualize(cli.visualize),
        Some(Commands::Visualize(args)) => commands::handle_visualize(args),
        Some(Commands::Config) => commands::handle_config(),
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_takes_visualize_flags() {
        let cli = Cli::try_parse_from(["siriwave", "--demo", "-w", "7", "-c", "#ff0000"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.visualize.demo);
        assert_eq!(cli.visualize.waves, Some(7));
        assert_eq!(cli.visualize.color.map(|c| c.red), Some(255));
    }

    #[test]
    fn test_explicit_visualize_subcommand() {
        let cli = Cli::try_parse_from(["siriwave", "v", "--fps", "30"]).unwrap();
        match cli.command {
            Some(Commands::Visualize(args)) => assert_eq!(args.fps, Some(30)),
            _ => panic!("expected visualize"),
        }
    }

    #[test]
    fn test_bad_color_is_usage_error() {
        assert!(Cli::try_parse_from(["siriwave", "--color", "blue"]).is_err());
    }
}
