//! Command-line interface for appliance-aid.
//!
//! This module provides the CLI structure and command handlers for the
//! `applaid` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DiagnoseCommand, HistoryCommand, SortOrderArg, TechniciansCommand,
};

/// applaid - Diagnose home appliance problems
///
/// Describes an appliance issue to the Gemini API, renders the returned
/// troubleshooting advice in the terminal, and can search for repair
/// technicians near your location.
#[derive(Debug, Parser)]
#[command(name = "applaid")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Diagnose an appliance problem (interactive wizard)
    Diagnose(DiagnoseCommand),

    /// List the appliances that can be diagnosed
    Appliances,

    /// Find repair technicians near your location
    Technicians(TechniciansCommand),

    /// Browse stored diagnoses
    #[command(subcommand)]
    History(HistoryCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "applaid");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: true,
            command: Command::Appliances,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: false,
            command: Command::Appliances,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose() {
        let cli = Cli {
            config: None,
            verbose: 1,
            quiet: false,
            command: Command::Appliances,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_trace() {
        let cli = Cli {
            config: None,
            verbose: 2,
            quiet: false,
            command: Command::Appliances,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_diagnose_with_flags() {
        let args = vec![
            "applaid",
            "diagnose",
            "--appliance",
            "washer",
            "--description",
            "will not drain",
            "--no-save",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Diagnose(cmd) => {
                assert_eq!(cmd.appliance.as_deref(), Some("washer"));
                assert_eq!(cmd.description.as_deref(), Some("will not drain"));
                assert!(cmd.no_save);
                assert!(!cmd.find_technicians);
            }
            other => panic!("expected diagnose, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_diagnose_bare() {
        let args = vec!["applaid", "diagnose"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Diagnose(cmd) => {
                assert!(cmd.appliance.is_none());
                assert!(cmd.description.is_none());
                assert!(cmd.photo.is_none());
            }
            other => panic!("expected diagnose, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_appliances() {
        let args = vec!["applaid", "appliances"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Appliances));
    }

    #[test]
    fn test_parse_technicians() {
        let args = vec![
            "applaid",
            "technicians",
            "--appliance",
            "fridge appliances",
            "--lat",
            "37.77",
            "--lng",
            "-122.41",
            "--sort",
            "name",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Technicians(cmd) => {
                assert_eq!(cmd.appliance, "fridge appliances");
                assert_eq!(cmd.lat, Some(37.77));
                assert_eq!(cmd.lng, Some(-122.41));
                assert_eq!(cmd.sort, SortOrderArg::Name);
                assert!(!cmd.json);
            }
            other => panic!("expected technicians, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_technicians_requires_appliance() {
        let args = vec!["applaid", "technicians"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_history_list() {
        let args = vec!["applaid", "history", "list", "--limit", "5"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::History(HistoryCommand::List { limit: 5 })
        ));
    }

    #[test]
    fn test_parse_history_clear_requires_flag_for_yes() {
        let args = vec!["applaid", "history", "clear"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::History(HistoryCommand::Clear { yes: false })
        ));
    }

    #[test]
    fn test_parse_config_path() {
        let args = vec!["applaid", "config", "path"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["applaid", "-c", "/custom/config.toml", "appliances"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let args = vec!["applaid", "-v", "appliances"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["applaid", "-q", "appliances"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }
}
