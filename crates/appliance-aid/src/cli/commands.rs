//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::technician::SortOrder;

/// Diagnose command arguments.
///
/// Every field is optional; the wizard prompts for anything not supplied.
#[derive(Debug, Args)]
pub struct DiagnoseCommand {
    /// Appliance to troubleshoot, by id or name (see `applaid appliances`)
    #[arg(short, long)]
    pub appliance: Option<String>,

    /// Description of the issue
    #[arg(short, long)]
    pub description: Option<String>,

    /// Attach a photo of the problem (PNG, JPG, GIF, or WEBP, up to 10 MiB)
    #[arg(short, long, value_name = "FILE")]
    pub photo: Option<PathBuf>,

    /// Latitude for the technician search (overrides configuration)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude for the technician search (overrides configuration)
    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Search for technicians after the diagnosis without asking
    #[arg(long)]
    pub find_technicians: bool,

    /// Do not record the diagnosis in the history database
    #[arg(long)]
    pub no_save: bool,
}

/// Technicians command arguments.
#[derive(Debug, Args)]
pub struct TechniciansCommand {
    /// Appliance needing service, by id or name (see `applaid appliances`)
    #[arg(short, long)]
    pub appliance: String,

    /// Latitude for the search (overrides configuration)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude for the search (overrides configuration)
    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Show only technicians whose name or address contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Sort order for the list
    #[arg(short, long, value_enum, default_value = "relevance")]
    pub sort: SortOrderArg,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// History commands.
#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List recent diagnoses
    List {
        /// Maximum number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show a stored diagnosis in full
    Show {
        /// Entry ID (see `applaid history list`)
        id: i64,
    },

    /// Search stored diagnoses by description or diagnosis text
    Search {
        /// The search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete a stored diagnosis
    Delete {
        /// Entry ID to delete
        id: i64,
    },

    /// Delete all stored diagnoses
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Sort order argument for technician listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrderArg {
    /// The order the search returned them in
    #[default]
    Relevance,
    /// Alphabetical by name
    Name,
}

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Relevance => Self::Relevance,
            SortOrderArg::Name => Self::Name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_arg_conversion() {
        assert_eq!(
            SortOrder::from(SortOrderArg::Relevance),
            SortOrder::Relevance
        );
        assert_eq!(SortOrder::from(SortOrderArg::Name), SortOrder::Name);
    }

    #[test]
    fn test_sort_order_arg_default() {
        assert_eq!(SortOrderArg::default(), SortOrderArg::Relevance);
    }

    #[test]
    fn test_diagnose_command_debug() {
        let cmd = DiagnoseCommand {
            appliance: Some("washer".to_string()),
            description: None,
            photo: None,
            lat: None,
            lng: None,
            find_technicians: false,
            no_save: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("appliance"));
        assert!(debug_str.contains("washer"));
    }

    #[test]
    fn test_technicians_command_debug() {
        let cmd = TechniciansCommand {
            appliance: "oven".to_string(),
            lat: Some(37.77),
            lng: Some(-122.41),
            filter: None,
            sort: SortOrderArg::Name,
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("oven"));
        assert!(debug_str.contains("Name"));
    }

    #[test]
    fn test_history_command_debug() {
        let cmd = HistoryCommand::Show { id: 7 };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_sort_order_arg_clone() {
        let arg = SortOrderArg::Name;
        let cloned = arg;
        assert_eq!(arg, cloned);
    }
}
