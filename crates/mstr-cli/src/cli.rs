//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the mstr CLI.

use clap::{Parser, Subcommand, ValueEnum};
use mstr_api_rs::models::SearchType;

/// mstr - A command-line client for MicroStrategy Library
#[derive(Parser, Debug)]
#[command(name = "mstr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Library REST API base URL, e.g. https://host/MicroStrategyLibrary/api
    #[arg(long, global = true, env = "MSTR_URL")]
    pub url: Option<String>,

    /// User to log in as
    #[arg(long, global = true, env = "MSTR_USERNAME")]
    pub username: Option<String>,

    /// Password (prompted for when not given)
    #[arg(long, global = true, env = "MSTR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Default project by ID, alias, or name
    #[arg(short, long, global = true, env = "MSTR_PROJECT")]
    pub project: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List active projects
    #[command(alias = "p")]
    Projects,

    /// Show object metadata
    Object {
        /// Object ID
        id: String,

        /// Object type, by name (e.g. Folder) or numeric value
        #[arg(short, long, default_value = "ReportDefinition")]
        r#type: String,
    },

    /// Search for objects
    #[command(alias = "s")]
    Search {
        /// Name pattern
        name: Option<String>,

        /// Folder ID to search under
        #[arg(long)]
        root: Option<String>,

        /// How the name is matched
        #[arg(short, long, value_enum, default_value = "contains")]
        r#match: MatchMode,

        /// Object types to search for (repeatable)
        #[arg(short, long = "type")]
        types: Vec<String>,
    },

    /// Show the attributes and metrics of a report or cube
    #[command(alias = "d")]
    Dataset {
        /// Report or cube ID
        id: String,

        /// Object subtype, e.g. ReportCube (defaults to a grid report)
        #[arg(long)]
        subtype: Option<String>,
    },

    /// Print the view filter payload for an expression
    Filter {
        /// Filter expression, e.g. "( Region@DESC == 'Europe' )"
        expression: String,

        /// Report or cube whose forms the expression names
        #[arg(short, long)]
        dataset: String,

        /// Object subtype of the dataset
        #[arg(long)]
        subtype: Option<String>,
    },

    /// Run a report or cube and print its rows
    #[command(alias = "i")]
    Instance {
        /// Report or cube ID
        id: String,

        /// Object subtype of the dataset
        #[arg(long)]
        subtype: Option<String>,

        /// Filter expression applied to the instance
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

/// Name matching mode for searches
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    Contains,
    ContainsAnyWord,
    BeginWith,
    BeginWithPhrase,
    Exactly,
    EndWith,
}

impl From<MatchMode> for SearchType {
    fn from(mode: MatchMode) -> Self {
        match mode {
            MatchMode::Contains => SearchType::Contains,
            MatchMode::ContainsAnyWord => SearchType::ContainsAnyWord,
            MatchMode::BeginWith => SearchType::BeginWith,
            MatchMode::BeginWithPhrase => SearchType::BeginWithPhrase,
            MatchMode::Exactly => SearchType::Exactly,
            MatchMode::EndWith => SearchType::EndWith,
        }
    }
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}
