//! Command implementations for the mstr CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod config;
pub mod dataset;
pub mod filter;
pub mod instance;
pub mod object;
pub mod projects;
pub mod search;
pub mod session;

use mstr_api_rs::models::{DssEnum, ObjectInfo, ObjectSubtype, ObjectType};

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter parsing error.
    #[error("filter error: {0}")]
    Filter(#[from] mstr_filter_rs::FilterError),

    /// API error.
    #[error("API error: {0}")]
    Api(#[from] mstr_api_rs::error::Error),

    /// No project matched the requested default.
    #[error("project '{identifier}' not found{}", suggestion_hint(.suggestion))]
    ProjectNotFound {
        identifier: String,
        suggestion: Option<String>,
    },

    /// Invalid command-line input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default()
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color,
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}

/// Parses a DSS enumeration given by short name or numeric value.
pub(crate) fn parse_dss<T: DssEnum>(what: &str, input: &str) -> Result<T> {
    let parsed = match input.trim().parse::<i32>() {
        Ok(value) => T::from_value(value),
        Err(_) => T::from_name(input),
    };
    parsed.ok_or_else(|| CommandError::InvalidArgument(format!("unknown {what} '{input}'")))
}

/// Builds the object reference of a report or cube.
pub(crate) fn dataset_object(id: &str, subtype: Option<&str>) -> Result<ObjectInfo> {
    let mut object = ObjectInfo::new(id, ObjectType::ReportDefinition);
    object.subtype = match subtype {
        Some(s) => Some(parse_dss::<ObjectSubtype>("subtype", s)?),
        None => Some(ObjectSubtype::ReportGrid),
    };
    Ok(object)
}
