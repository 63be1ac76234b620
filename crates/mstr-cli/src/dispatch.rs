//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands either work offline (config, help) or need a logged-in
//! [`Session`].

use mstr_api_rs::session::Session;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::commands::dataset::DatasetOptions;
use crate::commands::filter::FilterOptions;
use crate::commands::instance::InstanceOptions;
use crate::commands::object::ObjectOptions;
use crate::commands::search::SearchOptions;
use crate::commands::{self, CommandContext, Result};

/// Trait for commands that can be executed without a session.
pub trait NoAuthCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that run against an open session.
#[allow(async_fn_in_trait)]
pub trait AuthCommand {
    async fn execute(&self, ctx: &CommandContext, session: &mut Session) -> Result<()>;
}

/// Commands that don't require a session.
pub enum NoAuthDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Help,
}

impl<'a> NoAuthDispatch<'a> {
    /// Try to create a no-auth dispatch from the CLI command.
    /// Returns None if the command requires a session.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl NoAuthCommand for NoAuthDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Help => {
                if !ctx.quiet {
                    println!("mstr - MicroStrategy Library CLI");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that require a session.
#[derive(Debug)]
pub enum AuthDispatch {
    Projects,
    Object(ObjectOptions),
    Search(SearchOptions),
    Dataset(DatasetOptions),
    Filter(FilterOptions),
    Instance(InstanceOptions),
}

impl AuthDispatch {
    /// Creates a dispatch from the CLI command, or None for offline commands.
    pub fn from_cli(cli: &Cli) -> Option<Self> {
        let dispatch = match cli.command.as_ref()? {
            Commands::Projects => Self::Projects,
            Commands::Object { id, r#type } => Self::Object(ObjectOptions {
                id: id.clone(),
                object_type: r#type.clone(),
            }),
            Commands::Search {
                name,
                root,
                r#match,
                types,
            } => Self::Search(SearchOptions {
                name: name.clone(),
                root: root.clone(),
                search_type: (*r#match).into(),
                types: types.clone(),
            }),
            Commands::Dataset { id, subtype } => Self::Dataset(DatasetOptions {
                id: id.clone(),
                subtype: subtype.clone(),
            }),
            Commands::Filter {
                expression,
                dataset,
                subtype,
            } => Self::Filter(FilterOptions {
                expression: expression.clone(),
                dataset: dataset.clone(),
                subtype: subtype.clone(),
            }),
            Commands::Instance {
                id,
                subtype,
                filter,
            } => Self::Instance(InstanceOptions {
                id: id.clone(),
                subtype: subtype.clone(),
                filter: filter.clone(),
            }),
            Commands::Config { .. } => return None,
        };
        Some(dispatch)
    }
}

impl AuthCommand for AuthDispatch {
    async fn execute(&self, ctx: &CommandContext, session: &mut Session) -> Result<()> {
        match self {
            Self::Projects => commands::projects::execute(ctx, session),
            Self::Object(opts) => commands::object::execute(ctx, opts, session).await,
            Self::Search(opts) => commands::search::execute(ctx, opts, session).await,
            Self::Dataset(opts) => commands::dataset::execute(ctx, opts, session).await,
            Self::Filter(opts) => commands::filter::execute(ctx, opts, session).await,
            Self::Instance(opts) => commands::instance::execute(ctx, opts, session).await,
        }
    }
}
