use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::load_config;
use commands::session::{connect, disconnect, ConnectionSettings};
use commands::{CommandContext, CommandError};
use dispatch::{AuthCommand, AuthDispatch, NoAuthCommand, NoAuthDispatch};
use mstr_api_rs::error::Error as ApiClientError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&error_json).unwrap_or_else(|_| error_json.to_string())
                );
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Logs to stderr at `warn`, or `info` with `--verbose`; `RUST_LOG` overrides.
fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    if let Some(dispatch) = NoAuthDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    let Some(dispatch) = AuthDispatch::from_cli(cli) else {
        return Ok(());
    };

    let settings = ConnectionSettings::resolve(cli, load_config()?)?;
    let mut session = connect(settings).await?;
    let result = dispatch.execute(&ctx, &mut session).await;
    disconnect(&mut session).await;
    result
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Api(e) if e.is_auth() => "AUTH_ERROR",
        CommandError::Api(ApiClientError::InvalidSession) => "SESSION_ERROR",
        CommandError::Api(_) => "API_ERROR",
        CommandError::ProjectNotFound { .. } => "PROJECT_NOT_FOUND",
        CommandError::InvalidArgument(_) => "INVALID_ARGUMENT",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Config(_) => 5,
        CommandError::ProjectNotFound { .. } => 5,
        CommandError::Filter(_) => 1,
        CommandError::InvalidArgument(_) => 1,
        CommandError::Api(ApiClientError::Api(api)) => u8::try_from(api.exit_code()).unwrap_or(2),
        CommandError::Api(e) if e.is_auth() => 4,
        CommandError::Api(ApiClientError::InvalidSession) => 4,
        CommandError::Api(_) => 2,
        CommandError::Io(_) => 3,
        CommandError::Json(_) => 1,
    }
}
