//! Session setup shared by the authenticated commands.
//!
//! Connection settings come from flags or their environment variables first,
//! then from the config file. A missing password is prompted for.

use std::io;
use std::time::Duration;

use dialoguer::Password;
use mstr_api_rs::session::{Credentials, Session};
use strsim::levenshtein;
use tracing::{debug, warn};

use super::config::Config;
use super::{CommandError, Result};
use crate::cli::Cli;

/// Maximum Levenshtein distance for project name suggestions.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Everything needed to log in.
#[derive(Default)]
pub struct ConnectionSettings {
    pub url: String,
    pub username: String,
    pub password: Option<String>,
    pub project: Option<String>,
    pub request_timeout: Option<Duration>,
    pub token_life: Option<Duration>,
}

impl ConnectionSettings {
    /// Merges command-line values over the config file.
    pub fn resolve(cli: &Cli, config: Config) -> Result<Self> {
        let url = cli.url.clone().or(config.url).ok_or_else(|| {
            CommandError::Config(
                "No server URL configured. Use --url, MSTR_URL, or 'mstr config set url <url>'"
                    .to_string(),
            )
        })?;
        let username = cli.username.clone().or(config.username).ok_or_else(|| {
            CommandError::Config(
                "No username configured. Use --username, MSTR_USERNAME, or 'mstr config set username <name>'"
                    .to_string(),
            )
        })?;

        Ok(Self {
            url,
            username,
            password: cli.password.clone().or(config.password),
            project: cli.project.clone().or(config.default_project),
            request_timeout: config.session.request_timeout_secs.map(Duration::from_secs),
            token_life: config.session.token_life_secs.map(Duration::from_secs),
        })
    }
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("project", &self.project)
            .field("request_timeout", &self.request_timeout)
            .field("token_life", &self.token_life)
            .finish()
    }
}

/// Builds a session, logs in, and selects the default project.
///
/// The session is closed again when the default project cannot be found.
pub async fn connect(settings: ConnectionSettings) -> Result<Session> {
    let mut builder = Session::builder(&settings.url);
    if let Some(timeout) = settings.request_timeout {
        builder = builder.request_timeout(timeout);
    }
    if let Some(life) = settings.token_life {
        builder = builder.token_life(life);
    }
    let mut session = builder.build()?;

    let password = match settings.password {
        Some(password) => password,
        None => prompt_password(&settings.username)?,
    };
    session
        .open(&Credentials::new(settings.username, password))
        .await?;
    debug!(projects = session.projects().len(), "Logged in");

    if let Some(project) = settings.project.as_deref() {
        if let Err(e) = select_project(&mut session, project) {
            disconnect(&mut session).await;
            return Err(e);
        }
    }
    Ok(session)
}

/// Logs out, reporting but not failing on errors.
pub async fn disconnect(session: &mut Session) {
    if let Err(e) = session.close().await {
        warn!(error = %e, "Logout failed");
    }
}

/// Makes `identifier` the default project of `session`.
pub fn select_project(session: &mut Session, identifier: &str) -> Result<()> {
    if session.set_default_project(identifier).is_some() {
        return Ok(());
    }
    let suggestion = find_similar_name(
        identifier,
        session.projects().iter().map(|p| p.name.as_str()),
    );
    Err(CommandError::ProjectNotFound {
        identifier: identifier.to_string(),
        suggestion,
    })
}

/// Finds the candidate closest to `query`, ignoring case.
///
/// Exact matches and candidates further than [`MAX_SUGGESTION_DISTANCE`]
/// are not suggested.
pub fn find_similar_name<'a>(
    query: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let query_lower = query.to_lowercase();
    candidates
        .into_iter()
        .map(|name| (name, levenshtein(&query_lower, &name.to_lowercase())))
        .filter(|&(_, distance)| distance > 0 && distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|&(_, distance)| distance)
        .map(|(name, _)| name.to_string())
}

fn prompt_password(username: &str) -> Result<String> {
    Password::new()
        .with_prompt(format!("Password for {}", username))
        .interact()
        .map_err(|e| CommandError::Io(io::Error::other(e.to_string())))
}
