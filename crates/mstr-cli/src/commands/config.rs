//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/mstr/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Minimum secret length to apply masking (show first and last N characters).
const SECRET_MASK_MIN_LENGTH: usize = 8;

/// Number of characters to show at start/end of a masked secret.
const SECRET_MASK_VISIBLE_CHARS: usize = 4;

/// Keys accepted by `config set`.
const VALID_KEYS: &str =
    "url, username, password, default_project, session.request_timeout_secs, session.token_life_secs";

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Library REST API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password (optional, prompted for when absent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Project ID, alias, or name made the default after login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,

    /// Session settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            url: None,
            username: None,
            password: None,
            default_project: None,
            session: SessionConfig::default(),
        }
    }
}

/// Session configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Per-request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Seconds a token is trusted before it is revalidated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_life_secs: Option<u64>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/mstr/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(path) = env::var("MSTR_CONFIG") {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            return Ok(parent.to_path_buf());
        }
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("mstr"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("mstr"))
        .ok_or_else(|| {
            CommandError::Config("Could not determine config directory".to_string())
        })
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("MSTR_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial schema.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;
    config.password = config.password.as_deref().map(mask_secret);

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("Settings:");
            if let Some(ref url) = config.url {
                println!("  url: {}", url);
            }
            if let Some(ref username) = config.username {
                println!("  username: {}", username);
            }
            if let Some(ref password) = config.password {
                println!("  password: {}", password);
            }
            if let Some(ref project) = config.default_project {
                println!("  default_project: {}", project);
            }

            println!("\n[session]");
            if let Some(timeout) = config.session.request_timeout_secs {
                println!("  request_timeout_secs: {}", timeout);
            }
            if let Some(life) = config.session.token_life_secs {
                println!("  token_life_secs: {}", life);
            }
        } else {
            println!("(No config file exists. Run 'mstr config set <key> <value>' to create one.)");
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    let shown = if opts.key == "password" {
        mask_secret(&opts.value)
    } else {
        opts.value.clone()
    };

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": shown,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, shown);
    }

    Ok(())
}

/// Validates and stores one `key = value` setting.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let (section, field) = match key.split_once('.') {
        Some((section, field)) => (Some(section), field),
        None => (None, key),
    };

    match (section, field) {
        (None, "url") => {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(CommandError::Config(format!(
                    "Invalid url '{}'. Expected an http:// or https:// URL",
                    value
                )));
            }
            config.url = Some(value.to_string());
        }
        (None, "username") => config.username = Some(value.to_string()),
        (None, "password") => config.password = Some(value.to_string()),
        (None, "default_project") => config.default_project = Some(value.to_string()),
        (Some("session"), "request_timeout_secs") => {
            config.session.request_timeout_secs = Some(parse_seconds(value)?);
        }
        (Some("session"), "token_life_secs") => {
            config.session.token_life_secs = Some(parse_seconds(value)?);
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: {}",
                key, VALID_KEYS
            )));
        }
    }
    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Masks a secret for display, showing only the first and last N characters.
///
/// Uses character-based (not byte-based) indexing to safely handle
/// multi-byte UTF-8 characters.
fn mask_secret(secret: &str) -> String {
    let char_count = secret.chars().count();
    if char_count > SECRET_MASK_MIN_LENGTH {
        let prefix: String = secret.chars().take(SECRET_MASK_VISIBLE_CHARS).collect();
        let suffix: String = secret
            .chars()
            .skip(char_count - SECRET_MASK_VISIBLE_CHARS)
            .collect();
        format!("{}...{}", prefix, suffix)
    } else {
        "****".to_string()
    }
}

/// Parses a positive number of seconds.
fn parse_seconds(s: &str) -> Result<u64> {
    match s.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(CommandError::Config(format!(
            "Invalid number of seconds '{}'. Use a positive integer",
            s
        ))),
    }
}
