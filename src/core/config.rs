//! Configuration file and environment credential resolution.
//!
//! The config file is optional; a missing file yields defaults. The one
//! required secret is the API key, taken from the process environment. Its
//! absence is never fatal at startup: the chat surface still runs and every
//! send resolves immediately as a configuration failure.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::constants::DEFAULT_BASE_URL;

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Model requested when `--model` is not given.
    pub default_model: Option<String>,
    /// API base URL; the `OPENAI_BASE_URL` environment variable wins over this.
    pub base_url: Option<String>,
    /// Replacement for the built-in seed greeting.
    pub greeting: Option<String>,
    /// Replacement for the built-in persona instruction.
    pub system_prompt: Option<String>,
    /// Per-request timeout in seconds; unset means no client-side timeout.
    pub request_timeout_secs: Option<u64>,
}

/// Errors that can occur when loading configuration from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse the configuration file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, ConfigError> {
        Self::load_from_path(&Self::config_path())
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    fn config_path() -> PathBuf {
        let proj_dirs = ProjectDirs::from("org", "permacommons", "nakama")
            .expect("Failed to determine config directory");
        proj_dirs.config_dir().join("config.toml")
    }
}

/// Credentials and endpoint resolved from the environment plus config.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvSession {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsError {
    MissingApiKey,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialsError::MissingApiKey => write!(
                f,
                "OPENAI_API_KEY environment variable not set.\n\n\
                 Please set your API key:\n\
                 export OPENAI_API_KEY=\"your-api-key-here\"\n\n\
                 Optionally, you can also set a custom base URL:\n\
                 export OPENAI_BASE_URL=\"{DEFAULT_BASE_URL}\""
            ),
        }
    }
}

impl StdError for CredentialsError {}

/// Resolve the session credentials from the process environment.
///
/// Base URL precedence: `OPENAI_BASE_URL` > config file > built-in default.
pub fn resolve_env_session(
    config: &Config,
    base_url_override: Option<&str>,
) -> Result<EnvSession, CredentialsError> {
    session_from_parts(
        std::env::var("OPENAI_API_KEY").ok(),
        std::env::var("OPENAI_BASE_URL").ok(),
        config,
        base_url_override,
    )
}

fn session_from_parts(
    api_key: Option<String>,
    env_base_url: Option<String>,
    config: &Config,
    base_url_override: Option<&str>,
) -> Result<EnvSession, CredentialsError> {
    let api_key = api_key
        .filter(|key| !key.trim().is_empty())
        .ok_or(CredentialsError::MissingApiKey)?;

    let base_url = base_url_override
        .map(str::to_string)
        .or(env_base_url)
        .or_else(|| config.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    Ok(EnvSession { api_key, base_url })
}
