//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

use crate::state::notify::DEFAULT_NOTICE_TTL;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const STORAGE_DIR_NAME: &str = ".journalmind";

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to a value that does not parse.
    #[error("config parse failed: {var}={value:?} ({expected})")]
    Parse { var: &'static str, value: String, expected: &'static str },

    /// No storage directory configured and no home directory to default to.
    #[error("no storage directory: set JOURNALMIND_STORAGE_DIR or HOME")]
    MissingStorageDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub storage_dir: PathBuf,
    pub timeouts: HttpTimeouts,
    pub notice_ttl: Duration,
    /// Re-read the credential store before every guard evaluation.
    pub resync_on_navigate: bool,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `JOURNALMIND_API_URL`: default `http://localhost:8080`
    /// - `JOURNALMIND_STORAGE_DIR`: default `$HOME/.journalmind`
    /// - `JOURNALMIND_REQUEST_TIMEOUT_SECS`: default 30
    /// - `JOURNALMIND_CONNECT_TIMEOUT_SECS`: default 10
    /// - `JOURNALMIND_NOTICE_TTL_MS`: default 3000
    /// - `JOURNALMIND_RESYNC_ON_NAVIGATE`: default false
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value does not parse or no storage
    /// directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("JOURNALMIND_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
            .trim()
            .trim_end_matches('/')
            .to_owned();

        let storage_dir = match lookup("JOURNALMIND_STORAGE_DIR").filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => lookup("HOME")
                .filter(|v| !v.is_empty())
                .map(|home| PathBuf::from(home).join(STORAGE_DIR_NAME))
                .ok_or(ConfigError::MissingStorageDir)?,
        };

        let timeouts = HttpTimeouts {
            request_secs: parse_u64(&lookup, "JOURNALMIND_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64(&lookup, "JOURNALMIND_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let ttl_default = u64::try_from(DEFAULT_NOTICE_TTL.as_millis()).unwrap_or(u64::MAX);
        let notice_ttl = Duration::from_millis(parse_u64(&lookup, "JOURNALMIND_NOTICE_TTL_MS", ttl_default)?);
        let resync_on_navigate = parse_bool(&lookup, "JOURNALMIND_RESYNC_ON_NAVIGATE", false)?;

        Ok(Self { api_url, storage_dir, timeouts, notice_ttl, resync_on_navigate })
    }
}

fn parse_u64<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Parse {
            var,
            value: raw,
            expected: "a non-negative integer",
        }),
    }
}

fn parse_bool<F>(lookup: &F, var: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Parse { var, value: raw, expected: "true or false" }),
    }
}
