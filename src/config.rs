//! Server configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_ROOM_TTL_SECS: u64 = 60 * 60;
pub const DEFAULT_CLIENT_BUFFER: usize = 256;
pub const DEFAULT_DISPATCH_BUFFER: usize = 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Allowed CORS origin. `None` allows any origin.
    pub client_url: Option<String>,
    /// How long an empty room survives before its history is discarded.
    pub room_ttl: Duration,
    /// Outbound queue depth per websocket connection.
    pub client_buffer: usize,
    /// Queue depth of the dispatch task's command channel.
    pub dispatch_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            client_url: None,
            room_ttl: Duration::from_secs(DEFAULT_ROOM_TTL_SECS),
            client_buffer: DEFAULT_CLIENT_BUFFER,
            dispatch_buffer: DEFAULT_DISPATCH_BUFFER,
        }
    }
}

impl Config {
    /// Build typed config from process environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3001
    /// - `CLIENT_URL`: allowed CORS origin, any when absent
    /// - `ROOM_TTL_SECS`: default 3600
    /// - `CLIENT_BUFFER`: default 256
    /// - `DISPATCH_BUFFER`: default 1024
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or("PORT", &lookup, DEFAULT_PORT)?;
        let client_url = lookup("CLIENT_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty());
        let ttl_secs = parse_or("ROOM_TTL_SECS", &lookup, DEFAULT_ROOM_TTL_SECS)?;
        let client_buffer = non_zero("CLIENT_BUFFER", parse_or("CLIENT_BUFFER", &lookup, DEFAULT_CLIENT_BUFFER)?)?;
        let dispatch_buffer =
            non_zero("DISPATCH_BUFFER", parse_or("DISPATCH_BUFFER", &lookup, DEFAULT_DISPATCH_BUFFER)?)?;

        Ok(Self { port, client_url, room_ttl: Duration::from_secs(ttl_secs), client_buffer, dispatch_buffer })
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

fn non_zero(var: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Zero { var });
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
