//! Server configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: &'static str },
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Hosted auth service base, trailing slash removed.
    pub auth_base_url: String,
    pub proxy_timeout: Duration,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Required:
    /// - `NEON_AUTH_BASE_URL`: hosted auth endpoint, e.g.
    ///   `https://ep-xxx.neonauth.us-east-2.aws.neon.tech/neondb/auth`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `AUTH_PROXY_TIMEOUT_SECS`: default 15
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let auth_base_url = parse_base_url(var("NEON_AUTH_BASE_URL").as_deref())?;
        let port = parse_or("PORT", var("PORT").as_deref(), DEFAULT_PORT)?;
        let timeout_secs =
            parse_or("AUTH_PROXY_TIMEOUT_SECS", var("AUTH_PROXY_TIMEOUT_SECS").as_deref(), DEFAULT_PROXY_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid { var: "AUTH_PROXY_TIMEOUT_SECS", value: "0".to_owned() });
        }

        Ok(Self { port, auth_base_url, proxy_timeout: Duration::from_secs(timeout_secs) })
    }
}

fn parse_base_url(raw: Option<&str>) -> Result<String, ConfigError> {
    const VAR: &str = "NEON_AUTH_BASE_URL";
    let raw = raw.map(str::trim).filter(|v| !v.is_empty()).ok_or(ConfigError::Missing { var: VAR })?;
    if !(raw.starts_with("https://") || raw.starts_with("http://")) {
        return Err(ConfigError::Invalid { var: VAR, value: raw.to_owned() });
    }
    Ok(raw.trim_end_matches('/').to_owned())
}

fn parse_or<T: std::str::FromStr>(var: &'static str, raw: Option<&str>, default: T) -> Result<T, ConfigError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { var, value: value.to_owned() }),
    }
}
