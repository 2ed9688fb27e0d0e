//! Client configuration

use crate::error::{ClientError, Result};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// What to do when a request needs a token and the stored one is expired or missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiredTokenPolicy {
    /// Refresh first (single-flight), then send with the new token
    #[default]
    Refresh,
    /// Send the request without an `Authorization` header
    Proceed,
}

impl FromStr for ExpiredTokenPolicy {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refresh" => Ok(Self::Refresh),
            "proceed" => Ok(Self::Proceed),
            other => Err(ClientError::Configuration(format!(
                "unknown expired token policy: {other}"
            ))),
        }
    }
}

/// Configuration for the chat client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `https://chat.example.com`
    pub base_url: String,

    /// Upper bound on a single refresh round-trip
    /// Default: 5 seconds
    pub refresh_timeout_secs: u64,

    /// Timeout applied to every other request
    /// Default: 30 seconds
    pub request_timeout_secs: u64,

    pub expired_token_policy: ExpiredTokenPolicy,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            refresh_timeout_secs: DEFAULT_REFRESH_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            expired_token_policy: ExpiredTokenPolicy::default(),
        }
    }

    /// Read configuration from `CHAT_*` environment variables
    ///
    /// `CHAT_SERVER_URL` is required; the rest fall back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("CHAT_SERVER_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ClientError::Configuration("CHAT_SERVER_URL is not set".to_string()))?;

        let mut config = Self::new(base_url);

        if let Some(v) = lookup("CHAT_REFRESH_TIMEOUT_SECS") {
            config.refresh_timeout_secs = parse_secs("CHAT_REFRESH_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("CHAT_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_secs("CHAT_REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("CHAT_EXPIRED_TOKEN_POLICY") {
            config.expired_token_policy = v.parse()?;
        }

        Ok(config)
    }

    pub fn with_policy(mut self, policy: ExpiredTokenPolicy) -> Self {
        self.expired_token_policy = policy;
        self
    }

    pub fn with_refresh_timeout(mut self, secs: u64) -> Self {
        self.refresh_timeout_secs = secs;
        self
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(ClientError::Configuration(format!(
            "{key} must be a positive number of seconds, got {value:?}"
        ))),
        Ok(secs) => Ok(secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[("CHAT_SERVER_URL", "http://localhost:5000")]))
            .unwrap();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.refresh_timeout(), Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.expired_token_policy, ExpiredTokenPolicy::Refresh);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("CHAT_SERVER_URL", "http://localhost:5000"),
            ("CHAT_REFRESH_TIMEOUT_SECS", "2"),
            ("CHAT_REQUEST_TIMEOUT_SECS", "10"),
            ("CHAT_EXPIRED_TOKEN_POLICY", "Proceed"),
        ]))
        .unwrap();
        assert_eq!(config.refresh_timeout_secs, 2);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.expired_token_policy, ExpiredTokenPolicy::Proceed);
    }

    #[test]
    fn test_missing_base_url() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("CHAT_REFRESH_TIMEOUT_SECS", "0"),
            ("CHAT_REQUEST_TIMEOUT_SECS", "soon"),
            ("CHAT_EXPIRED_TOKEN_POLICY", "logout"),
        ] {
            let result = ClientConfig::from_lookup(lookup(&[
                ("CHAT_SERVER_URL", "http://localhost:5000"),
                (key, value),
            ]));
            assert!(matches!(result, Err(ClientError::Configuration(_))), "{key}={value}");
        }
    }
}
