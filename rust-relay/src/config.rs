//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup and shared read-only afterwards.

use std::env;

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("{name} is not a valid http(s) URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret GitHub signs webhook deliveries with
    pub github_webhook_secret: String,

    /// Discord webhook that receives the sponsorship embeds
    pub discord_webhook_url: Url,

    /// Port for the web server to listen on
    pub port: u16,

    /// Outbound HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let github_webhook_secret = lookup("GITHUB_WEBHOOK_SECRET")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("GITHUB_WEBHOOK_SECRET"))?;

        let raw_url = lookup("DISCORD_WEBHOOK_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_WEBHOOK_URL"))?;
        let discord_webhook_url = parse_http_url("DISCORD_WEBHOOK_URL", raw_url.trim())?;

        Ok(Config {
            github_webhook_secret,
            discord_webhook_url,
            port: parse_or("PORT", lookup("PORT"), 8080),
            request_timeout_ms: parse_or(
                "REQUEST_TIMEOUT_MS",
                lookup("REQUEST_TIMEOUT_MS"),
                10_000,
            ),
        })
    }
}

/// Parse an absolute http or https URL.
fn parse_http_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

/// Parse an optional value, falling back to the default when absent or invalid.
fn parse_or<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("GITHUB_WEBHOOK_SECRET", "s3cret"),
            ("DISCORD_WEBHOOK_URL", "https://discord.com/api/webhooks/1/abc"),
        ]))
        .unwrap();

        assert_eq!(config.github_webhook_secret, "s3cret");
        assert_eq!(
            config.discord_webhook_url.as_str(),
            "https://discord.com/api/webhooks/1/abc"
        );
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GITHUB_WEBHOOK_SECRET", "s3cret"),
            ("DISCORD_WEBHOOK_URL", "http://localhost:9000/hook"),
            ("PORT", "3000"),
            ("REQUEST_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout_ms, 2500);
    }

    #[test]
    fn test_from_lookup_invalid_port_uses_default() {
        let config = Config::from_lookup(lookup_from(&[
            ("GITHUB_WEBHOOK_SECRET", "s3cret"),
            ("DISCORD_WEBHOOK_URL", "https://discord.com/api/webhooks/1/abc"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_from_lookup_missing_secret() {
        let err = Config::from_lookup(lookup_from(&[(
            "DISCORD_WEBHOOK_URL",
            "https://discord.com/api/webhooks/1/abc",
        )]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Missing("GITHUB_WEBHOOK_SECRET")));
    }

    #[test]
    fn test_from_lookup_blank_secret_is_missing() {
        let err = Config::from_lookup(lookup_from(&[
            ("GITHUB_WEBHOOK_SECRET", "   "),
            ("DISCORD_WEBHOOK_URL", "https://discord.com/api/webhooks/1/abc"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Missing("GITHUB_WEBHOOK_SECRET")));
    }

    #[test]
    fn test_from_lookup_missing_url() {
        let err = Config::from_lookup(lookup_from(&[("GITHUB_WEBHOOK_SECRET", "s3cret")]))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Missing("DISCORD_WEBHOOK_URL")));
    }

    #[test]
    fn test_from_lookup_rejects_non_http_url() {
        let err = Config::from_lookup(lookup_from(&[
            ("GITHUB_WEBHOOK_SECRET", "s3cret"),
            ("DISCORD_WEBHOOK_URL", "ftp://example.com/hook"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_from_lookup_rejects_relative_url() {
        let err = Config::from_lookup(lookup_from(&[
            ("GITHUB_WEBHOOK_SECRET", "s3cret"),
            ("DISCORD_WEBHOOK_URL", "/api/webhooks/1/abc"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
