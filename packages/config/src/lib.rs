// ABOUTME: Runtime configuration for the FlowInsight client
// ABOUTME: Loads backend URL, retry policy, timeouts and session file location from the environment

pub mod constants;

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::ParseBoolError;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use url::Url;

use constants::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API URL {0}: {1}")]
    InvalidApiUrl(String, String),
    #[error("API URL must use http or https: {0}")]
    UnsupportedScheme(String),
    #[error("Invalid number for {0}: {1}")]
    InvalidNumber(&'static str, ParseIntError),
    #[error("Invalid boolean for {0}: {1}")]
    InvalidBool(&'static str, ParseBoolError),
    #[error("{0} must be at least 1")]
    ZeroAttempts(&'static str),
    #[error("OAuth provider must be a single non-empty path segment, got {0:?}")]
    InvalidProvider(String),
    #[error("Could not determine home directory")]
    NoHomeDir,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend base URL without a trailing slash
    pub api_base_url: String,
    /// Provider entry segment of `/api/auth/{provider}`
    pub oauth_provider: String,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
    pub retry_client_errors: bool,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub session_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Missing keys fall back to
    /// the defaults in [`constants`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = normalize_api_url(
            &lookup(FLOWINSIGHT_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        let oauth_provider = lookup(FLOWINSIGHT_OAUTH_PROVIDER)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_OAUTH_PROVIDER.to_string());
        if oauth_provider.is_empty() || oauth_provider.contains('/') {
            return Err(ConfigError::InvalidProvider(oauth_provider));
        }

        let retry_attempts = match lookup(FLOWINSIGHT_RETRY_ATTEMPTS) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidNumber(FLOWINSIGHT_RETRY_ATTEMPTS, e))?,
            None => DEFAULT_RETRY_ATTEMPTS,
        };
        if retry_attempts == 0 {
            return Err(ConfigError::ZeroAttempts(FLOWINSIGHT_RETRY_ATTEMPTS));
        }

        let retry_delay = Duration::from_millis(parse_u64(
            &lookup,
            FLOWINSIGHT_RETRY_DELAY_MS,
            DEFAULT_RETRY_DELAY_MS,
        )?);

        let retry_client_errors = match lookup(FLOWINSIGHT_RETRY_CLIENT_ERRORS) {
            Some(raw) => raw
                .trim()
                .to_lowercase()
                .parse::<bool>()
                .map_err(|e| ConfigError::InvalidBool(FLOWINSIGHT_RETRY_CLIENT_ERRORS, e))?,
            None => true,
        };

        let request_timeout = Duration::from_secs(parse_u64(
            &lookup,
            FLOWINSIGHT_HTTP_REQUEST_TIMEOUT_SECS,
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let connect_timeout = Duration::from_secs(parse_u64(
            &lookup,
            FLOWINSIGHT_HTTP_CONNECT_TIMEOUT_SECS,
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?);

        let session_file = match lookup(FLOWINSIGHT_SESSION_FILE) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
            _ => default_session_file()?,
        };

        debug!(
            "Loaded config: api={}, attempts={}, delay={:?}",
            api_base_url, retry_attempts, retry_delay
        );

        Ok(Config {
            api_base_url,
            oauth_provider,
            retry_attempts,
            retry_delay,
            retry_client_errors,
            request_timeout,
            connect_timeout,
            session_file,
        })
    }
}

fn parse_u64<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidNumber(key, e)),
        None => Ok(default),
    }
}

/// Validate a base URL and strip trailing slashes so paths can be appended
/// verbatim.
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidApiUrl(trimmed.to_string(), e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        _ => Err(ConfigError::UnsupportedScheme(trimmed.to_string())),
    }
}

/// `~/.flowinsight/session.json`
pub fn default_session_file() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(FLOWINSIGHT_DIR).join(SESSION_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_lookup(lookup_from(&[(FLOWINSIGHT_SESSION_FILE, "/tmp/s.json")])).unwrap();

        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.oauth_provider, "replit");
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_millis(1000));
        assert!(config.retry_client_errors);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (FLOWINSIGHT_API_URL, "https://api.example.com/"),
            (FLOWINSIGHT_OAUTH_PROVIDER, "github"),
            (FLOWINSIGHT_RETRY_ATTEMPTS, "5"),
            (FLOWINSIGHT_RETRY_DELAY_MS, "250"),
            (FLOWINSIGHT_RETRY_CLIENT_ERRORS, "FALSE"),
            (FLOWINSIGHT_SESSION_FILE, "/tmp/s.json"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.oauth_provider, "github");
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert!(!config.retry_client_errors);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            (FLOWINSIGHT_RETRY_ATTEMPTS, "0"),
            (FLOWINSIGHT_SESSION_FILE, "/tmp/s.json"),
        ]));
        assert!(matches!(result, Err(ConfigError::ZeroAttempts(_))));
    }

    #[test]
    fn test_bad_number_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            (FLOWINSIGHT_RETRY_DELAY_MS, "soon"),
            (FLOWINSIGHT_SESSION_FILE, "/tmp/s.json"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidNumber(FLOWINSIGHT_RETRY_DELAY_MS, _))
        ));
    }

    #[rstest]
    #[case("ftp://example.com")]
    #[case("not a url")]
    #[case("")]
    fn test_invalid_api_urls(#[case] raw: &str) {
        assert!(normalize_api_url(raw).is_err());
    }

    #[rstest]
    #[case("")]
    #[case("a/b")]
    fn test_invalid_provider(#[case] provider: &str) {
        let result = Config::from_lookup(lookup_from(&[
            (FLOWINSIGHT_OAUTH_PROVIDER, provider),
            (FLOWINSIGHT_SESSION_FILE, "/tmp/s.json"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidProvider(_))));
    }
}
