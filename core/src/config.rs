//! Client configuration.
//!
//! A `ClientConfig` is built once at startup and then shared read-only by
//! every service through the `ApiClient` that owns it.

use std::env;
use std::time::Duration;

use crate::error::ApiError;
use crate::http::{APPLICATION_JSON, CONTENT_TYPE};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const BASE_URL_VAR: &str = "HORARIOS_API_URL";
pub const TIMEOUT_VAR: &str = "HORARIOS_API_TIMEOUT_SECS";

/// Immutable settings for the shared API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    /// Configuration pointing at `base_url` with the JSON content-type header
    /// and the default timeout. A trailing slash on `base_url` is optional.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            default_headers: vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())],
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the configuration from the process environment, loading a `.env`
    /// file first when one is present.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_env_with_url(None)
    }

    /// Like `from_env`, but an explicit `base_url` replaces the environment
    /// address, which is then never read. The timeout still comes from the
    /// environment.
    pub fn from_env_with_url(base_url: Option<&str>) -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();

        let base_url = match base_url {
            Some(url) => url.to_string(),
            None => env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        let mut config = Self::new(&base_url);
        config.validate()?;

        if let Ok(raw) = env::var(TIMEOUT_VAR) {
            config.timeout = parse_timeout(&raw)?;
        }
        Ok(config)
    }

    /// Reject base addresses the transport cannot dial.
    pub fn validate(&self) -> Result<(), ApiError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(ApiError::Config("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    /// Join the base address with a path relative to the API root.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ApiError> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::Config(format!("{TIMEOUT_VAR} must be a whole number of seconds, got {raw:?}")))?;
    if secs == 0 {
        return Err(ApiError::Config(format!("{TIMEOUT_VAR} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}
