//! Client configuration.
//!
//! Precedence, highest first: values set in code, environment variables,
//! built-in defaults. An empty `base_url` or a zero `timeout` counts as
//! "not set".

use std::time::Duration;

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_BASE_URL: &str = "STUDY_TRACKER_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "STUDY_TRACKER_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Defaults overlaid with the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if an environment value is malformed.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::default().resolve()
    }

    /// Fill unset fields from the process environment, then defaults.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if an environment value is malformed.
    pub fn resolve(self) -> Result<Self, ClientError> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Same as [`resolve`](Self::resolve) with an explicit variable lookup.
    pub fn resolve_with(self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let base_url = first_non_empty(&[
            self.base_url.trim(),
            lookup(ENV_BASE_URL).unwrap_or_default().trim(),
            DEFAULT_BASE_URL,
        ]);
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got {base_url:?}"
            )));
        }

        let timeout = if self.timeout.is_zero() {
            match lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
                Some(raw) => parse_timeout(&raw)?,
                None => DEFAULT_TIMEOUT,
            }
        } else {
            self.timeout
        };

        Ok(Self { base_url, timeout })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ClientError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ClientError::Config(format!(
            "{ENV_TIMEOUT_SECS} must be a positive number of seconds, got {raw:?}"
        ))),
    }
}

fn first_non_empty(values: &[&str]) -> String {
    values
        .iter()
        .find(|v| !v.is_empty())
        .map_or_else(String::new, |v| (*v).to_owned())
}
