//! Task service connection settings.
//!
//! This module provides the [`ApiConfig`] type which tells the client where
//! the task service lives and how long to wait for it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default base URL of the task service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Default request timeout (15 seconds).
pub const DEFAULT_TIMEOUT_SECS: u32 = 15;

/// Minimum allowed request timeout (1 second).
pub const MIN_TIMEOUT_SECS: u32 = 1;

/// Maximum allowed request timeout (5 minutes).
pub const MAX_TIMEOUT_SECS: u32 = 300;

/// Configuration for talking to the task service.
///
/// # Examples
///
/// ```
/// use corkboard_config::ApiConfig;
///
/// let config = ApiConfig::default();
/// assert_eq!(config.base_url, "http://127.0.0.1:8000/api");
///
/// let config = ApiConfig::with_base_url("https://tasks.example.com/api");
/// assert_eq!(config.timeout_secs, 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL that endpoint paths such as `tasks` are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u32 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Creates a configuration pointing at `base_url` with the default timeout.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Returns the request timeout as a [`Duration`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use corkboard_config::ApiConfig;
    ///
    /// assert_eq!(ApiConfig::default().timeout(), Duration::from_secs(15));
    /// ```
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_secs))
    }

    /// Validates the service settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an `http`/`https` URL or the
    /// timeout is outside the allowed range.
    pub fn validate(&self) -> crate::Result<()> {
        let url = self.base_url.trim();
        let has_host = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'));
        if !has_host {
            return Err(crate::ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }

        if self.timeout_secs < MIN_TIMEOUT_SECS {
            return Err(crate::ConfigError::InvalidTimeout {
                reason: format!(
                    "timeout {} is below minimum of {} seconds",
                    self.timeout_secs, MIN_TIMEOUT_SECS
                ),
            });
        }

        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(crate::ConfigError::InvalidTimeout {
                reason: format!(
                    "timeout {} exceeds maximum of {} seconds",
                    self.timeout_secs, MAX_TIMEOUT_SECS
                ),
            });
        }

        Ok(())
    }
}
