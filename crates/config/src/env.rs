//! Environment variable overrides.
//!
//! Settings are resolved with the following priority (highest first):
//!
//! 1. `CORKBOARD_*` environment variables
//! 2. Configuration file
//! 3. Built-in defaults

use std::path::PathBuf;

use crate::Config;
use crate::error::{ConfigError, Result};

/// Overrides [`ApiConfig::base_url`](crate::ApiConfig::base_url).
pub const ENV_API_URL: &str = "CORKBOARD_API_URL";

/// Overrides [`ApiConfig::timeout_secs`](crate::ApiConfig::timeout_secs).
pub const ENV_TIMEOUT_SECS: &str = "CORKBOARD_TIMEOUT_SECS";

/// Overrides [`ColumnsConfig::store_dir`](crate::ColumnsConfig::store_dir).
pub const ENV_COLUMNS_DIR: &str = "CORKBOARD_COLUMNS_DIR";

/// Applies overrides from the process environment.
///
/// # Errors
///
/// Returns an error if a variable is set to a value that cannot be parsed.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Applies overrides using `lookup` to read variables.
///
/// Empty values are treated as unset.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvValue`] if `CORKBOARD_TIMEOUT_SECS` is
/// not a number.
///
/// # Examples
///
/// ```
/// use corkboard_config::Config;
/// use corkboard_config::env::apply_overrides_from;
///
/// let mut config = Config::default();
/// apply_overrides_from(&mut config, |key| {
///     (key == "CORKBOARD_API_URL").then(|| "https://tasks.example.com/api".to_string())
/// })
/// .unwrap();
///
/// assert_eq!(config.api.base_url, "https://tasks.example.com/api");
/// ```
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(url) = lookup(ENV_API_URL) {
        config.api.base_url = url;
    }

    if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
        config.api.timeout_secs =
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnvValue {
                    name: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
    }

    if let Some(dir) = lookup(ENV_COLUMNS_DIR) {
        config.columns.store_dir = Some(PathBuf::from(dir));
    }

    Ok(())
}
