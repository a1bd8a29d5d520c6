//! Configuration model loaded from external sources.

use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
/// Settings needed to reach the backend and persist the session.
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub api_url: String,
    /// Directory holding the persisted token file.
    pub token_dir: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_dir: ".session".to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Loads `config/default`, the `config/{APP_ENV}` overrides and `APP_*`
    /// environment variables, in that order. All files are optional.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());
        Self::load_from("config", &app_env)
    }

    pub fn load_from(dir: &str, app_env: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("token_dir", defaults.token_dir)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .add_source(File::with_name(&format!("{dir}/default")).required(false))
            .add_source(File::with_name(&format!("{dir}/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let config = ClientConfig::load_from("does/not/exist", "test").unwrap();
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(!config.token_dir.is_empty());
    }
}
