//! Service configuration.
//!
//! Values come from an optional TOML file overlaid by `MICRO_APP_SYNC_*`
//! environment variables. Nested keys use `__`, so `cms.base_url` is set by
//! `MICRO_APP_SYNC_CMS__BASE_URL`.

use std::time::Duration;

use cms::{CmsConfig, DEFAULT_PERMISSIONS_PATH};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "MICRO_APP_SYNC_CONFIG";

/// Configuration file read when [`CONFIG_PATH_VAR`] is unset. It may be absent.
pub const DEFAULT_CONFIG_FILE: &str = "micro-app-sync.toml";

const ENV_PREFIX: &str = "MICRO_APP_SYNC";

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// A configuration value that must never appear in logs.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[redacted]")
    }
}

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Ingress bind address.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Shared secret expected in the `x-api-key` header.
    pub api_key: Secret,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP gRPC endpoint. Span export is disabled when unset.
    #[serde(default)]
    pub otel_endpoint: Option<String>,

    pub cms: CmsSettings,

    pub tracker: TrackerSettings,

    #[serde(default)]
    pub icons: IconSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CmsSettings {
    pub base_url: String,
    pub username: String,
    pub password: Secret,
    #[serde(default = "default_permissions_path")]
    pub permissions_path: String,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerSettings {
    pub base_url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub api_token: Option<Secret>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IconSettings {
    /// Origin used to resolve icon URLs given as bare paths.
    #[serde(default)]
    pub media_base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            media_base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:3030".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_permissions_path() -> String {
    DEFAULT_PERMISSIONS_PATH.to_string()
}

fn default_collection() -> String {
    upstream::DEFAULT_COLLECTION.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ServiceConfig {
    /// Loads from the file named by [`CONFIG_PATH_VAR`] (or
    /// [`DEFAULT_CONFIG_FILE`]) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

impl CmsSettings {
    pub fn to_cms_config(&self) -> CmsConfig {
        let mut config = CmsConfig::new(&self.base_url, &self.username, self.password.expose());
        config.permissions_path = self.permissions_path.clone();
        config.accept_invalid_certs = self.accept_invalid_certs;
        config.timeout = Duration::from_secs(self.timeout_secs);
        config
    }
}
