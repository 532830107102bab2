//! Configuration management.
//!
//! Settings come from a TOML file layered with `HEPREF_*` environment
//! variables, for example `HEPREF_HTTP__TIMEOUT_SECS=10`.
//!
//! ```toml
//! [providers]
//! inspire_url = "https://inspirehep.net"
//! ads_url = "https://ui.adsabs.harvard.edu"
//!
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [concurrency]
//! max_concurrent_requests = 10
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Metadata provider endpoints
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Fan-out settings
    #[serde(default)]
    pub concurrency: ConcurrencyConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Base URLs of the two metadata providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// INSPIRE-HEP, queried for author-style texkeys
    #[serde(default = "default_inspire_url")]
    pub inspire_url: String,

    /// NASA ADS, scraped for bibcodes
    #[serde(default = "default_ads_url")]
    pub ads_url: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            inspire_url: default_inspire_url(),
            ads_url: default_ads_url(),
        }
    }
}

fn default_inspire_url() -> String {
    "https://inspirehep.net".to_string()
}

fn default_ads_url() -> String {
    "https://ui.adsabs.harvard.edu".to_string()
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Overrides the `hepref/<version>` user agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Fan-out configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    /// Maximum number of keys being resolved at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent(),
        }
    }
}

fn default_max_concurrent() -> usize {
    10
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level used when neither `-v`, `-q`, nor `RUST_LOG` is given
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Load configuration from a file, layered with `HEPREF_*` environment variables
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Configuration from `HEPREF_*` environment variables and defaults only
pub fn get_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(environment())
        .build()?
        .try_deserialize()
}

/// `HEPREF_<SECTION>__<KEY>`: a single `_` after the prefix, `__` between
/// section and key.
fn environment() -> config::Environment {
    config::Environment::with_prefix("HEPREF")
        .prefix_separator("_")
        .separator("__")
}

/// Look for `./hepref.toml`, then `<config dir>/hepref/config.toml`
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("hepref.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("hepref").join("config.toml"))
        .filter(|path| path.is_file())
}
