mod defaults;
mod error;
mod loader;

pub use error::ConfigError;
pub(crate) use loader::load_configuration;
use prov_http_cache::HttpClientConfig;
use prov_triple_store::TripleStoreManagerConfig;
use serde::{Deserialize, Serialize};

use crate::logger::LoggerConfig;

/// Name of the configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "prov-toolkit.toml";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub logger: LoggerConfig,
    pub triple_store: TripleStoreManagerConfig,
    pub http: HttpClientConfig,
}

impl Default for Config {
    fn default() -> Self {
        defaults::config()
    }
}
