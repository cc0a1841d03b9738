//! Typed default configuration.
//!
//! Every setting has a compile-time default so the tool runs without any
//! configuration file.

use prov_http_cache::HttpClientConfig;
use prov_triple_store::TripleStoreManagerConfig;

use super::Config;
use crate::logger::LoggerConfig;

pub(crate) fn config() -> Config {
    Config {
        logger: LoggerConfig::default(),
        triple_store: TripleStoreManagerConfig::default(),
        http: HttpClientConfig::default(),
    }
}
