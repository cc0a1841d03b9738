use std::path::Path;

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};

use super::{Config, ConfigError, DEFAULT_CONFIG_FILE, defaults};

pub(crate) fn load_configuration(custom_config_path: Option<&Path>) -> Result<Config, ConfigError> {
    load_from(Path::new(DEFAULT_CONFIG_FILE), custom_config_path)
}

/// Layer typed defaults, `base_file` when it exists, then the custom file.
fn load_from(base_file: &Path, custom_config_path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(defaults::config()));

    if base_file.exists() {
        figment = figment.merge(Toml::file(base_file));
    }

    // Custom config file has the highest priority
    if let Some(config_path) = custom_config_path {
        if !config_path.exists() {
            return Err(ConfigError::MissingConfig(
                config_path.display().to_string(),
            ));
        }
        figment = figment.merge(Toml::file(config_path));
    }

    let config: Config = figment.extract().map_err(Box::new)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.triple_store.upload_batch_size == 0 {
        return Err(ConfigError::InvalidConfig(
            "triple_store.upload_batch_size must be at least 1".to_string(),
        ));
    }

    if let Some(status) = config
        .http
        .status_forcelist
        .iter()
        .find(|status| !(100..=599).contains(*status))
    {
        return Err(ConfigError::InvalidConfig(format!(
            "http.status_forcelist contains {status}, which is not an HTTP status"
        )));
    }

    if config.http.timeout_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "http.timeout_secs must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::fs;

    use prov_triple_store::{DEFAULT_SPARQL_ENDPOINT, TripleStoreBackendType};
    use tempfile::TempDir;

    use super::*;
    use crate::logger::LogFormat;

    #[test]
    fn defaults_apply_without_files() {
        let temp_dir = TempDir::new().unwrap();

        let config = load_from(&temp_dir.path().join(DEFAULT_CONFIG_FILE), None).unwrap();

        assert_eq!(config.logger.level, "info");
        assert_eq!(config.logger.format, LogFormat::Pretty);
        assert_eq!(config.triple_store.backend, TripleStoreBackendType::Sparql);
        assert_eq!(config.triple_store.endpoint, DEFAULT_SPARQL_ENDPOINT);
        assert_eq!(config.http.tries, 1);
        assert_eq!(
            config.http.status_forcelist,
            vec![500, 502, 504, 520, 521, 522]
        );
        assert_eq!(config.http.timeout_secs, 60);
    }

    #[test]
    fn custom_file_overrides_base_file() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &base,
            r#"
[logger]
level = "debug"

[triple_store]
endpoint = "http://base.example.org/sparql"
"#,
        )
        .unwrap();
        let custom = temp_dir.path().join("custom.toml");
        fs::write(
            &custom,
            r#"
[triple_store]
endpoint = "http://custom.example.org/sparql"

[triple_store.timeouts]
query_ms = 5000

[http]
tries = 3
"#,
        )
        .unwrap();

        let config = load_from(&base, Some(&custom)).unwrap();

        assert_eq!(config.logger.level, "debug");
        assert_eq!(
            config.triple_store.endpoint,
            "http://custom.example.org/sparql"
        );
        assert_eq!(config.triple_store.timeouts.query_ms, 5000);
        assert_eq!(config.triple_store.timeouts.update_ms, 300_000);
        assert_eq!(config.http.tries, 3);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let custom = temp_dir.path().join("custom.toml");
        fs::write(&custom, "[http]\nretries = 3\n").unwrap();

        let error = load_from(&temp_dir.path().join(DEFAULT_CONFIG_FILE), Some(&custom))
            .unwrap_err();

        assert!(matches!(error, ConfigError::LoadError(_)));
    }

    #[test]
    fn missing_custom_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let error = load_from(
            &temp_dir.path().join(DEFAULT_CONFIG_FILE),
            Some(&temp_dir.path().join("absent.toml")),
        )
        .unwrap_err();

        assert!(matches!(error, ConfigError::MissingConfig(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let custom = temp_dir.path().join("custom.toml");
        fs::write(&custom, "[http]\nstatus_forcelist = [502, 1000]\n").unwrap();

        let error = load_from(&temp_dir.path().join(DEFAULT_CONFIG_FILE), Some(&custom))
            .unwrap_err();

        assert!(matches!(error, ConfigError::InvalidConfig(_)));
    }
}
