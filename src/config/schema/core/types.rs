use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::schema::{AdmissionConfig, GenerationConfig};
use crate::error::ConfigError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where this config was loaded from (computed, not serialized)
    #[serde(skip)]
    pub config_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub admission: AdmissionConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            log_level: default_log_level(),
            admission: AdmissionConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admission.anon_limit == 0 {
            return Err(ConfigError::Validation(
                "admission.anon_limit must be greater than 0".into(),
            ));
        }
        if self.admission.authed_limit == 0 {
            return Err(ConfigError::Validation(
                "admission.authed_limit must be greater than 0".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "log_level must be one of {} (got '{}')",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }
        for (name, value) in [
            (
                "generation.generate_temperature",
                self.generation.generate_temperature,
            ),
            (
                "generation.interpret_temperature",
                self.generation.interpret_temperature,
            ),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be within 0.0..=2.0 (got {value})"
                )));
            }
        }
        Ok(())
    }

    /// Max tracing level for `log_level`; falls back to INFO.
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CounterStoreKind;

    #[test]
    fn config_default_is_valid() {
        let config = Config::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
        config.validate().unwrap();
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut config = Config::default();
        config.log_level = "debug".into();
        config.admission.store = CounterStoreKind::Sqlite;
        config.admission.anon_limit = 25;
        config.generation.model = "local-llm".into();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed, config);
        assert!(toml_str.contains("store = \"sqlite\""));
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let mut config = Config::default();
        config.admission.anon_limit = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("admission.anon_limit"));

        let mut config = Config::default();
        config.admission.authed_limit = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("admission.authed_limit"));
    }

    #[test]
    fn validate_rejects_unknown_log_level() {
        let config = Config {
            log_level: "chatty".into(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chatty"));
    }

    #[test]
    fn validate_accepts_uppercase_log_level() {
        let config = Config {
            log_level: "WARN".into(),
            ..Config::default()
        };
        config.validate().unwrap();
        assert_eq!(config.tracing_level(), tracing::Level::WARN);
    }

    #[test]
    fn validate_rejects_temperature_out_of_range() {
        let mut config = Config::default();
        config.generation.interpret_temperature = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("generation.interpret_temperature"));
    }
}
