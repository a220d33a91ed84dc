//! Configuration module

use std::env;
use std::path::PathBuf;

use studata_core::constants::{DEFAULT_DATA_FILENAME, DEFAULT_MODEL_FILENAME};
use studata_core::ServiceConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Student dataset (`;`-delimited)
    pub data_path: PathBuf,

    /// Persisted pipeline (JSON)
    pub model_path: PathBuf,

    /// Train a pipeline at startup when none is persisted
    pub train_if_missing: bool,

    /// Override of the default passthrough columns
    pub sensitive_features: Option<Vec<String>>,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (unset keys take defaults)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            data_path: lookup("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILENAME)),

            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_FILENAME)),

            train_if_missing: lookup("TRAIN_IF_MISSING")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),

            sensitive_features: lookup("SENSITIVE_FEATURES").map(|v| {
                v.split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }),

            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        }
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Core service settings derived from this configuration
    pub fn service_config(&self) -> ServiceConfig {
        let defaults = ServiceConfig::default();
        ServiceConfig {
            data_path: self.data_path.clone(),
            model_path: self.model_path.clone(),
            train_if_missing: self.train_if_missing,
            sensitive_features: self
                .sensitive_features
                .clone()
                .unwrap_or(defaults.sensitive_features),
            tree: defaults.tree,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);

        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.data_path, PathBuf::from("data.csv"));
        assert_eq!(config.model_path, PathBuf::from("model_pipeline.json"));
        assert!(config.train_if_missing);
        assert!(config.sensitive_features.is_none());
        assert_eq!(config.environment, "development");
        assert_eq!(config.service_config().sensitive_features.len(), 11);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "5000"),
            ("TRAIN_IF_MISSING", "false"),
            ("SENSITIVE_FEATURES", "Gender; Age at enrollment ;"),
            ("ENVIRONMENT", "production"),
        ]));

        assert_eq!(config.port, 5000);
        assert!(!config.train_if_missing);
        assert_eq!(config.environment, "production");
        assert_eq!(
            config.service_config().sensitive_features,
            vec!["Gender", "Age at enrollment"]
        );
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("PORT", "http")]));
        assert_eq!(config.port, 8080);
    }
}
