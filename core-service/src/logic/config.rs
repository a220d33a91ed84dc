use std::path::PathBuf;

use crate::constants::{DEFAULT_DATA_FILENAME, DEFAULT_MODEL_FILENAME, DEFAULT_SENSITIVE_FEATURES};
use crate::logic::model::TreeConfig;

/// Everything `ExplanationService::init` needs to come up
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    /// Train and persist a pipeline when none exists at `model_path`
    pub train_if_missing: bool,
    /// Columns passed through the preprocessor untouched
    pub sensitive_features: Vec<String>,
    pub tree: TreeConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILENAME),
            model_path: PathBuf::from(DEFAULT_MODEL_FILENAME),
            train_if_missing: true,
            sensitive_features: DEFAULT_SENSITIVE_FEATURES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            tree: TreeConfig::default(),
        }
    }
}
