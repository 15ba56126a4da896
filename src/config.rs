//! Evaluator configuration
//!
//! Artifact locations resolve in three layers: built-in defaults, then
//! `MERITMAP_*` environment variables, then explicit overrides from the caller.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default model artifact file name
pub const DEFAULT_MODEL_PATH: &str = "placement_model.json";

/// Default scaler artifact file name
pub const DEFAULT_SCALER_PATH: &str = "placement_scaler.json";

pub const ENV_MODEL_PATH: &str = "MERITMAP_MODEL_PATH";
pub const ENV_SCALER_PATH: &str = "MERITMAP_SCALER_PATH";

/// Where to find the model artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            scaler_path: PathBuf::from(DEFAULT_SCALER_PATH),
        }
    }
}

impl EvaluatorConfig {
    pub fn new(model_path: impl Into<PathBuf>, scaler_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            scaler_path: scaler_path.into(),
        }
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            env_non_empty(ENV_MODEL_PATH).map(PathBuf::from),
            env_non_empty(ENV_SCALER_PATH).map(PathBuf::from),
        );
    }

    /// Replace paths that are `Some`
    pub fn apply_overrides(&mut self, model_path: Option<PathBuf>, scaler_path: Option<PathBuf>) {
        if let Some(v) = model_path {
            self.model_path = v;
        }
        if let Some(v) = scaler_path {
            self.scaler_path = v;
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvaluatorConfig::default();
        assert_eq!(config.model_path, PathBuf::from("placement_model.json"));
        assert_eq!(config.scaler_path, PathBuf::from("placement_scaler.json"));
    }

    #[test]
    fn test_overrides_replace_only_present_values() {
        let mut config = EvaluatorConfig::default();
        config.apply_overrides(Some(PathBuf::from("/srv/model.json")), None);
        assert_eq!(config.model_path, PathBuf::from("/srv/model.json"));
        assert_eq!(config.scaler_path, PathBuf::from(DEFAULT_SCALER_PATH));
    }

    #[test]
    fn test_env_overrides_are_trimmed_and_skip_empty_values() {
        // The only test touching MERITMAP_* variables, so no other test races it
        std::env::set_var(ENV_MODEL_PATH, "  /srv/meritmap/model.json  ");
        std::env::set_var(ENV_SCALER_PATH, "   ");
        assert_eq!(
            env_non_empty(ENV_MODEL_PATH).as_deref(),
            Some("/srv/meritmap/model.json")
        );
        assert_eq!(env_non_empty(ENV_SCALER_PATH), None);

        let config = EvaluatorConfig::from_env();
        assert_eq!(config.model_path, PathBuf::from("/srv/meritmap/model.json"));
        assert_eq!(config.scaler_path, PathBuf::from(DEFAULT_SCALER_PATH));

        // Explicit overrides win over the environment
        let mut config = EvaluatorConfig::from_env();
        config.apply_overrides(None, Some(PathBuf::from("cli-scaler.json")));
        assert_eq!(config.model_path, PathBuf::from("/srv/meritmap/model.json"));
        assert_eq!(config.scaler_path, PathBuf::from("cli-scaler.json"));

        std::env::remove_var(ENV_MODEL_PATH);
        std::env::remove_var(ENV_SCALER_PATH);
        assert_eq!(EvaluatorConfig::from_env(), EvaluatorConfig::default());
    }

    #[test]
    fn test_config_serializes() {
        let config = EvaluatorConfig::new("a.json", "b.json");
        let json = serde_json::to_string(&config).unwrap();
        let back: EvaluatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
