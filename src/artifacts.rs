//! Model artifacts
//!
//! The classifier and scaler are trained offline and shipped as two JSON
//! documents. This module loads them, checks them against the fitted
//! 25-feature schema, and exposes the math they encode. Nothing here is
//! mutated after load.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::error::MeritMapError;
use crate::types::{FeatureVector, ScaledVector, FEATURE_COUNT, FEATURE_NAMES};

/// Binary logistic classifier weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Human-readable model identifier
    pub model_id: String,
    #[serde(default)]
    pub model_version: String,
    /// Names the model was fitted with; checked against the schema when present
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_names: Vec<String>,
    /// One coefficient per feature, in fitted order
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    pub fn from_json(json: &str) -> Result<Self, MeritMapError> {
        let model: Self =
            serde_json::from_str(json).map_err(|source| MeritMapError::ArtifactParse {
                artifact: "model",
                source,
            })?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_file(path: &Path) -> Result<Self, MeritMapError> {
        Self::from_json(&read_artifact("model", path)?)
    }

    /// Check dimensions, finiteness and feature order
    pub fn validate(&self) -> Result<(), MeritMapError> {
        if self.model_id.trim().is_empty() {
            return Err(MeritMapError::InvalidArtifact(
                "model_id must not be empty".to_string(),
            ));
        }
        check_feature_names("model feature_names", &self.feature_names)?;
        check_vector("model coefficients", &self.coefficients)?;
        if !self.intercept.is_finite() {
            return Err(MeritMapError::InvalidArtifact(format!(
                "non-finite intercept: {}",
                self.intercept
            )));
        }
        Ok(())
    }

    /// Linear decision score `w · x + b`. Only sound on a validated model.
    pub(crate) fn decision_score(&self, scaled: &ScaledVector) -> f64 {
        dot(&self.coefficients, scaled.as_slice()) + self.intercept
    }

    /// Positive-class probability
    pub(crate) fn predict_proba(&self, scaled: &ScaledVector) -> f64 {
        sigmoid(self.decision_score(scaled))
    }

    pub fn coefficient(&self, index: usize) -> f64 {
        self.coefficients.get(index).copied().unwrap_or(0.0)
    }
}

/// Pre-fitted per-feature affine transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureScaler {
    /// `(x - mean) / scale`
    Standard {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        feature_names: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// `x * scale + min`
    MinMax {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        feature_names: Vec<String>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl FeatureScaler {
    pub fn from_json(json: &str) -> Result<Self, MeritMapError> {
        let scaler: Self =
            serde_json::from_str(json).map_err(|source| MeritMapError::ArtifactParse {
                artifact: "scaler",
                source,
            })?;
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn from_file(path: &Path) -> Result<Self, MeritMapError> {
        Self::from_json(&read_artifact("scaler", path)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FeatureScaler::Standard { .. } => "standard",
            FeatureScaler::MinMax { .. } => "min_max",
        }
    }

    pub fn validate(&self) -> Result<(), MeritMapError> {
        match self {
            FeatureScaler::Standard {
                feature_names,
                mean,
                scale,
            } => {
                check_feature_names("scaler feature_names", feature_names)?;
                check_vector("scaler mean", mean)?;
                check_vector("scaler scale", scale)?;
            }
            FeatureScaler::MinMax {
                feature_names,
                min,
                scale,
            } => {
                check_feature_names("scaler feature_names", feature_names)?;
                check_vector("scaler min", min)?;
                check_vector("scaler scale", scale)?;
            }
        }
        Ok(())
    }

    /// Apply the transform to a typed feature vector. Only sound on a
    /// validated scaler.
    pub(crate) fn transform(&self, vector: &FeatureVector) -> ScaledVector {
        let mut values = [0.0; FEATURE_COUNT];
        for (i, (slot, x)) in values.iter_mut().zip(vector.as_slice()).enumerate() {
            *slot = self.transform_one(i, *x);
        }
        ScaledVector { values }
    }

    /// Apply the transform to a raw slice, which must match the schema width
    pub(crate) fn transform_values(&self, raw: &[f64]) -> Result<ScaledVector, MeritMapError> {
        if raw.len() != FEATURE_COUNT {
            return Err(MeritMapError::length_mismatch(
                "feature vector",
                FEATURE_COUNT,
                raw.len(),
            ));
        }
        let mut values = [0.0; FEATURE_COUNT];
        for (i, (slot, x)) in values.iter_mut().zip(raw).enumerate() {
            *slot = self.transform_one(i, *x);
        }
        Ok(ScaledVector { values })
    }

    fn transform_one(&self, i: usize, x: f64) -> f64 {
        match self {
            FeatureScaler::Standard { mean, scale, .. } => {
                // Constant features were fitted with zero variance
                let s = if scale[i] == 0.0 { 1.0 } else { scale[i] };
                (x - mean[i]) / s
            }
            FeatureScaler::MinMax { min, scale, .. } => x * scale[i] + min[i],
        }
    }
}

/// Validated model/scaler pair, loaded once and shared read-only
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifacts {
    model: LogisticModel,
    scaler: FeatureScaler,
}

impl ModelArtifacts {
    pub fn new(model: LogisticModel, scaler: FeatureScaler) -> Result<Self, MeritMapError> {
        model.validate()?;
        scaler.validate()?;
        Ok(Self { model, scaler })
    }

    pub fn from_json(model_json: &str, scaler_json: &str) -> Result<Self, MeritMapError> {
        let model = LogisticModel::from_json(model_json)?;
        let scaler = FeatureScaler::from_json(scaler_json)?;
        Ok(Self { model, scaler })
    }

    /// Load both artifacts from disk
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, MeritMapError> {
        let model = LogisticModel::from_file(model_path)?;
        let scaler = FeatureScaler::from_file(scaler_path)?;
        info!(
            model_id = %model.model_id,
            model_version = %model.model_version,
            scaler = scaler.kind(),
            "model artifacts loaded"
        );
        Ok(Self { model, scaler })
    }

    pub fn model(&self) -> &LogisticModel {
        &self.model
    }

    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }
}

fn read_artifact(artifact: &'static str, path: &Path) -> Result<String, MeritMapError> {
    debug!(artifact, path = %path.display(), "reading artifact");
    std::fs::read_to_string(path).map_err(|source| MeritMapError::ArtifactLoad {
        artifact,
        path: path.to_path_buf(),
        source,
    })
}

fn check_vector(context: &str, values: &[f64]) -> Result<(), MeritMapError> {
    if values.len() != FEATURE_COUNT {
        return Err(MeritMapError::length_mismatch(
            context,
            FEATURE_COUNT,
            values.len(),
        ));
    }
    if let Some((index, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(MeritMapError::InvalidArtifact(format!(
            "non-finite value in {context} at index {index}: {value}"
        )));
    }
    Ok(())
}

fn check_feature_names(context: &str, names: &[String]) -> Result<(), MeritMapError> {
    if names.is_empty() {
        return Ok(());
    }
    if names.len() != FEATURE_COUNT {
        return Err(MeritMapError::length_mismatch(
            context,
            FEATURE_COUNT,
            names.len(),
        ));
    }
    for (i, (got, expected)) in names.iter().zip(FEATURE_NAMES.iter()).enumerate() {
        if got != expected {
            return Err(MeritMapError::SchemaMismatch {
                context: format!("{context}[{i}]"),
                expected: (*expected).to_string(),
                got: got.clone(),
            });
        }
    }
    Ok(())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(ai, bi)| ai * bi).sum()
}

/// Logistic sigmoid, split on sign so large |z| cannot overflow `exp`
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let ez = z.exp();
        ez / (1.0 + ez)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::collector::CandidateProfile;
    use crate::types::{Branch, ScalarField};

    pub(crate) const MODEL_JSON: &str = include_str!("../fixtures/placement_model.json");
    pub(crate) const SCALER_JSON: &str = include_str!("../fixtures/placement_scaler.json");

    pub(crate) fn fixture_artifacts() -> ModelArtifacts {
        ModelArtifacts::from_json(MODEL_JSON, SCALER_JSON).unwrap()
    }

    fn names() -> Vec<String> {
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fixture_artifacts_validate() {
        let artifacts = fixture_artifacts();
        assert_eq!(artifacts.model().coefficients.len(), FEATURE_COUNT);
        assert_eq!(artifacts.scaler().kind(), "standard");
    }

    #[test]
    fn test_sigmoid_properties() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(40.0) > 0.999_999);
        assert!(sigmoid(-40.0) < 1e-6);
        assert!((sigmoid(1.3) + sigmoid(-1.3) - 1.0).abs() < 1e-12);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert_eq!(sigmoid(1000.0), 1.0);
    }

    #[test]
    fn test_standard_scaler_transform() {
        let scaler = FeatureScaler::Standard {
            feature_names: Vec::new(),
            mean: vec![1.0; FEATURE_COUNT],
            scale: vec![2.0; FEATURE_COUNT],
        };
        let vector = CandidateProfile::default()
            .with(ScalarField::Cgpa, 9.0)
            .with_branch(Branch::It)
            .to_feature_vector();
        let scaled = scaler.transform(&vector);

        assert!((scaled.scalar(ScalarField::Cgpa) - 4.0).abs() < 1e-12);
        assert!((scaled.as_slice()[Branch::It.index()] - 0.0).abs() < 1e-12);
        assert!((scaled.as_slice()[Branch::Civil.index()] + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaler_zero_scale_is_identity_shift() {
        let mut scale = vec![1.0; FEATURE_COUNT];
        scale[0] = 0.0;
        let scaler = FeatureScaler::Standard {
            feature_names: Vec::new(),
            mean: vec![3.0; FEATURE_COUNT],
            scale,
        };
        let scaled = scaler.transform_values(&[5.0; FEATURE_COUNT]).unwrap();
        assert_eq!(scaled.as_slice()[0], 2.0);
    }

    #[test]
    fn test_min_max_scaler_transform() {
        let json = serde_json::json!({
            "kind": "min_max",
            "min": vec![-0.5; FEATURE_COUNT],
            "scale": vec![0.1; FEATURE_COUNT],
        })
        .to_string();
        let scaler = FeatureScaler::from_json(&json).unwrap();
        let scaled = scaler.transform_values(&[10.0; FEATURE_COUNT]).unwrap();
        assert!(scaled.as_slice().iter().all(|v| (v - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_transform_values_rejects_wrong_width() {
        let artifacts = fixture_artifacts();
        let result = artifacts.scaler().transform_values(&[0.0; 24]);
        assert!(matches!(result, Err(MeritMapError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_model_dimension_mismatch() {
        let model = LogisticModel {
            model_id: "short".to_string(),
            model_version: "0".to_string(),
            feature_names: Vec::new(),
            coefficients: vec![0.1; 24],
            intercept: 0.0,
        };
        assert!(matches!(
            model.validate(),
            Err(MeritMapError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_model_non_finite_values() {
        let mut coefficients = vec![0.1; FEATURE_COUNT];
        coefficients[7] = f64::NAN;
        let model = LogisticModel {
            model_id: "nan".to_string(),
            model_version: "0".to_string(),
            feature_names: Vec::new(),
            coefficients,
            intercept: 0.0,
        };
        assert!(matches!(
            model.validate(),
            Err(MeritMapError::InvalidArtifact(_))
        ));

        let model = LogisticModel {
            coefficients: vec![0.1; FEATURE_COUNT],
            intercept: f64::INFINITY,
            ..model
        };
        assert!(matches!(
            model.validate(),
            Err(MeritMapError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_short_scaler_rejected_before_use() {
        let scaler = FeatureScaler::Standard {
            feature_names: Vec::new(),
            mean: vec![0.0; 3],
            scale: vec![1.0; 3],
        };
        let model = fixture_artifacts().model().clone();
        assert!(matches!(
            ModelArtifacts::new(model, scaler),
            Err(MeritMapError::SchemaMismatch { .. })
        ));

        let short_model = LogisticModel {
            coefficients: vec![0.1; 3],
            ..fixture_artifacts().model().clone()
        };
        assert!(matches!(
            ModelArtifacts::new(short_model, fixture_artifacts().scaler().clone()),
            Err(MeritMapError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_feature_order_mismatch() {
        let mut feature_names = names();
        feature_names.swap(0, 1);
        let model = LogisticModel {
            model_id: "swapped".to_string(),
            model_version: "0".to_string(),
            feature_names,
            coefficients: vec![0.1; FEATURE_COUNT],
            intercept: 0.0,
        };
        match model.validate() {
            Err(MeritMapError::SchemaMismatch { expected, got, .. }) => {
                assert_eq!(expected, "cgpa");
                assert_eq!(got, "college_tier");
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_json_is_parse_error() {
        assert!(matches!(
            LogisticModel::from_json("{ not json"),
            Err(MeritMapError::ArtifactParse { artifact: "model", .. })
        ));
        assert!(matches!(
            FeatureScaler::from_json(r#"{ "kind": "robust", "center": [] }"#),
            Err(MeritMapError::ArtifactParse { artifact: "scaler", .. })
        ));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let result = ModelArtifacts::load(
            Path::new("/nonexistent/placement_model.json"),
            Path::new("/nonexistent/placement_scaler.json"),
        );
        assert!(matches!(
            result,
            Err(MeritMapError::ArtifactLoad { artifact: "model", .. })
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("meritmap-artifacts-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let model_path = dir.join("placement_model.json");
        let scaler_path = dir.join("placement_scaler.json");
        std::fs::write(&model_path, MODEL_JSON).unwrap();
        std::fs::write(&scaler_path, SCALER_JSON).unwrap();

        let loaded = ModelArtifacts::load(&model_path, &scaler_path).unwrap();
        assert_eq!(loaded, fixture_artifacts());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
