//! Readiness evaluation
//!
//! This module turns a candidate profile into a `ReadinessResult`:
//! scale -> score -> categorize -> attribute -> pick feedback.
//! The evaluator holds the loaded artifacts behind an `Arc` and never mutates
//! them, so one instance can serve any number of sequential or concurrent
//! requests.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::artifacts::{sigmoid, ModelArtifacts};
use crate::collector::CandidateProfile;
use crate::config::EvaluatorConfig;
use crate::error::MeritMapError;
use crate::feedback::pick_feedback;
use crate::types::{
    Contribution, CuratedFeature, FeatureVector, ReadinessCategory, ReadinessResult, ScaledVector,
};

/// Stateless evaluator over an immutable model/scaler pair
#[derive(Debug, Clone)]
pub struct ReadinessEvaluator {
    artifacts: Arc<ModelArtifacts>,
}

impl ReadinessEvaluator {
    pub fn new(artifacts: ModelArtifacts) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }

    /// Share artifacts already held elsewhere
    pub fn with_shared(artifacts: Arc<ModelArtifacts>) -> Self {
        Self { artifacts }
    }

    /// Load artifacts from the paths in `config`
    pub fn from_config(config: &EvaluatorConfig) -> Result<Self, MeritMapError> {
        let artifacts = ModelArtifacts::load(&config.model_path, &config.scaler_path)?;
        Ok(Self::new(artifacts))
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    /// Apply the fitted scaler
    pub fn normalize(&self, vector: &FeatureVector) -> ScaledVector {
        self.artifacts.scaler().transform(vector)
    }

    /// Apply the fitted scaler to an untyped vector in fitted order
    pub fn normalize_values(&self, raw: &[f64]) -> Result<ScaledVector, MeritMapError> {
        self.artifacts.scaler().transform_values(raw)
    }

    /// Positive-class probability for a scaled vector
    pub fn score(&self, scaled: &ScaledVector) -> f64 {
        self.artifacts.model().predict_proba(scaled)
    }

    pub fn categorize(probability: f64) -> ReadinessCategory {
        ReadinessCategory::from_probability(probability)
    }

    /// Signed contribution of each curated feature
    pub fn attribute(&self, scaled: &ScaledVector) -> Vec<Contribution> {
        attribute(scaled, &self.artifacts.model().coefficients)
    }

    /// Run the full evaluation for one profile.
    ///
    /// Fails only when the artifacts overflow on this input and the decision
    /// score is not finite.
    pub fn evaluate(&self, profile: &CandidateProfile) -> Result<ReadinessResult, MeritMapError> {
        let vector = profile.to_feature_vector();
        let scaled = self.normalize(&vector);

        let model = self.artifacts.model();
        let decision_score = model.decision_score(&scaled);
        if !decision_score.is_finite() {
            warn!(decision_score, "non-finite decision score");
            return Err(MeritMapError::NonFiniteScore(decision_score));
        }
        let probability = sigmoid(decision_score);
        let category = Self::categorize(probability);

        let contributions = self.attribute(&scaled);
        let (weaknesses, strengths) = pick_feedback(&contributions);

        debug!(
            probability,
            decision_score,
            category = category.as_str(),
            weaknesses = weaknesses.len(),
            strengths = strengths.len(),
            "profile evaluated"
        );

        Ok(ReadinessResult {
            probability,
            decision_score,
            category,
            contributions,
            weaknesses,
            strengths,
        })
    }
}

/// `scaled_value * coefficient` for each curated feature, in curated order
pub fn attribute(scaled: &ScaledVector, coefficients: &[f64]) -> Vec<Contribution> {
    CuratedFeature::ALL
        .iter()
        .map(|feature| {
            let index = feature.field().index();
            let coefficient = coefficients.get(index).copied().unwrap_or(0.0);
            Contribution {
                feature: *feature,
                value: scaled.as_slice()[index] * coefficient,
            }
        })
        .collect()
}
