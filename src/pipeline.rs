//! Pipeline orchestration
//!
//! This module provides the public entry points for MeritMap.
//! It runs the full path from a profile (typed or JSON) to a report.

use crate::artifacts::ModelArtifacts;
use crate::collector::{CandidateProfile, ProfileInput};
use crate::config::EvaluatorConfig;
use crate::encoder::ReportEncoder;
use crate::error::MeritMapError;
use crate::evaluator::ReadinessEvaluator;
use crate::types::ReadinessReport;

/// Evaluate one JSON profile against JSON artifacts and return report JSON.
///
/// # Arguments
/// * `model_json` - Serialized logistic model
/// * `scaler_json` - Serialized feature scaler
/// * `profile_json` - Candidate profile; missing fields take their defaults
///
/// # Example
/// ```ignore
/// let report = evaluate_profile_json(&model, &scaler, r#"{"cgpa": 8.2, "branch": "IT"}"#)?;
/// ```
pub fn evaluate_profile_json(
    model_json: &str,
    scaler_json: &str,
    profile_json: &str,
) -> Result<String, MeritMapError> {
    let artifacts = ModelArtifacts::from_json(model_json, scaler_json)?;
    ReadinessPipeline::new(artifacts).process_json(profile_json)
}

/// Evaluator plus encoder, reused across requests.
///
/// Holds no per-request state: every call is independent.
#[derive(Debug, Clone)]
pub struct ReadinessPipeline {
    evaluator: ReadinessEvaluator,
    instance_id: String,
}

impl ReadinessPipeline {
    pub fn new(artifacts: ModelArtifacts) -> Self {
        Self::with_evaluator(ReadinessEvaluator::new(artifacts))
    }

    pub fn with_evaluator(evaluator: ReadinessEvaluator) -> Self {
        Self {
            evaluator,
            instance_id: ReportEncoder::new().instance_id().to_string(),
        }
    }

    /// Load artifacts from the configured paths
    pub fn from_config(config: &EvaluatorConfig) -> Result<Self, MeritMapError> {
        Ok(Self::with_evaluator(ReadinessEvaluator::from_config(config)?))
    }

    pub fn evaluator(&self) -> &ReadinessEvaluator {
        &self.evaluator
    }

    /// Evaluate a typed profile into a report
    pub fn process_profile(
        &self,
        profile: &CandidateProfile,
    ) -> Result<ReadinessReport, MeritMapError> {
        let result = self.evaluator.evaluate(profile)?;
        Ok(self
            .encoder()
            .encode(profile, &result, self.evaluator.artifacts()))
    }

    /// Parse a JSON profile, evaluate it and return compact report JSON
    pub fn process_json(&self, profile_json: &str) -> Result<String, MeritMapError> {
        let profile = ProfileInput::from_json(profile_json)?.into_profile();
        let report = self.process_profile(&profile)?;
        serde_json::to_string(&report).map_err(MeritMapError::Json)
    }

    /// Evaluate each non-empty NDJSON line independently
    pub fn process_ndjson(&self, input: &str) -> Result<Vec<ReadinessReport>, MeritMapError> {
        input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                let profile = ProfileInput::from_json(line)?.into_profile();
                self.process_profile(&profile)
            })
            .collect()
    }

    fn encoder(&self) -> ReportEncoder {
        ReportEncoder::with_instance_id(self.instance_id.clone())
    }
}
