//! Report encoding
//!
//! This module wraps an evaluation result into a `ReadinessReport`:
//! producer and model metadata, the inputs that were scored, and the result
//! with its category presentation and feedback messages.

use crate::artifacts::ModelArtifacts;
use crate::collector::CandidateProfile;
use crate::error::MeritMapError;
use crate::feedback::{strength_text, weakness_text, NO_STRENGTHS_TEXT, NO_WEAKNESSES_TEXT};
use crate::types::{
    CuratedFeature, FeedbackItem, FeedbackSection, ReadinessReport, ReadinessResult,
    ReportCategory, ReportModel, ReportProducer, ReportResult,
};
use crate::{MERITMAP_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Report encoder for producing JSON payloads
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Build a report for one evaluated profile
    pub fn encode(
        &self,
        profile: &CandidateProfile,
        result: &ReadinessResult,
        artifacts: &ModelArtifacts,
    ) -> ReadinessReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: MERITMAP_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let model = ReportModel {
            model_id: artifacts.model().model_id.clone(),
            model_version: artifacts.model().model_version.clone(),
            scaler: artifacts.scaler().kind().to_string(),
        };

        ReadinessReport {
            report_version: REPORT_VERSION.to_string(),
            evaluation_id: Uuid::new_v4().to_string(),
            evaluated_at_utc: Utc::now().to_rfc3339(),
            producer,
            model,
            profile: profile.to_input(),
            result: build_result(result),
        }
    }

    /// Encode to compact JSON
    pub fn encode_to_json(
        &self,
        profile: &CandidateProfile,
        result: &ReadinessResult,
        artifacts: &ModelArtifacts,
    ) -> Result<String, MeritMapError> {
        let report = self.encode(profile, result, artifacts);
        serde_json::to_string(&report).map_err(MeritMapError::Json)
    }

    /// Encode to pretty-printed JSON
    pub fn encode_to_json_pretty(
        &self,
        profile: &CandidateProfile,
        result: &ReadinessResult,
        artifacts: &ModelArtifacts,
    ) -> Result<String, MeritMapError> {
        let report = self.encode(profile, result, artifacts);
        serde_json::to_string_pretty(&report).map_err(MeritMapError::Json)
    }
}

fn build_result(result: &ReadinessResult) -> ReportResult {
    let category = ReportCategory {
        code: result.category,
        label: result.category.label().to_string(),
        marker: result.category.marker().to_string(),
        severity: result.category.severity(),
    };

    ReportResult {
        probability: result.probability,
        decision_score: result.decision_score,
        category,
        contributions: result.contributions.clone(),
        weaknesses: build_section(result, &result.weaknesses, weakness_text, NO_WEAKNESSES_TEXT),
        strengths: build_section(result, &result.strengths, strength_text, NO_STRENGTHS_TEXT),
    }
}

fn build_section(
    result: &ReadinessResult,
    features: &[CuratedFeature],
    text: fn(CuratedFeature) -> &'static str,
    fallback: &str,
) -> FeedbackSection {
    let items: Vec<FeedbackItem> = features
        .iter()
        .map(|feature| FeedbackItem {
            feature: *feature,
            message: text(*feature).to_string(),
            contribution: result.contribution(*feature).unwrap_or(0.0),
        })
        .collect();

    let fallback = if items.is_empty() {
        Some(fallback.to_string())
    } else {
        None
    };

    FeedbackSection { items, fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::tests::fixture_artifacts;
    use crate::evaluator::ReadinessEvaluator;
    use crate::types::{Branch, ReadinessCategory, ScalarField, Severity};
    use pretty_assertions::assert_eq;

    fn evaluate(profile: &CandidateProfile) -> (ReadinessResult, ModelArtifacts) {
        let artifacts = fixture_artifacts();
        let evaluator = ReadinessEvaluator::new(artifacts.clone());
        (evaluator.evaluate(profile).unwrap(), artifacts)
    }

    #[test]
    fn test_encode_report() {
        let profile = CandidateProfile::default().with_branch(Branch::It);
        let (result, artifacts) = evaluate(&profile);
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let report = encoder.encode(&profile, &result, &artifacts);

        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.version, MERITMAP_VERSION);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.model.model_id, "placement-logreg");
        assert_eq!(report.model.scaler, "standard");
        assert_eq!(report.profile.branch, Some(Branch::It));
        assert_eq!(report.profile.fields.len(), 20);

        assert_eq!(report.result.category.code, ReadinessCategory::StrongReadiness);
        assert_eq!(report.result.category.label, "Strong Placement Readiness");
        assert_eq!(report.result.category.severity, Severity::Success);

        assert_eq!(report.result.weaknesses.items.len(), 3);
        assert_eq!(
            report.result.weaknesses.items[0].message,
            "Gain more internship experience."
        );
        assert_eq!(report.result.weaknesses.fallback, None);
        assert_eq!(
            report.result.strengths.items[0].message,
            "Minimal academic backlogs."
        );
    }

    #[test]
    fn test_empty_sections_carry_fallback_text() {
        let mut profile = CandidateProfile::default().with_branch(Branch::It);
        for field in ScalarField::ALL {
            profile.set(field, f64::MAX);
        }
        let profile = profile
            .with(ScalarField::CollegeTier, 1.0)
            .with(ScalarField::Backlogs, 0.0);
        let (result, artifacts) = evaluate(&profile);
        let report = ReportEncoder::new().encode(&profile, &result, &artifacts);

        assert!(report.result.weaknesses.items.is_empty());
        assert_eq!(
            report.result.weaknesses.fallback.as_deref(),
            Some(NO_WEAKNESSES_TEXT)
        );
        assert!(!report.result.strengths.items.is_empty());
    }

    #[test]
    fn test_each_report_gets_a_fresh_evaluation_id() {
        let profile = CandidateProfile::default();
        let (result, artifacts) = evaluate(&profile);
        let encoder = ReportEncoder::new();
        let a = encoder.encode(&profile, &result, &artifacts);
        let b = encoder.encode(&profile, &result, &artifacts);

        assert_ne!(a.evaluation_id, b.evaluation_id);
        assert_eq!(a.producer.instance_id, b.producer.instance_id);
        assert_eq!(a.result, b.result);
    }

    #[test]
    fn test_encode_to_json() {
        let profile = CandidateProfile::default().with(ScalarField::Backlogs, 4.0);
        let (result, artifacts) = evaluate(&profile);
        let json = ReportEncoder::new()
            .encode_to_json(&profile, &result, &artifacts)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("evaluation_id").is_some());
        assert!(parsed.get("evaluated_at_utc").is_some());
        assert_eq!(parsed["profile"]["backlogs"], 4.0);
        assert_eq!(parsed["profile"]["branch"], "Civil");
        assert!(parsed["result"]["probability"].as_f64().is_some());
        assert_eq!(parsed["result"]["contributions"][0]["feature"], "coding_skill_score");

        let back: ReadinessReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.result.category.code, result.category);
    }
}
