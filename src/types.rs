//! Core types for MeritMap
//!
//! This module defines the data structures that flow through an evaluation:
//! the fitted feature schema, feature vectors, readiness categories, curated
//! features and the final readiness result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MeritMapError;

/// Number of scalar (non-branch) features
pub const SCALAR_COUNT: usize = 20;

/// Number of branch one-hot flags
pub const BRANCH_COUNT: usize = 5;

/// Width of the fitted feature vector
pub const FEATURE_COUNT: usize = SCALAR_COUNT + BRANCH_COUNT;

/// Feature names in the exact order the scaler and model were fitted with
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "cgpa",
    "college_tier",
    "internships_count",
    "projects_count",
    "certifications_count",
    "coding_skill_score",
    "aptitude_score",
    "communication_skill_score",
    "logical_reasoning_score",
    "hackathons_participated",
    "github_repos",
    "linkedin_connections",
    "mock_interview_score",
    "attendance_percentage",
    "backlogs",
    "extracurricular_score",
    "leadership_score",
    "volunteer_experience",
    "sleep_hours",
    "study_hours_per_day",
    "branch_Civil",
    "branch_ECE",
    "branch_EEE",
    "branch_IT",
    "branch_Mechanical",
];

/// Scalar input fields. Discriminants are positions in the fitted vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarField {
    Cgpa = 0,
    CollegeTier = 1,
    InternshipsCount = 2,
    ProjectsCount = 3,
    CertificationsCount = 4,
    CodingSkillScore = 5,
    AptitudeScore = 6,
    CommunicationSkillScore = 7,
    LogicalReasoningScore = 8,
    HackathonsParticipated = 9,
    GithubRepos = 10,
    LinkedinConnections = 11,
    MockInterviewScore = 12,
    AttendancePercentage = 13,
    Backlogs = 14,
    ExtracurricularScore = 15,
    LeadershipScore = 16,
    VolunteerExperience = 17,
    SleepHours = 18,
    StudyHoursPerDay = 19,
}

impl ScalarField {
    pub const ALL: [ScalarField; SCALAR_COUNT] = [
        ScalarField::Cgpa,
        ScalarField::CollegeTier,
        ScalarField::InternshipsCount,
        ScalarField::ProjectsCount,
        ScalarField::CertificationsCount,
        ScalarField::CodingSkillScore,
        ScalarField::AptitudeScore,
        ScalarField::CommunicationSkillScore,
        ScalarField::LogicalReasoningScore,
        ScalarField::HackathonsParticipated,
        ScalarField::GithubRepos,
        ScalarField::LinkedinConnections,
        ScalarField::MockInterviewScore,
        ScalarField::AttendancePercentage,
        ScalarField::Backlogs,
        ScalarField::ExtracurricularScore,
        ScalarField::LeadershipScore,
        ScalarField::VolunteerExperience,
        ScalarField::SleepHours,
        ScalarField::StudyHoursPerDay,
    ];

    /// Position in the fitted feature vector
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }
}

impl fmt::Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarField {
    type Err = MeritMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalarField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| MeritMapError::UnknownField(s.to_string()))
    }
}

/// Engineering branch, one-hot encoded into the last five features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Branch {
    #[default]
    Civil = 0,
    #[serde(rename = "ECE")]
    Ece = 1,
    #[serde(rename = "EEE")]
    Eee = 2,
    #[serde(rename = "IT")]
    It = 3,
    Mechanical = 4,
}

impl Branch {
    pub const ALL: [Branch; BRANCH_COUNT] = [
        Branch::Civil,
        Branch::Ece,
        Branch::Eee,
        Branch::It,
        Branch::Mechanical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Civil => "Civil",
            Branch::Ece => "ECE",
            Branch::Eee => "EEE",
            Branch::It => "IT",
            Branch::Mechanical => "Mechanical",
        }
    }

    /// Position of this branch's flag in the fitted feature vector
    pub fn index(self) -> usize {
        SCALAR_COUNT + self as usize
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = MeritMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .iter()
            .copied()
            .find(|branch| branch.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| MeritMapError::UnknownBranch(s.to_string()))
    }
}

/// Ordered model input matching the fitted schema.
///
/// Only the collector builds these, so the branch one-hot invariant holds for
/// every instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub(crate) fn from_parts(scalars: &[f64; SCALAR_COUNT], branch: Branch) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        values[..SCALAR_COUNT].copy_from_slice(scalars);
        values[branch.index()] = 1.0;
        Self { values }
    }

    pub fn scalar(&self, field: ScalarField) -> f64 {
        self.values[field.index()]
    }

    /// One-hot flag for the given branch (1.0 or 0.0)
    pub fn branch_flag(&self, branch: Branch) -> f64 {
        self.values[branch.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Feature vector after the fitted scaler has been applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledVector {
    pub(crate) values: [f64; FEATURE_COUNT],
}

impl ScaledVector {
    pub fn scalar(&self, field: ScalarField) -> f64 {
        self.values[field.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Visual severity attached to each category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Success,
}

/// Ordinal readiness bucket derived from the probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessCategory {
    HighImprovement,
    ModerateImprovement,
    StrongReadiness,
    ExcellentReadiness,
}

impl ReadinessCategory {
    pub const ALL: [ReadinessCategory; 4] = [
        ReadinessCategory::HighImprovement,
        ReadinessCategory::ModerateImprovement,
        ReadinessCategory::StrongReadiness,
        ReadinessCategory::ExcellentReadiness,
    ];

    /// Bucket a probability. Bands are half-open on the right except the last.
    /// NaN lands in the lowest band.
    pub fn from_probability(probability: f64) -> Self {
        if probability.is_nan() || probability < 0.20 {
            ReadinessCategory::HighImprovement
        } else if probability < 0.50 {
            ReadinessCategory::ModerateImprovement
        } else if probability < 0.80 {
            ReadinessCategory::StrongReadiness
        } else {
            ReadinessCategory::ExcellentReadiness
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReadinessCategory::HighImprovement => "high_improvement",
            ReadinessCategory::ModerateImprovement => "moderate_improvement",
            ReadinessCategory::StrongReadiness => "strong_readiness",
            ReadinessCategory::ExcellentReadiness => "excellent_readiness",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadinessCategory::HighImprovement => "High Improvement Required",
            ReadinessCategory::ModerateImprovement => "Moderate Improvement Required",
            ReadinessCategory::StrongReadiness => "Strong Placement Readiness",
            ReadinessCategory::ExcellentReadiness => "Excellent Placement Readiness",
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            ReadinessCategory::HighImprovement => "🔴",
            ReadinessCategory::ModerateImprovement => "🟡",
            ReadinessCategory::StrongReadiness => "🟢",
            ReadinessCategory::ExcellentReadiness => "🔵",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ReadinessCategory::HighImprovement => Severity::Error,
            ReadinessCategory::ModerateImprovement => Severity::Warning,
            ReadinessCategory::StrongReadiness | ReadinessCategory::ExcellentReadiness => {
                Severity::Success
            }
        }
    }
}

impl fmt::Display for ReadinessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker(), self.label())
    }
}

/// The interpretable subset of features used for feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CuratedFeature {
    CodingSkillScore,
    InternshipsCount,
    MockInterviewScore,
    CommunicationSkillScore,
    AptitudeScore,
    Cgpa,
    Backlogs,
}

impl CuratedFeature {
    /// Curated features in attribution order; ties in feedback keep this order
    pub const ALL: [CuratedFeature; 7] = [
        CuratedFeature::CodingSkillScore,
        CuratedFeature::InternshipsCount,
        CuratedFeature::MockInterviewScore,
        CuratedFeature::CommunicationSkillScore,
        CuratedFeature::AptitudeScore,
        CuratedFeature::Cgpa,
        CuratedFeature::Backlogs,
    ];

    pub fn field(self) -> ScalarField {
        match self {
            CuratedFeature::CodingSkillScore => ScalarField::CodingSkillScore,
            CuratedFeature::InternshipsCount => ScalarField::InternshipsCount,
            CuratedFeature::MockInterviewScore => ScalarField::MockInterviewScore,
            CuratedFeature::CommunicationSkillScore => ScalarField::CommunicationSkillScore,
            CuratedFeature::AptitudeScore => ScalarField::AptitudeScore,
            CuratedFeature::Cgpa => ScalarField::Cgpa,
            CuratedFeature::Backlogs => ScalarField::Backlogs,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.field().as_str()
    }
}

/// Signed influence of one curated feature on the decision score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub feature: CuratedFeature,
    pub value: f64,
}

/// Outcome of a single evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessResult {
    /// Positive-class probability in [0, 1]
    pub probability: f64,
    /// Linear decision score before the sigmoid
    pub decision_score: f64,
    pub category: ReadinessCategory,
    /// Curated contributions in `CuratedFeature::ALL` order
    pub contributions: Vec<Contribution>,
    /// Up to 3 features with the most negative contribution
    pub weaknesses: Vec<CuratedFeature>,
    /// Up to 2 features with the most positive contribution
    pub strengths: Vec<CuratedFeature>,
}

impl ReadinessResult {
    pub fn contribution(&self, feature: CuratedFeature) -> Option<f64> {
        self.contributions
            .iter()
            .find(|c| c.feature == feature)
            .map(|c| c.value)
    }
}

// ============================================================================
// Report payload
// ============================================================================

/// Producer metadata embedded in every report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Which artifacts produced the result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportModel {
    pub model_id: String,
    pub model_version: String,
    pub scaler: String,
}

/// Category with its presentation attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCategory {
    pub code: ReadinessCategory,
    pub label: String,
    pub marker: String,
    pub severity: Severity,
}

/// One feedback bullet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub feature: CuratedFeature,
    pub message: String,
    pub contribution: f64,
}

/// Rendered feedback section; `fallback` is set when `items` is empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSection {
    pub items: Vec<FeedbackItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

/// Evaluation outcome as written to a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResult {
    pub probability: f64,
    pub decision_score: f64,
    pub category: ReportCategory,
    pub contributions: Vec<Contribution>,
    pub weaknesses: FeedbackSection,
    pub strengths: FeedbackSection,
}

/// Full serialized evaluation report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub report_version: String,
    pub evaluation_id: String,
    pub evaluated_at_utc: String,
    pub producer: ReportProducer,
    pub model: ReportModel,
    pub profile: crate::collector::ProfileInput,
    pub result: ReportResult,
}
