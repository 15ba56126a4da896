//! Input collection
//!
//! This module gathers candidate attributes into a `CandidateProfile`:
//! - Every scalar field has a fixed range, default and kind
//! - Values are clamped on the way in, so a profile is always in range
//! - Profiles expand into the fitted `FeatureVector` with a one-hot branch

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::MeritMapError;
use crate::types::{Branch, FeatureVector, ScalarField, SCALAR_COUNT};

/// How a field's values are constrained beyond its range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Continuous,
    Integer,
    /// Integer restricted to the listed options
    Choice(&'static [f64]),
}

/// Form section a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldGroup {
    #[serde(rename = "Academic & Technical")]
    AcademicTechnical,
    #[serde(rename = "Personal & Engagement")]
    PersonalEngagement,
    #[serde(rename = "Profile")]
    Profile,
}

impl FieldGroup {
    /// Groups in form order
    pub const ALL: [FieldGroup; 3] = [
        FieldGroup::AcademicTechnical,
        FieldGroup::PersonalEngagement,
        FieldGroup::Profile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            FieldGroup::AcademicTechnical => "Academic & Technical",
            FieldGroup::PersonalEngagement => "Personal & Engagement",
            FieldGroup::Profile => "Profile",
        }
    }
}

/// Range and presentation metadata for one scalar field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub field: ScalarField,
    pub label: &'static str,
    pub group: FieldGroup,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Bring an arbitrary value into this field's domain
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        let bounded = value.clamp(self.min, self.max);
        match self.kind {
            FieldKind::Continuous => bounded,
            FieldKind::Integer => bounded.round(),
            FieldKind::Choice(options) => nearest_option(options, bounded).unwrap_or(self.default),
        }
    }
}

fn nearest_option(options: &[f64], value: f64) -> Option<f64> {
    options
        .iter()
        .copied()
        .min_by(|a, b| (a - value).abs().total_cmp(&(b - value).abs()))
}

const TIER_OPTIONS: &[f64] = &[1.0, 2.0, 3.0];
const VOLUNTEER_OPTIONS: &[f64] = &[0.0, 1.0];

/// Field table in fitted order, so `FIELD_SPECS[field.index()]` is `field`'s spec
#[rustfmt::skip]
pub const FIELD_SPECS: [FieldSpec; SCALAR_COUNT] = [
    spec(ScalarField::Cgpa, "CGPA", FieldGroup::AcademicTechnical, 4.0, 10.0, 7.0, FieldKind::Continuous),
    spec(ScalarField::CollegeTier, "College Tier", FieldGroup::Profile, 1.0, 3.0, 1.0, FieldKind::Choice(TIER_OPTIONS)),
    spec(ScalarField::InternshipsCount, "Internships Count", FieldGroup::AcademicTechnical, 0.0, 8.0, 1.0, FieldKind::Integer),
    spec(ScalarField::ProjectsCount, "Projects Count", FieldGroup::AcademicTechnical, 0.0, 13.0, 2.0, FieldKind::Integer),
    spec(ScalarField::CertificationsCount, "Certifications Count", FieldGroup::AcademicTechnical, 0.0, 11.0, 2.0, FieldKind::Integer),
    spec(ScalarField::CodingSkillScore, "Coding Skill Score", FieldGroup::AcademicTechnical, 0.0, 100.0, 60.0, FieldKind::Integer),
    spec(ScalarField::AptitudeScore, "Aptitude Score", FieldGroup::AcademicTechnical, 0.0, 100.0, 60.0, FieldKind::Integer),
    spec(ScalarField::CommunicationSkillScore, "Communication Skill Score", FieldGroup::PersonalEngagement, 0.0, 100.0, 60.0, FieldKind::Integer),
    spec(ScalarField::LogicalReasoningScore, "Logical Reasoning Score", FieldGroup::AcademicTechnical, 0.0, 100.0, 60.0, FieldKind::Integer),
    spec(ScalarField::HackathonsParticipated, "Hackathons Participated", FieldGroup::Profile, 0.0, 8.0, 1.0, FieldKind::Integer),
    spec(ScalarField::GithubRepos, "GitHub Repositories", FieldGroup::PersonalEngagement, 0.0, 16.0, 3.0, FieldKind::Integer),
    spec(ScalarField::LinkedinConnections, "LinkedIn Connections", FieldGroup::PersonalEngagement, 50.0, 1000.0, 200.0, FieldKind::Integer),
    spec(ScalarField::MockInterviewScore, "Mock Interview Score", FieldGroup::PersonalEngagement, 0.0, 100.0, 60.0, FieldKind::Integer),
    spec(ScalarField::AttendancePercentage, "Attendance Percentage", FieldGroup::PersonalEngagement, 50.0, 100.0, 75.0, FieldKind::Integer),
    spec(ScalarField::Backlogs, "Backlogs", FieldGroup::AcademicTechnical, 0.0, 6.0, 0.0, FieldKind::Integer),
    spec(ScalarField::ExtracurricularScore, "Extracurricular Score", FieldGroup::PersonalEngagement, 0.0, 100.0, 50.0, FieldKind::Integer),
    spec(ScalarField::LeadershipScore, "Leadership Score", FieldGroup::PersonalEngagement, 0.0, 100.0, 40.0, FieldKind::Integer),
    spec(ScalarField::VolunteerExperience, "Volunteer Experience", FieldGroup::Profile, 0.0, 1.0, 0.0, FieldKind::Choice(VOLUNTEER_OPTIONS)),
    spec(ScalarField::SleepHours, "Sleep Hours", FieldGroup::PersonalEngagement, 3.0, 10.0, 7.0, FieldKind::Continuous),
    spec(ScalarField::StudyHoursPerDay, "Study Hours per Day", FieldGroup::PersonalEngagement, 0.5, 10.0, 3.0, FieldKind::Continuous),
];

// A misplaced or missing entry fails the build.
const _: () = {
    let mut i = 0;
    while i < SCALAR_COUNT {
        assert!(FIELD_SPECS[i].field as usize == i, "FIELD_SPECS out of fitted order");
        i += 1;
    }
};

#[allow(clippy::too_many_arguments)]
const fn spec(
    field: ScalarField,
    label: &'static str,
    group: FieldGroup,
    min: f64,
    max: f64,
    default: f64,
    kind: FieldKind,
) -> FieldSpec {
    FieldSpec {
        field,
        label,
        group,
        min,
        max,
        default,
        kind,
    }
}

/// Range and metadata for a field
pub fn field_spec(field: ScalarField) -> &'static FieldSpec {
    &FIELD_SPECS[field.index()]
}

/// Bounded candidate attributes plus the selected branch
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProfile {
    scalars: [f64; SCALAR_COUNT],
    branch: Branch,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        let mut scalars = [0.0; SCALAR_COUNT];
        for spec in &FIELD_SPECS {
            scalars[spec.field.index()] = spec.default;
        }
        Self {
            scalars,
            branch: Branch::default(),
        }
    }
}

impl CandidateProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: ScalarField) -> f64 {
        self.scalars[field.index()]
    }

    /// Set a field, clamping into its range. Returns the stored value.
    pub fn set(&mut self, field: ScalarField, value: f64) -> f64 {
        let stored = field_spec(field).clamp(value);
        self.scalars[field.index()] = stored;
        stored
    }

    /// Builder form of [`CandidateProfile::set`]
    pub fn with(mut self, field: ScalarField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    pub fn set_branch(&mut self, branch: Branch) {
        self.branch = branch;
    }

    pub fn with_branch(mut self, branch: Branch) -> Self {
        self.branch = branch;
        self
    }

    /// Apply a `name=value` override, e.g. `cgpa=8.5` or `branch=IT`
    pub fn apply_override(&mut self, assignment: &str) -> Result<(), MeritMapError> {
        let (name, raw) = assignment
            .split_once('=')
            .ok_or_else(|| MeritMapError::InvalidOverride(assignment.to_string()))?;
        let name = name.trim();
        let raw = raw.trim();

        if name == "branch" {
            self.branch = raw.parse()?;
            return Ok(());
        }

        let field: ScalarField = name.parse()?;
        let value: f64 = raw
            .parse()
            .map_err(|_| MeritMapError::InvalidOverride(assignment.to_string()))?;
        self.set(field, value);
        Ok(())
    }

    /// Expand into the fitted feature vector
    pub fn to_feature_vector(&self) -> FeatureVector {
        FeatureVector::from_parts(&self.scalars, self.branch)
    }

    /// Named view of the inputs, used for reports
    pub fn to_input(&self) -> ProfileInput {
        ProfileInput {
            fields: ScalarField::ALL
                .iter()
                .map(|f| (*f, self.get(*f)))
                .collect(),
            branch: Some(self.branch),
        }
    }
}

/// Loosely specified profile, as read from JSON.
///
/// Every field is optional; absent fields take their defaults and present
/// ones are clamped. Unknown keys fail to parse as a `ScalarField`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    #[serde(flatten)]
    pub fields: BTreeMap<ScalarField, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<Branch>,
}

impl ProfileInput {
    pub fn from_json(json: &str) -> Result<Self, MeritMapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_profile(self) -> CandidateProfile {
        let mut profile = CandidateProfile::default();
        for (field, value) in self.fields {
            profile.set(field, value);
        }
        if let Some(branch) = self.branch {
            profile.set_branch(branch);
        }
        profile
    }
}

impl From<ProfileInput> for CandidateProfile {
    fn from(input: ProfileInput) -> Self {
        input.into_profile()
    }
}
