//! Strength/weakness selection
//!
//! Feedback is restricted to the curated features. Messages come from two
//! exhaustive lookups, so adding a curated feature without text fails to
//! compile.

use crate::types::{Contribution, CuratedFeature};

/// Maximum number of weaknesses reported
pub const MAX_WEAKNESSES: usize = 3;

/// Maximum number of strengths reported
pub const MAX_STRENGTHS: usize = 2;

/// Shown when no curated feature pulls the score down
pub const NO_WEAKNESSES_TEXT: &str = "No major weak areas detected.";

/// Shown when no curated feature pushes the score up
pub const NO_STRENGTHS_TEXT: &str = "Balanced profile.";

pub fn weakness_text(feature: CuratedFeature) -> &'static str {
    match feature {
        CuratedFeature::CodingSkillScore => "Improve coding skills through consistent practice.",
        CuratedFeature::InternshipsCount => "Gain more internship experience.",
        CuratedFeature::MockInterviewScore => "Practice mock interviews.",
        CuratedFeature::CommunicationSkillScore => "Work on communication skills.",
        CuratedFeature::AptitudeScore => "Strengthen aptitude preparation.",
        CuratedFeature::Cgpa => "Focus on improving academic consistency.",
        CuratedFeature::Backlogs => "Clearing backlogs will significantly improve readiness.",
    }
}

pub fn strength_text(feature: CuratedFeature) -> &'static str {
    match feature {
        CuratedFeature::CodingSkillScore => "Strong coding foundation.",
        CuratedFeature::InternshipsCount => "Good internship exposure.",
        CuratedFeature::MockInterviewScore => "Strong interview performance.",
        CuratedFeature::CommunicationSkillScore => "Good communication ability.",
        CuratedFeature::AptitudeScore => "Strong aptitude performance.",
        CuratedFeature::Cgpa => "Solid academic record.",
        CuratedFeature::Backlogs => "Minimal academic backlogs.",
    }
}

/// Pick `(weaknesses, strengths)` from curated contributions.
///
/// Weaknesses are the most negative contributions (strictly below zero),
/// strengths the most positive (strictly above zero). Sorting is stable, so
/// ties keep the input order.
pub fn pick_feedback(contributions: &[Contribution]) -> (Vec<CuratedFeature>, Vec<CuratedFeature>) {
    let mut ascending: Vec<Contribution> = contributions.to_vec();
    ascending.sort_by(|a, b| a.value.total_cmp(&b.value));
    let weaknesses = ascending
        .iter()
        .filter(|c| c.value < 0.0)
        .take(MAX_WEAKNESSES)
        .map(|c| c.feature)
        .collect();

    let mut descending: Vec<Contribution> = contributions.to_vec();
    descending.sort_by(|a, b| b.value.total_cmp(&a.value));
    let strengths = descending
        .iter()
        .filter(|c| c.value > 0.0)
        .take(MAX_STRENGTHS)
        .map(|c| c.feature)
        .collect();

    (weaknesses, strengths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contributions(values: [f64; 7]) -> Vec<Contribution> {
        CuratedFeature::ALL
            .iter()
            .zip(values)
            .map(|(feature, value)| Contribution {
                feature: *feature,
                value,
            })
            .collect()
    }

    #[test]
    fn test_picks_most_negative_and_most_positive() {
        let (weak, strong) = pick_feedback(&contributions([-0.4, 0.9, -1.2, 0.1, -0.05, 0.3, -2.0]));
        assert_eq!(
            weak,
            vec![
                CuratedFeature::Backlogs,
                CuratedFeature::MockInterviewScore,
                CuratedFeature::CodingSkillScore,
            ]
        );
        assert_eq!(
            strong,
            vec![CuratedFeature::InternshipsCount, CuratedFeature::Cgpa]
        );
    }

    #[test]
    fn test_zero_contributions_are_neither() {
        let (weak, strong) = pick_feedback(&contributions([0.0; 7]));
        assert!(weak.is_empty());
        assert!(strong.is_empty());
    }

    #[test]
    fn test_fewer_candidates_than_limits() {
        let (weak, strong) = pick_feedback(&contributions([0.5, 0.0, 0.0, 0.0, 0.0, 0.0, -0.5]));
        assert_eq!(weak, vec![CuratedFeature::Backlogs]);
        assert_eq!(strong, vec![CuratedFeature::CodingSkillScore]);
    }

    #[test]
    fn test_ties_keep_curated_order() {
        let (weak, strong) = pick_feedback(&contributions([-1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0]));
        assert_eq!(
            weak,
            vec![
                CuratedFeature::CodingSkillScore,
                CuratedFeature::InternshipsCount,
                CuratedFeature::MockInterviewScore,
            ]
        );
        assert_eq!(
            strong,
            vec![CuratedFeature::AptitudeScore, CuratedFeature::Cgpa]
        );
    }

    #[test]
    fn test_limits_and_signs_hold_for_many_inputs() {
        // Deterministic pseudo-random sweep
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        for _ in 0..500 {
            let mut values = [0.0; 7];
            for v in values.iter_mut() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                *v = ((state >> 33) as f64 / (1u64 << 31) as f64) * 4.0 - 2.0;
            }
            let input = contributions(values);
            let (weak, strong) = pick_feedback(&input);

            assert!(weak.len() <= MAX_WEAKNESSES);
            assert!(strong.len() <= MAX_STRENGTHS);
            for feature in &weak {
                let value = input.iter().find(|c| c.feature == *feature).unwrap().value;
                assert!(value < 0.0);
            }
            for feature in &strong {
                let value = input.iter().find(|c| c.feature == *feature).unwrap().value;
                assert!(value > 0.0);
            }
        }
    }

    #[test]
    fn test_every_feature_has_distinct_messages() {
        for feature in CuratedFeature::ALL {
            assert!(!weakness_text(feature).is_empty());
            assert!(!strength_text(feature).is_empty());
            assert_ne!(weakness_text(feature), strength_text(feature));
        }
    }
}
