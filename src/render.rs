//! Plain-text rendering of a report, laid out like the evaluation form's
//! result panel: category banner, then improvement areas and strengths.

use std::fmt::Write;

use crate::types::{FeedbackSection, ReadinessReport, Severity};

const RESET: &str = "\x1b[0m";

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[1;31m",
        Severity::Warning => "\x1b[1;33m",
        Severity::Success => "\x1b[1;32m",
    }
}

/// Render a report as text. `color` enables ANSI severity styling.
pub fn render_text(report: &ReadinessReport, color: bool) -> String {
    let mut out = String::new();
    let category = &report.result.category;

    let banner = format!("{} {}", category.marker, category.label);
    if color {
        let _ = writeln!(out, "{}{}{}", severity_color(category.severity), banner, RESET);
    } else {
        let _ = writeln!(out, "{banner}");
    }
    let _ = writeln!(
        out,
        "Readiness probability: {:.1}%",
        report.result.probability * 100.0
    );
    out.push('\n');

    render_section(&mut out, "⚠ Areas to Improve", &report.result.weaknesses);
    out.push('\n');
    render_section(&mut out, "💪 Strengths", &report.result.strengths);

    out
}

fn render_section(out: &mut String, title: &str, section: &FeedbackSection) {
    let _ = writeln!(out, "{title}");
    if let Some(fallback) = &section.fallback {
        let _ = writeln!(out, "{fallback}");
    }
    for item in &section.items {
        let _ = writeln!(out, "• {}", item.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::tests::fixture_artifacts;
    use crate::collector::CandidateProfile;
    use crate::encoder::ReportEncoder;
    use crate::evaluator::ReadinessEvaluator;
    use crate::types::ScalarField;

    fn report_for(profile: CandidateProfile) -> ReadinessReport {
        let artifacts = fixture_artifacts();
        let result = ReadinessEvaluator::new(artifacts.clone())
            .evaluate(&profile)
            .unwrap();
        ReportEncoder::new().encode(&profile, &result, &artifacts)
    }

    #[test]
    fn test_render_plain() {
        let report = report_for(
            CandidateProfile::default()
                .with(ScalarField::Cgpa, 4.0)
                .with(ScalarField::Backlogs, 6.0)
                .with(ScalarField::CodingSkillScore, 0.0),
        );
        let text = render_text(&report, false);

        assert!(text.starts_with("🔴 High Improvement Required\n"));
        assert!(text.contains("⚠ Areas to Improve\n• Improve coding skills through consistent practice.\n"));
        assert!(text.contains("• Clearing backlogs will significantly improve readiness."));
        assert!(text.contains("💪 Strengths\n"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_render_fallback_and_color() {
        let mut profile = CandidateProfile::default();
        for field in ScalarField::ALL {
            profile.set(field, f64::MAX);
        }
        let profile = profile
            .with(ScalarField::CollegeTier, 1.0)
            .with(ScalarField::Backlogs, 0.0);
        let text = render_text(&report_for(profile), true);

        assert!(text.starts_with("\x1b[1;32m🔵 Excellent Placement Readiness\x1b[0m\n"));
        assert!(text.contains("⚠ Areas to Improve\nNo major weak areas detected.\n"));
    }
}
