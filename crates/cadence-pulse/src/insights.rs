//! Short narrative insights for dashboards and reports.

use cadence_core::Severity;
use serde::{Deserialize, Serialize};

use crate::contributors::{ActivityPattern, ContributorPerformance};
use crate::health::ProjectHealth;
use crate::issues::DetectedIssue;
use crate::trends::Direction;

/// Refactor ratio below which the team rarely removes code.
const LOW_REFACTOR_RATIO: f64 = 0.1;

/// Large-commit frequency above which commits should be split.
const HIGH_LARGE_COMMIT_FREQUENCY: f64 = 0.2;

/// Findings, advice, and risks, each a list of one-line statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
}

/// Summarize contributors, health, and issues.
///
/// Recommendations start with the first suggestion of each issue, most
/// severe first, without duplicates.
pub fn generate_insights(
    performance: &[ContributorPerformance],
    health: &ProjectHealth,
    issues: &[DetectedIssue],
) -> Insights {
    Insights {
        key_findings: key_findings(performance, health),
        recommendations: recommendations(performance, health, issues),
        risk_factors: risk_factors(health, issues),
    }
}

fn key_findings(performance: &[ContributorPerformance], health: &ProjectHealth) -> Vec<String> {
    if performance.is_empty() {
        return vec!["No commits in the analysis window.".into()];
    }

    let total: u32 = performance.iter().map(|p| p.totals.commit_count).sum();
    let mut findings = vec![format!(
        "{} contributor{} made {} commits, {:.1} per week.",
        performance.len(),
        if performance.len() == 1 { "" } else { "s" },
        total,
        health.velocity.current_rate
    )];

    if let Some(top) = performance.first() {
        let share = f64::from(top.totals.commit_count) / f64::from(total.max(1)) * 100.0;
        findings.push(format!(
            "{} leads with {} commits ({share:.0}% of the total).",
            top.totals.name, top.totals.commit_count
        ));
    }

    findings.push(format!("Project health score is {:.0}/100.", health.score));

    if health.velocity.trend != Direction::Stable {
        findings.push(format!(
            "Velocity is {} ({:+.0}% between the two halves of the window).",
            health.velocity.trend, health.velocity.change_pct
        ));
    }

    if performance.len() > 1 {
        if let Some(steady) = performance.iter().find(|p| p.ranks.by_consistency == 1) {
            findings.push(format!(
                "{} is the most consistent contributor ({:.1}/10).",
                steady.totals.name, steady.consistency_score
            ));
        }
    }

    let regular = performance
        .iter()
        .filter(|p| p.activity_pattern == ActivityPattern::Regular)
        .count();
    findings.push(format!(
        "{regular} of {} contributors commit on a regular weekly rhythm.",
        performance.len()
    ));

    findings
}

fn recommendations(
    performance: &[ContributorPerformance],
    health: &ProjectHealth,
    issues: &[DetectedIssue],
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for issue in issues {
        if let Some(first) = issue.suggestions.first() {
            push_unique(&mut out, first.clone());
        }
    }

    let quality = &health.code_quality;
    if quality.large_commit_frequency > HIGH_LARGE_COMMIT_FREQUENCY {
        push_unique(
            &mut out,
            format!(
                "Split large changes: {:.0}% of commits are unusually large.",
                quality.large_commit_frequency * 100.0
            ),
        );
    }
    if !performance.is_empty() && quality.refactor_ratio < LOW_REFACTOR_RATIO {
        push_unique(
            &mut out,
            "Set aside time for cleanup; very little code is being removed or reworked.".into(),
        );
    }

    if out.is_empty() {
        out.push("Keep the current cadence; no action needed.".into());
    }
    out
}

fn push_unique(list: &mut Vec<String>, text: String) {
    if !list.contains(&text) {
        list.push(text);
    }
}

fn risk_factors(health: &ProjectHealth, issues: &[DetectedIssue]) -> Vec<String> {
    let mut risks: Vec<String> = issues
        .iter()
        .filter(|i| i.severity.meets_threshold(Severity::High))
        .map(|i| format!("{} ({})", i.title, i.severity))
        .collect();

    if health.collaboration.active_developers > 1 && health.collaboration.bus_factor <= 1 {
        risks.push(format!(
            "Bus factor of {} across {} active developers.",
            health.collaboration.bus_factor, health.collaboration.active_developers
        ));
    }
    if health.velocity.trend == Direction::Decreasing {
        risks.push(format!(
            "Velocity fell {:.0}% over the window.",
            -health.velocity.change_pct
        ));
    }
    risks
}
