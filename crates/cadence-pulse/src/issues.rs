//! Rule-based risk detection.
//!
//! Each rule looks at the contributor metrics and project health and adds
//! at most one issue. Rules are independent of each other and of input
//! order; the final list is sorted most severe first.

use cadence_core::{Severity, Thresholds};
use serde::{Deserialize, Serialize};

use crate::aggregate::DateSpan;
use crate::contributors::{ActivityPattern, ContributorPerformance, TrendDirection};
use crate::health::ProjectHealth;

/// The closed set of detectable risks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    LowActivity,
    SingleContributorDependency,
    IrregularCommits,
    TeamShrinking,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowActivity => write!(f, "low_activity"),
            Self::SingleContributorDependency => write!(f, "single_contributor_dependency"),
            Self::IrregularCommits => write!(f, "irregular_commits"),
            Self::TeamShrinking => write!(f, "team_shrinking"),
        }
    }
}

/// A detected risk with its explanation and advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    /// Analysis window the issue was observed over.
    pub window: Option<DateSpan>,
    pub affected_contributors: Vec<String>,
    pub title: String,
    pub description: String,
    pub impact: String,
    /// Advisory actions, most important first.
    pub suggestions: Vec<String>,
}

/// Run every rule and return the issues, most severe first.
///
/// Issues of equal severity keep rule order.
pub fn detect_issues(
    performance: &[ContributorPerformance],
    health: &ProjectHealth,
    window: Option<DateSpan>,
    thresholds: &Thresholds,
) -> Vec<DetectedIssue> {
    let mut issues: Vec<DetectedIssue> = [
        low_activity(performance, health, thresholds),
        single_contributor_dependency(performance, thresholds),
        irregular_commits(performance, thresholds),
        team_shrinking(performance),
    ]
    .into_iter()
    .flatten()
    .map(|mut issue| {
        issue.window = window;
        issue
    })
    .collect();

    issues.sort_by(|a, b| b.severity.rank().cmp(&a.severity.rank()));
    tracing::debug!(issues = issues.len(), "detected issues");
    issues
}

fn issue(kind: IssueKind, severity: Severity, affected: Vec<String>) -> DetectedIssue {
    DetectedIssue {
        kind,
        severity,
        window: None,
        affected_contributors: affected,
        title: String::new(),
        description: String::new(),
        impact: String::new(),
        suggestions: Vec::new(),
    }
}

fn names<'a>(performance: impl IntoIterator<Item = &'a ContributorPerformance>) -> Vec<String> {
    performance
        .into_iter()
        .map(|p| p.totals.name.clone())
        .collect()
}

fn low_activity(
    performance: &[ContributorPerformance],
    health: &ProjectHealth,
    t: &Thresholds,
) -> Option<DetectedIssue> {
    let rate = health.velocity.current_rate;
    if rate >= t.low_velocity_per_week {
        return None;
    }
    let severity = if rate < t.critical_velocity_per_week {
        Severity::Critical
    } else {
        Severity::High
    };

    Some(DetectedIssue {
        title: "Low commit activity".into(),
        description: format!(
            "The team averages {rate:.1} commits per week, below the expected {:.0}.",
            t.low_velocity_per_week
        ),
        impact: "Features and fixes ship slowly, and problems stay unaddressed longer.".into(),
        suggestions: vec![
            "Break work into smaller, more frequent commits.".into(),
            "Review whether the team is blocked on reviews, environments, or decisions.".into(),
            format!(
                "Set a team target of at least {:.0} commits per week and track it.",
                t.low_velocity_per_week
            ),
        ],
        ..issue(IssueKind::LowActivity, severity, names(performance))
    })
}

fn single_contributor_dependency(
    performance: &[ContributorPerformance],
    t: &Thresholds,
) -> Option<DetectedIssue> {
    let active: Vec<&ContributorPerformance> = performance
        .iter()
        .filter(|p| p.totals.commit_count > 0)
        .collect();
    let total: u32 = active.iter().map(|p| p.totals.commit_count).sum();
    // Ties resolve to the first contributor in input order.
    let top = active.iter().copied().fold(None, |best: Option<&ContributorPerformance>, p| {
        match best {
            Some(b) if b.totals.commit_count >= p.totals.commit_count => Some(b),
            _ => Some(p),
        }
    })?;
    let share = f64::from(top.totals.commit_count) / f64::from(total);

    let severity = if active.len() == 1 || share > t.critical_dominance_share {
        Severity::Critical
    } else if share > t.dominant_contributor_share {
        Severity::High
    } else {
        return None;
    };

    let description = if active.len() == 1 {
        format!("{} is the only active contributor.", top.totals.name)
    } else {
        format!(
            "{} authored {:.0}% of all commits.",
            top.totals.name,
            share * 100.0
        )
    };

    Some(DetectedIssue {
        title: "Single contributor dependency".into(),
        description,
        impact: format!(
            "Losing {} would stall the project; knowledge is concentrated in one person.",
            top.totals.name
        ),
        suggestions: vec![
            "Pair other team members on the areas this contributor owns.".into(),
            "Require reviews from a second person so knowledge spreads.".into(),
            "Document the critical parts of the codebase.".into(),
        ],
        ..issue(
            IssueKind::SingleContributorDependency,
            severity,
            vec![top.totals.name.clone()],
        )
    })
}

fn irregular_commits(
    performance: &[ContributorPerformance],
    t: &Thresholds,
) -> Option<DetectedIssue> {
    if performance.is_empty() {
        return None;
    }
    let irregular: Vec<&ContributorPerformance> = performance
        .iter()
        .filter(|p| p.activity_pattern == ActivityPattern::Irregular)
        .collect();
    let share = irregular.len() as f64 / performance.len() as f64;
    if share <= t.irregular_team_share {
        return None;
    }

    Some(DetectedIssue {
        title: "Irregular commit patterns".into(),
        description: format!(
            "{} of {} contributors commit irregularly.",
            irregular.len(),
            performance.len()
        ),
        impact: "Uneven delivery makes planning harder and hides integration problems until late."
            .into(),
        suggestions: vec![
            "Encourage committing work in progress daily behind flags.".into(),
            "Hold short regular check-ins to surface blocked work.".into(),
        ],
        ..issue(IssueKind::IrregularCommits, Severity::Medium, names(irregular))
    })
}

/// Severity for a share of declining contributors.
fn shrinking_severity(fraction: f64) -> Severity {
    if fraction >= 0.75 {
        Severity::Critical
    } else if fraction >= 0.5 {
        Severity::High
    } else if fraction >= 0.25 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn team_shrinking(performance: &[ContributorPerformance]) -> Option<DetectedIssue> {
    let declining: Vec<&ContributorPerformance> = performance
        .iter()
        .filter(|p| p.trend.last_30_days == TrendDirection::Declining)
        .collect();
    if declining.is_empty() {
        return None;
    }
    let fraction = declining.len() as f64 / performance.len() as f64;

    Some(DetectedIssue {
        title: "Team activity shrinking".into(),
        description: format!(
            "{} of {} contributors committed noticeably less in the last 30 days.",
            declining.len(),
            performance.len()
        ),
        impact: "Declining participation often precedes people leaving or burning out.".into(),
        suggestions: vec![
            "Check in with the affected contributors about workload and priorities.".into(),
            "Rebalance assignments so work is not concentrated on fewer people.".into(),
        ],
        ..issue(
            IssueKind::TeamShrinking,
            shrinking_severity(fraction),
            names(declining),
        )
    })
}
