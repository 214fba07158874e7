//! Project health scoring.
//!
//! The overall score starts at 100 and applies independent additive
//! adjustments, each recorded so the final number can be traced back to
//! the facts that produced it.

use cadence_core::Thresholds;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregation, ContributorAggregate, DailyActivity, DateSpan};
use crate::stats;
use crate::trends::Direction;

/// Score reported when there is no history to judge.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Points per active developer in the collaboration score.
const COLLABORATION_PER_DEVELOPER: f64 = 15.0;

/// Points per bus-factor contributor in the collaboration score.
const COLLABORATION_PER_BUS_MEMBER: f64 = 25.0;

/// Team commit rate and its direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Velocity {
    /// Commits per calendar week over the window.
    pub current_rate: f64,
    /// Second half of the window compared with the first.
    pub trend: Direction,
    /// Percent change between the halves' daily means.
    pub change_pct: f64,
}

/// How widely work is spread across the team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaboration {
    /// 0–100, grows with active developers and bus factor.
    pub score: f64,
    pub active_developers: usize,
    pub bus_factor: usize,
}

/// Commit size characteristics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeQuality {
    /// Mean lines changed per commit.
    pub avg_commit_size: f64,
    /// Lines deleted per line added.
    pub refactor_ratio: f64,
    /// Fraction of commits above the large-commit threshold.
    pub large_commit_frequency: f64,
}

/// Which fact moved the health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthFactor {
    LowVelocity,
    FewContributors,
    LowBusFactor,
    VelocityDecline,
    LargeCommits,
    VelocityGrowth,
}

/// One applied adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAdjustment {
    pub factor: HealthFactor,
    /// Signed change to the score.
    pub points: f64,
    pub reason: String,
}

/// Overall health of the project over the analysis window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHealth {
    /// Clamped to `[0, 100]`.
    pub score: f64,
    pub velocity: Velocity,
    pub collaboration: Collaboration,
    pub code_quality: CodeQuality,
    pub adjustments: Vec<HealthAdjustment>,
}

/// Count contributors each responsible for more than `share` of commits.
///
/// # Examples
///
/// ```
/// use cadence_pulse::aggregate::ContributorAggregate;
/// use cadence_pulse::health::bus_factor;
///
/// let c = |name: &str, commits| ContributorAggregate {
///     name: name.into(),
///     commit_count: commits,
///     lines_added: 0,
///     lines_deleted: 0,
///     distinct_files_changed: 0,
/// };
/// assert_eq!(bus_factor(&[c("a", 20), c("b", 0)], 0.2), 1);
/// assert_eq!(bus_factor(&[c("a", 5), c("b", 5), c("c", 5)], 0.2), 3);
/// assert_eq!(bus_factor(&[], 0.2), 0);
/// ```
pub fn bus_factor(contributors: &[ContributorAggregate], share: f64) -> usize {
    let total: u32 = contributors.iter().map(|c| c.commit_count).sum();
    if total == 0 {
        return 0;
    }
    contributors
        .iter()
        .filter(|c| f64::from(c.commit_count) / f64::from(total) > share)
        .count()
}

/// Compare the daily mean of the second half of `daily` with the first.
///
/// Returns the direction and the percent change. A quiet first half with
/// activity in the second counts as +100%.
pub fn velocity_trend(daily: &[DailyActivity], stable_band_pct: f64) -> (Direction, f64) {
    if daily.len() < 2 {
        return (Direction::Stable, 0.0);
    }
    let (first, second) = daily.split_at(daily.len() / 2);
    let mean = |days: &[DailyActivity]| {
        let counts: Vec<f64> = days.iter().map(|d| f64::from(d.commit_count)).collect();
        stats::mean(&counts)
    };
    let (before, after) = (mean(first), mean(second));

    let change_pct = if before == 0.0 {
        if after > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (after - before) / before * 100.0
    };

    let direction = if change_pct > stable_band_pct {
        Direction::Increasing
    } else if change_pct < -stable_band_pct {
        Direction::Decreasing
    } else {
        Direction::Stable
    };
    (direction, change_pct)
}

/// Saturating collaboration score, monotonic in both inputs.
pub fn collaboration_score(active_developers: usize, bus_factor: usize) -> f64 {
    let raw = active_developers as f64 * COLLABORATION_PER_DEVELOPER
        + bus_factor as f64 * COLLABORATION_PER_BUS_MEMBER;
    raw.min(100.0)
}

/// Score the project.
///
/// `daily` must be the dense series over `span`. With no commits the
/// score is [`NEUTRAL_SCORE`] and no adjustments apply.
pub fn score_health(
    aggregation: &Aggregation,
    daily: &[DailyActivity],
    span: Option<DateSpan>,
    thresholds: &Thresholds,
) -> ProjectHealth {
    let commits = &aggregation.commits;
    let Some(span) = span.filter(|_| !commits.is_empty()) else {
        return ProjectHealth {
            score: NEUTRAL_SCORE,
            ..ProjectHealth::default()
        };
    };

    let current_rate = commits.len() as f64 / f64::from(span.weeks());
    let (trend, change_pct) = velocity_trend(daily, thresholds.velocity_stable_band_pct);
    let velocity = Velocity {
        current_rate,
        trend,
        change_pct,
    };

    let active_developers = aggregation
        .contributors
        .iter()
        .filter(|c| c.commit_count > 0)
        .count();
    let bus = bus_factor(&aggregation.contributors, thresholds.major_contributor_share);
    let collaboration = Collaboration {
        score: collaboration_score(active_developers, bus),
        active_developers,
        bus_factor: bus,
    };

    let added = commits.iter().fold(0u64, |acc, c| acc.saturating_add(c.lines_added));
    let deleted = commits.iter().fold(0u64, |acc, c| acc.saturating_add(c.lines_deleted));
    let large = commits
        .iter()
        .filter(|c| c.total_lines() > thresholds.large_commit_lines)
        .count();
    let code_quality = CodeQuality {
        avg_commit_size: stats::ratio(added.saturating_add(deleted) as f64, commits.len() as f64),
        refactor_ratio: stats::ratio(deleted as f64, added as f64),
        large_commit_frequency: stats::ratio(large as f64, commits.len() as f64),
    };

    let adjustments = adjustments(&velocity, &collaboration, &code_quality, thresholds);
    let score = (100.0 + adjustments.iter().map(|a| a.points).sum::<f64>()).clamp(0.0, 100.0);

    tracing::debug!(score, adjustments = adjustments.len(), "scored project health");

    ProjectHealth {
        score,
        velocity,
        collaboration,
        code_quality,
        adjustments,
    }
}

fn adjustments(
    velocity: &Velocity,
    collaboration: &Collaboration,
    quality: &CodeQuality,
    t: &Thresholds,
) -> Vec<HealthAdjustment> {
    let mut out = Vec::new();
    let mut push = |factor, points: f64, reason: String| {
        out.push(HealthAdjustment {
            factor,
            points,
            reason,
        })
    };

    if velocity.current_rate < t.critical_velocity_per_week {
        push(
            HealthFactor::LowVelocity,
            -20.0,
            format!("{:.1} commits/week is critically low", velocity.current_rate),
        );
    } else if velocity.current_rate < t.low_velocity_per_week {
        push(
            HealthFactor::LowVelocity,
            -10.0,
            format!("{:.1} commits/week is low", velocity.current_rate),
        );
    }

    match collaboration.active_developers {
        0 | 1 => push(
            HealthFactor::FewContributors,
            -30.0,
            "only one active contributor".into(),
        ),
        2 => push(
            HealthFactor::FewContributors,
            -15.0,
            "only two active contributors".into(),
        ),
        _ => {}
    }

    match collaboration.bus_factor {
        0 | 1 => push(
            HealthFactor::LowBusFactor,
            -25.0,
            format!("bus factor is {}", collaboration.bus_factor),
        ),
        2 => push(HealthFactor::LowBusFactor, -10.0, "bus factor is 2".into()),
        _ => {}
    }

    if velocity.trend == Direction::Decreasing {
        if velocity.change_pct < -t.velocity_major_drop_pct {
            push(
                HealthFactor::VelocityDecline,
                -15.0,
                format!("velocity dropped {:.0}%", -velocity.change_pct),
            );
        } else {
            push(
                HealthFactor::VelocityDecline,
                -5.0,
                format!("velocity dropped {:.0}%", -velocity.change_pct),
            );
        }
    }

    let large = t.large_commit_lines as f64;
    let medium = t.medium_commit_lines as f64;
    if quality.avg_commit_size > large {
        push(
            HealthFactor::LargeCommits,
            -10.0,
            format!("average commit touches {:.0} lines", quality.avg_commit_size),
        );
    } else if quality.avg_commit_size > medium {
        push(
            HealthFactor::LargeCommits,
            -5.0,
            format!("average commit touches {:.0} lines", quality.avg_commit_size),
        );
    }

    if velocity.trend == Direction::Increasing && velocity.change_pct > t.velocity_growth_bonus_pct {
        push(
            HealthFactor::VelocityGrowth,
            10.0,
            format!("velocity grew {:.0}%", velocity.change_pct),
        );
    }

    out
}
