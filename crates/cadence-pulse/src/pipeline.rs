//! The end-to-end analysis.
//!
//! [`analyze`] is a pure function of its inputs: commits, the repository's
//! author configuration, and [`AnalysisOptions`] (including `now`). Loading
//! the history and configuration is the caller's job.

use cadence_core::{CadenceError, ProjectConfig, Result, Thresholds, WeekStart};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, fill_gaps, DailyActivity, DateSpan};
use crate::commits::CommitRecord;
use crate::contributors::{compute_performance, ContributorPerformance, MetricsContext};
use crate::health::{score_health, ProjectHealth};
use crate::insights::{generate_insights, Insights};
use crate::issues::{detect_issues, DetectedIssue};
use crate::normalize::{AuthorNormalizer, Identity};
use crate::stats;
use crate::trends::{analyze_series, TrendAnalysis};

/// Per-request parameters.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Repository identity, used for reporting and config lookup.
    pub repository: String,
    /// First day to include (UTC).
    pub since: Option<NaiveDate>,
    /// Last day to include (UTC).
    pub until: Option<NaiveDate>,
    /// Keep only this canonical contributor, aliases included.
    pub author: Option<String>,
    pub week_start: WeekStart,
    pub thresholds: Thresholds,
    /// Anchor for recent-activity trends.
    pub now: DateTime<Utc>,
}

impl AnalysisOptions {
    /// Options with defaults for everything but the repository.
    pub fn new(repository: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            repository: repository.into(),
            since: None,
            until: None,
            author: None,
            week_start: WeekStart::default(),
            thresholds: Thresholds::default(),
            now,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.repository.trim().is_empty() {
            return Err(CadenceError::InvalidInput(
                "repository name must not be empty".into(),
            ));
        }
        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                return Err(CadenceError::InvalidInput(format!(
                    "since ({since}) is after until ({until})"
                )));
            }
        }
        Ok(())
    }

    fn in_window(&self, commit: &CommitRecord) -> bool {
        let day = commit.timestamp.date_naive();
        self.since.map_or(true, |since| day >= since) && self.until.map_or(true, |until| day <= until)
    }
}

/// Team-wide averages of the per-contributor metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmarks {
    pub commits_per_week: f64,
    pub lines_per_commit: f64,
    pub files_per_commit: f64,
    pub productivity_score: f64,
}

impl Benchmarks {
    /// Averages over `performance`; all zero when it is empty.
    pub fn from_performance(performance: &[ContributorPerformance]) -> Self {
        let avg = |f: fn(&ContributorPerformance) -> f64| {
            let values: Vec<f64> = performance.iter().map(f).collect();
            stats::mean(&values)
        };
        Self {
            commits_per_week: avg(|p| p.commits_per_week),
            lines_per_commit: avg(|p| p.lines_per_commit),
            files_per_commit: avg(|p| p.files_per_commit),
            productivity_score: avg(|p| p.productivity_score),
        }
    }
}

/// Everything computed for one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    pub repository: String,
    pub generated_at: DateTime<Utc>,
    /// Window the rates are computed over; `None` without commits or bounds.
    pub window: Option<DateSpan>,
    /// Commits that survived filtering and normalization.
    pub total_commits: usize,
    /// Commits dropped because their author is excluded.
    pub excluded_commits: usize,
    pub contributors: Vec<ContributorPerformance>,
    pub health: ProjectHealth,
    pub issues: Vec<DetectedIssue>,
    pub insights: Insights,
    pub benchmarks: Benchmarks,
    /// Gap-filled series between the first and last commit day.
    pub daily: Vec<DailyActivity>,
    pub trends: TrendAnalysis,
}

/// Run the full analysis.
///
/// # Errors
///
/// Returns [`CadenceError::InvalidInput`] for an empty repository name or a
/// reversed window, and [`CadenceError::Config`] for an invalid project
/// configuration. Degenerate data (no commits, one day) is not an error.
///
/// # Examples
///
/// ```
/// use cadence_core::ProjectConfig;
/// use cadence_pulse::pipeline::{analyze, AnalysisOptions};
/// use chrono::Utc;
///
/// let options = AnalysisOptions::new("acme/api", Utc::now());
/// let result = analyze(&[], &ProjectConfig::default(), &options).unwrap();
/// assert!(result.contributors.is_empty());
/// assert_eq!(result.health.score, 50.0);
/// ```
pub fn analyze(
    commits: &[CommitRecord],
    project: &ProjectConfig,
    options: &AnalysisOptions,
) -> Result<AnalyticsResult> {
    options.validate()?;
    options.thresholds.validate()?;
    project.validate()?;

    let normalizer = AuthorNormalizer::new(project);
    let selected: Vec<CommitRecord> = commits
        .iter()
        .filter(|c| options.in_window(c))
        .filter(|c| match options.author.as_deref() {
            Some(wanted) => normalizer.normalize(&c.author) == Identity::Canonical(wanted),
            None => true,
        })
        .cloned()
        .collect();

    tracing::debug!(
        repository = %options.repository,
        input = commits.len(),
        selected = selected.len(),
        "starting analysis"
    );

    let aggregation = aggregate(&selected, &normalizer);
    let commit_range = aggregation.date_range();
    let window = match (options.since, options.until, commit_range) {
        (Some(since), Some(until), _) => Some(DateSpan::new(since, until)),
        (since, until, Some(range)) => Some(DateSpan::new(
            since.unwrap_or(range.start),
            until.unwrap_or(range.end),
        )),
        _ => None,
    };

    let window_daily = match window {
        Some(span) => fill_gaps(&aggregation.daily, span.start, span.end),
        None => Vec::new(),
    };

    let contributors = match window {
        Some(span) => compute_performance(
            &aggregation,
            &MetricsContext {
                span,
                week_start: options.week_start,
                now: options.now,
                thresholds: &options.thresholds,
            },
        ),
        None => Vec::new(),
    };

    let health = score_health(&aggregation, &window_daily, window, &options.thresholds);
    let issues = detect_issues(&contributors, &health, window, &options.thresholds);
    let insights = generate_insights(&contributors, &health, &issues);
    let benchmarks = Benchmarks::from_performance(&contributors);

    let daily = aggregation.dense_daily();
    let trends = analyze_series(&daily, options.week_start, &options.thresholds);

    Ok(AnalyticsResult {
        repository: options.repository.clone(),
        generated_at: options.now,
        window,
        total_commits: aggregation.commits.len(),
        excluded_commits: aggregation.excluded_commits,
        contributors,
        health,
        issues,
        insights,
        benchmarks,
        daily,
        trends,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commits::FileStat;
    use cadence_core::AuthorGroup;
    use chrono::{Duration, TimeZone};

    fn make_commit(id: usize, author: &str, day: i64) -> CommitRecord {
        CommitRecord {
            id: format!("{id:03}"),
            author: author.into(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap() + Duration::days(day),
            files: vec![FileStat::new("src/lib.rs", 10, 2)],
            stat_summary: None,
        }
    }

    fn options() -> AnalysisOptions {
        AnalysisOptions::new("acme/api", Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn blank_repository_is_rejected() {
        let mut opts = options();
        opts.repository = "  ".into();
        let err = analyze(&[], &ProjectConfig::default(), &opts).unwrap_err();
        assert!(matches!(err, CadenceError::InvalidInput(_)));
    }

    #[test]
    fn reversed_window_is_rejected() {
        let mut opts = options();
        opts.since = NaiveDate::from_ymd_opt(2024, 3, 10);
        opts.until = NaiveDate::from_ymd_opt(2024, 3, 1);
        let err = analyze(&[], &ProjectConfig::default(), &opts).unwrap_err();
        assert!(matches!(err, CadenceError::InvalidInput(_)));
    }

    #[test]
    fn invalid_project_config_is_rejected() {
        let project = ProjectConfig {
            grouped_authors: vec![
                AuthorGroup {
                    primary_name: "A".into(),
                    aliases: vec!["x".into()],
                },
                AuthorGroup {
                    primary_name: "B".into(),
                    aliases: vec!["x".into()],
                },
            ],
            excluded_users: vec![],
        };
        let err = analyze(&[], &project, &options()).unwrap_err();
        assert!(matches!(err, CadenceError::Config(_)));
    }

    #[test]
    fn window_drops_commits_outside_it() {
        let commits: Vec<CommitRecord> = (0..10).map(|i| make_commit(i, "alice", i as i64)).collect();
        let mut opts = options();
        opts.since = NaiveDate::from_ymd_opt(2024, 3, 3);
        opts.until = NaiveDate::from_ymd_opt(2024, 3, 9);
        let result = analyze(&commits, &ProjectConfig::default(), &opts).unwrap();
        assert_eq!(result.total_commits, 7);
        let window = result.window.unwrap();
        assert_eq!(window.days(), 7);
        assert_eq!(result.contributors[0].commits_per_week, 7.0);
    }

    #[test]
    fn author_filter_uses_canonical_name() {
        let project = ProjectConfig {
            grouped_authors: vec![AuthorGroup {
                primary_name: "Alice".into(),
                aliases: vec!["alice".into(), "alice@home".into()],
            }],
            excluded_users: vec![],
        };
        let commits = vec![
            make_commit(0, "alice", 0),
            make_commit(1, "alice@home", 1),
            make_commit(2, "bob", 2),
        ];
        let mut opts = options();
        opts.author = Some("Alice".into());
        let result = analyze(&commits, &project, &opts).unwrap();
        assert_eq!(result.total_commits, 2);
        assert_eq!(result.contributors.len(), 1);
        assert_eq!(result.contributors[0].totals.name, "Alice");
    }

    #[test]
    fn open_window_spans_commit_range() {
        let commits = vec![make_commit(0, "alice", 0), make_commit(1, "bob", 13)];
        let result = analyze(&commits, &ProjectConfig::default(), &options()).unwrap();
        let window = result.window.unwrap();
        assert_eq!(window.days(), 14);
        assert_eq!(result.daily.len(), 14);
        assert_eq!(result.trends.points, 14);
    }

    #[test]
    fn benchmarks_average_contributors() {
        let commits = vec![
            make_commit(0, "alice", 0),
            make_commit(1, "alice", 1),
            make_commit(2, "bob", 6),
        ];
        let result = analyze(&commits, &ProjectConfig::default(), &options()).unwrap();
        assert_eq!(result.benchmarks.commits_per_week, 1.5);
        assert_eq!(result.benchmarks.lines_per_commit, 12.0);
        assert_eq!(Benchmarks::from_performance(&[]), Benchmarks::default());
    }

    #[test]
    fn result_is_deterministic() {
        let commits: Vec<CommitRecord> = (0..30)
            .map(|i| make_commit(i, if i % 3 == 0 { "bob" } else { "alice" }, (i / 2) as i64))
            .collect();
        let mut reversed = commits.clone();
        reversed.reverse();
        let a = analyze(&commits, &ProjectConfig::default(), &options()).unwrap();
        let b = analyze(&reversed, &ProjectConfig::default(), &options()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn serializes_camel_case() {
        let commits = vec![make_commit(0, "alice", 0), make_commit(1, "alice", 1)];
        let result = analyze(&commits, &ProjectConfig::default(), &options()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["repository"], "acme/api");
        assert_eq!(json["totalCommits"], 2);
        assert!(json["health"]["codeQuality"]["avgCommitSize"].is_number());
        assert!(json["insights"]["keyFindings"].is_array());
        assert!(json["trends"]["seasonality"]["byWeekday"].is_array());
    }

    #[test]
    fn out_of_range_thresholds_are_rejected_before_analysis() {
        let config =
            cadence_core::CadenceConfig::from_toml("[thresholds]\ntrend_window_days = 1000000000").unwrap();
        let mut opts = options();
        opts.thresholds = config.thresholds;
        let commits = vec![make_commit(0, "alice", 0), make_commit(1, "alice", 1)];
        let err = analyze(&commits, &ProjectConfig::default(), &opts).unwrap_err();
        assert!(matches!(err, CadenceError::Config(_)));
    }

    #[test]
    fn huge_line_counts_saturate() {
        let log = format!(
            r#"[
                {{"id": "a", "author": "alice", "timestamp": "2024-03-01T10:00:00Z",
                  "files": [{{"path": "big.bin", "insertions": {max}, "deletions": 0}}]}},
                {{"id": "b", "author": "alice", "timestamp": "2024-03-01T11:00:00Z",
                  "files": [{{"path": "src/lib.rs", "insertions": 5, "deletions": {max}}}]}}
            ]"#,
            max = u64::MAX
        );
        let commits = crate::provider::parse_commit_log(&log).unwrap();
        let result = analyze(&commits, &ProjectConfig::default(), &options()).unwrap();

        let alice = &result.contributors[0].totals;
        assert_eq!(alice.lines_added, u64::MAX);
        assert_eq!(alice.lines_deleted, u64::MAX);
        assert_eq!(alice.total_lines(), u64::MAX);
        assert_eq!(result.daily[0].lines_added, u64::MAX);
        assert!(result.health.code_quality.avg_commit_size.is_finite());
    }
}
