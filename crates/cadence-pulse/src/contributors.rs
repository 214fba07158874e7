//! Per-contributor productivity, consistency, and trend metrics.
//!
//! Rates are computed against the whole analysis window rather than each
//! contributor's own active span, so a contributor who committed ten times
//! in the first week of a ten-week window averages one commit per week.

use std::collections::BTreeMap;

use cadence_core::{Thresholds, WeekStart};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregation, ContributorAggregate, DateSpan};
use crate::stats;

/// Upper bound of the consistency score.
pub const MAX_CONSISTENCY: f64 = 10.0;

/// Upper bound of the productivity score.
pub const MAX_PRODUCTIVITY: f64 = 100.0;

/// Lines per commit beyond this earn no further productivity credit.
const PRODUCTIVITY_LINES_CAP: f64 = 200.0;

/// How a contributor's commits are spread across weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityPattern {
    /// Steady week-over-week activity.
    Regular,
    /// Activity concentrated in a few spiky weeks.
    Burst,
    /// Uneven activity without a dominant spike.
    Irregular,
}

impl std::fmt::Display for ActivityPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Regular => "regular",
            Self::Burst => "burst",
            Self::Irregular => "irregular",
        })
    }
}

/// Direction of a contributor's recent activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        })
    }
}

/// Recent-versus-previous comparison anchored at the analysis time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorTrend {
    /// Classification of the last 30 days against the 30 before.
    pub last_30_days: TrendDirection,
    /// Commits in the recent window.
    pub recent_commits: u32,
    /// Commits in the preceding window.
    pub previous_commits: u32,
}

/// A run of consecutive days and the commits inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub commits: u32,
}

/// 1-based positions among peers, 1 = best.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerRanks {
    pub by_rate: usize,
    pub by_productivity: usize,
    pub by_consistency: usize,
}

/// Derived performance view of one contributor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorPerformance {
    /// Raw totals.
    #[serde(flatten)]
    pub totals: ContributorAggregate,
    /// `commits / ceil(window_days / 7)`.
    pub commits_per_week: f64,
    /// `(added + deleted) / commits`.
    pub lines_per_commit: f64,
    /// `distinct_files / commits`.
    pub files_per_commit: f64,
    /// 0–10, higher means more evenly spread weekly activity.
    pub consistency_score: f64,
    /// 0–100 blend of rate and change volume.
    pub productivity_score: f64,
    pub activity_pattern: ActivityPattern,
    pub trend: ContributorTrend,
    /// Busiest window of `peak_window_days`, if at least two commits.
    pub peak_period: Option<ActivityWindow>,
    /// Quietest window of `peak_window_days`, if at least two commits.
    pub low_period: Option<ActivityWindow>,
    pub ranks: PeerRanks,
}

/// Inputs shared by every contributor's metrics.
#[derive(Debug, Clone)]
pub struct MetricsContext<'a> {
    /// The whole analysis window.
    pub span: DateSpan,
    /// Weekly bucket boundary.
    pub week_start: WeekStart,
    /// Anchor for the 30-day trend.
    pub now: DateTime<Utc>,
    pub thresholds: &'a Thresholds,
}

/// Compute performance metrics and peer ranks for every contributor.
///
/// Output order follows `aggregation.contributors` (most commits first).
///
/// # Examples
///
/// ```
/// use cadence_core::{ProjectConfig, Thresholds, WeekStart};
/// use cadence_pulse::aggregate::aggregate;
/// use cadence_pulse::commits::CommitRecord;
/// use cadence_pulse::contributors::{compute_performance, MetricsContext};
/// use cadence_pulse::normalize::AuthorNormalizer;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
/// let commits: Vec<CommitRecord> = (0..14)
///     .map(|i| CommitRecord {
///         id: i.to_string(),
///         author: "alice".into(),
///         timestamp: start + Duration::days(i),
///         files: vec![],
///         stat_summary: None,
///     })
///     .collect();
/// let agg = aggregate(&commits, &AuthorNormalizer::new(&ProjectConfig::default()));
/// let thresholds = Thresholds::default();
/// let ctx = MetricsContext {
///     span: agg.date_range().unwrap(),
///     week_start: WeekStart::Monday,
///     now: start + Duration::days(14),
///     thresholds: &thresholds,
/// };
/// let perf = compute_performance(&agg, &ctx);
/// assert_eq!(perf[0].commits_per_week, 7.0);
/// assert_eq!(perf[0].ranks.by_rate, 1);
/// ```
pub fn compute_performance(
    aggregation: &Aggregation,
    ctx: &MetricsContext<'_>,
) -> Vec<ContributorPerformance> {
    let weeks = f64::from(ctx.span.weeks());

    let mut dates_by_contributor: BTreeMap<&str, Vec<DateTime<Utc>>> = BTreeMap::new();
    for commit in &aggregation.commits {
        dates_by_contributor
            .entry(commit.contributor.as_str())
            .or_default()
            .push(commit.timestamp);
    }

    let mut performance: Vec<ContributorPerformance> = aggregation
        .contributors
        .iter()
        .map(|totals| {
            let timestamps = dates_by_contributor
                .get(totals.name.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let days: Vec<NaiveDate> = timestamps.iter().map(|t| t.date_naive()).collect();

            let commits = f64::from(totals.commit_count);
            let commits_per_week = commits / weeks;
            let lines_per_commit = stats::ratio(totals.total_lines() as f64, commits);
            let files_per_commit = stats::ratio(totals.distinct_files_changed as f64, commits);

            let weekly = weekly_counts(&days, ctx.span, ctx.week_start);
            let consistency_score = consistency_score(&weekly);
            let activity_pattern =
                classify_pattern(consistency_score, peak_ratio(&weekly), ctx.thresholds);

            let (peak_period, low_period) =
                peak_and_low_windows(&days, ctx.thresholds.peak_window_days);

            ContributorPerformance {
                totals: totals.clone(),
                commits_per_week,
                lines_per_commit,
                files_per_commit,
                consistency_score,
                productivity_score: productivity_score(commits_per_week, lines_per_commit),
                activity_pattern,
                trend: recent_trend(timestamps, ctx.now, ctx.thresholds),
                peak_period,
                low_period,
                ranks: PeerRanks::default(),
            }
        })
        .collect();

    assign_ranks(&mut performance);
    performance
}

/// Commit counts per week bucket across `span`, including empty weeks.
pub fn weekly_counts(days: &[NaiveDate], span: DateSpan, week_start: WeekStart) -> Vec<f64> {
    if span.days() == 0 {
        return Vec::new();
    }

    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut week = week_start.week_of(span.start);
    let last_week = week_start.week_of(span.end);
    while week <= last_week {
        buckets.insert(week, 0.0);
        week += Duration::days(7);
    }

    for day in days.iter().filter(|d| span.contains(**d)) {
        if let Some(count) = buckets.get_mut(&week_start.week_of(*day)) {
            *count += 1.0;
        }
    }

    buckets.into_values().collect()
}

/// Map weekly counts to a 0–10 score, `10 / (1 + CV)`.
///
/// Strictly decreasing in the coefficient of variation; a contributor with
/// no commits scores 0.
pub fn consistency_score(weekly: &[f64]) -> f64 {
    if weekly.iter().all(|c| *c == 0.0) {
        return 0.0;
    }
    MAX_CONSISTENCY / (1.0 + stats::coefficient_of_variation(weekly))
}

/// Busiest week divided by the average week.
fn peak_ratio(weekly: &[f64]) -> f64 {
    let max = weekly.iter().copied().fold(0.0, f64::max);
    stats::ratio(max, stats::mean(weekly))
}

/// Classify an activity pattern.
///
/// `Regular` requires a consistency score of at least
/// `regular_consistency_min`, so lowering consistency can never turn another
/// pattern into `Regular`. Below that, a busiest week at least
/// `burst_peak_ratio` times the average is `Burst`, anything else `Irregular`.
///
/// # Examples
///
/// ```
/// use cadence_core::Thresholds;
/// use cadence_pulse::contributors::{classify_pattern, ActivityPattern};
///
/// let t = Thresholds::default();
/// assert_eq!(classify_pattern(9.0, 1.1, &t), ActivityPattern::Regular);
/// assert_eq!(classify_pattern(3.0, 5.0, &t), ActivityPattern::Burst);
/// assert_eq!(classify_pattern(3.0, 1.5, &t), ActivityPattern::Irregular);
/// ```
pub fn classify_pattern(consistency: f64, peak_ratio: f64, thresholds: &Thresholds) -> ActivityPattern {
    if consistency >= thresholds.regular_consistency_min {
        ActivityPattern::Regular
    } else if peak_ratio >= thresholds.burst_peak_ratio {
        ActivityPattern::Burst
    } else {
        ActivityPattern::Irregular
    }
}

fn productivity_score(commits_per_week: f64, lines_per_commit: f64) -> f64 {
    let volume = lines_per_commit.min(PRODUCTIVITY_LINES_CAP) / 10.0;
    (commits_per_week * 10.0 + volume).min(MAX_PRODUCTIVITY)
}

/// Compare the last `trend_window_days` against the window before it.
pub fn recent_trend(
    timestamps: &[DateTime<Utc>],
    now: DateTime<Utc>,
    thresholds: &Thresholds,
) -> ContributorTrend {
    let window = Duration::try_days(thresholds.trend_window_days).unwrap_or(Duration::MAX);
    let recent_start = now
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let previous_start = recent_start
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let recent = timestamps
        .iter()
        .filter(|t| **t > recent_start && **t <= now)
        .count() as u32;
    let previous = timestamps
        .iter()
        .filter(|t| **t > previous_start && **t <= recent_start)
        .count() as u32;

    let direction = if (timestamps.len() as u32) < thresholds.min_commits_for_trend {
        TrendDirection::Stable
    } else if f64::from(recent) > f64::from(previous) * thresholds.improving_ratio {
        TrendDirection::Improving
    } else if f64::from(recent) < f64::from(previous) * thresholds.declining_ratio {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    ContributorTrend {
        last_30_days: direction,
        recent_commits: recent,
        previous_commits: previous,
    }
}

/// Busiest and quietest `width`-day windows between the contributor's first
/// and last commit. Spans shorter than `width` yield a single window.
fn peak_and_low_windows(
    days: &[NaiveDate],
    width: i64,
) -> (Option<ActivityWindow>, Option<ActivityWindow>) {
    if days.len() < 2 {
        return (None, None);
    }
    let (Some(first), Some(last)) = (days.iter().min(), days.iter().max()) else {
        return (None, None);
    };

    let span = DateSpan::new(*first, *last);
    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for day in days {
        *per_day.entry(*day).or_default() += 1;
    }
    let counts: Vec<u32> = first
        .iter_days()
        .take_while(|d| d <= last)
        .map(|d| per_day.get(&d).copied().unwrap_or(0))
        .collect();

    let width = usize::try_from(width.max(1)).unwrap_or(1).min(counts.len());
    let mut peak: Option<ActivityWindow> = None;
    let mut low: Option<ActivityWindow> = None;

    for (offset, slice) in counts.windows(width).enumerate() {
        let commits: u32 = slice.iter().sum();
        let start = span.start + Duration::days(offset as i64);
        let window = ActivityWindow {
            start,
            end: start + Duration::days(width as i64 - 1),
            commits,
        };
        if peak.as_ref().map_or(true, |p| commits > p.commits) {
            peak = Some(window.clone());
        }
        if low.as_ref().map_or(true, |l| commits < l.commits) {
            low = Some(window);
        }
    }

    (peak, low)
}

fn assign_ranks(performance: &mut [ContributorPerformance]) {
    let by_rate = rank_positions(performance, |p| p.commits_per_week);
    let by_productivity = rank_positions(performance, |p| p.productivity_score);
    let by_consistency = rank_positions(performance, |p| p.consistency_score);

    for (i, perf) in performance.iter_mut().enumerate() {
        perf.ranks = PeerRanks {
            by_rate: by_rate[i],
            by_productivity: by_productivity[i],
            by_consistency: by_consistency[i],
        };
    }
}

/// 1-based rank of each element in a descending stable sort by `key`.
fn rank_positions<F>(performance: &[ContributorPerformance], key: F) -> Vec<usize>
where
    F: Fn(&ContributorPerformance) -> f64,
{
    let mut order: Vec<usize> = (0..performance.len()).collect();
    order.sort_by(|a, b| {
        key(&performance[*b])
            .partial_cmp(&key(&performance[*a]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0; performance.len()];
    for (position, index) in order.into_iter().enumerate() {
        ranks[index] = position + 1;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::commits::{CommitRecord, FileStat};
    use crate::normalize::AuthorNormalizer;
    use cadence_core::ProjectConfig;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn make_commit(id: usize, author: &str, ts: DateTime<Utc>, lines: u64) -> CommitRecord {
        CommitRecord {
            id: format!("c{id}"),
            author: author.into(),
            timestamp: ts,
            files: vec![FileStat::new(format!("src/{author}_{id}.rs"), lines, 0)],
            stat_summary: None,
        }
    }

    fn run(commits: &[CommitRecord], now: DateTime<Utc>) -> Vec<ContributorPerformance> {
        let agg = aggregate(commits, &AuthorNormalizer::new(&ProjectConfig::default()));
        let thresholds = Thresholds::default();
        let ctx = MetricsContext {
            span: agg.date_range().unwrap(),
            week_start: WeekStart::Sunday,
            now,
            thresholds: &thresholds,
        };
        compute_performance(&agg, &ctx)
    }

    #[test]
    fn rates_use_whole_window() {
        // Window: Jan 1 – Jan 28 (4 weeks). Bob only commits in week one.
        let mut commits = vec![
            make_commit(0, "alice", at(2024, 1, 1), 10),
            make_commit(1, "alice", at(2024, 1, 28), 10),
        ];
        for i in 0..4 {
            commits.push(make_commit(10 + i, "bob", at(2024, 1, 2 + i as u32), 30));
        }
        let perf = run(&commits, at(2024, 1, 29));
        let bob = perf.iter().find(|p| p.totals.name == "bob").unwrap();
        assert_eq!(bob.commits_per_week, 1.0);
        assert_eq!(bob.lines_per_commit, 30.0);
        assert_eq!(bob.files_per_commit, 1.0);

        let alice = perf.iter().find(|p| p.totals.name == "alice").unwrap();
        assert_eq!(alice.commits_per_week, 0.5);
    }

    #[test]
    fn weekly_counts_include_empty_weeks() {
        // Sunday weeks: Dec 31, Jan 7, Jan 14.
        let span = DateSpan::new(day(1), day(15));
        let counts = weekly_counts(&[day(1), day(2), day(15)], span, WeekStart::Sunday);
        assert_eq!(counts, vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn week_start_moves_bucket_boundary() {
        // Jan 7 2024 is a Sunday.
        let span = DateSpan::new(day(1), day(13));
        let sunday = weekly_counts(&[day(6), day(7)], span, WeekStart::Sunday);
        let monday = weekly_counts(&[day(6), day(7)], span, WeekStart::Monday);
        assert_eq!(sunday, vec![1.0, 1.0]);
        assert_eq!(monday, vec![2.0, 0.0]);
    }

    #[test]
    fn consistency_is_bounded_and_decreasing_in_variation() {
        let even = consistency_score(&[3.0, 3.0, 3.0, 3.0]);
        let uneven = consistency_score(&[1.0, 5.0, 2.0, 4.0]);
        let spiky = consistency_score(&[12.0, 0.0, 0.0, 0.0]);
        assert_eq!(even, MAX_CONSISTENCY);
        assert!(uneven < even);
        assert!(spiky < uneven);
        assert!(spiky > 0.0);
        assert_eq!(consistency_score(&[0.0, 0.0]), 0.0);
        assert_eq!(consistency_score(&[]), 0.0);
    }

    #[test]
    fn pattern_is_monotonic_in_consistency() {
        let t = Thresholds::default();
        for ratio in [0.5, 1.0, 2.0, 3.0, 10.0] {
            let mut seen_non_regular = false;
            for step in (0..=100).rev() {
                let c = f64::from(step) / 10.0;
                let pattern = classify_pattern(c, ratio, &t);
                if pattern != ActivityPattern::Regular {
                    seen_non_regular = true;
                }
                if seen_non_regular {
                    assert_ne!(pattern, ActivityPattern::Regular, "c={c} ratio={ratio}");
                }
            }
        }
    }

    #[test]
    fn steady_contributor_is_regular_and_spiky_one_is_burst() {
        let mut commits = Vec::new();
        // Alice: two commits every week for four weeks.
        for w in 0..4u32 {
            commits.push(make_commit(commits.len(), "alice", at(2024, 1, 1 + w * 7), 5));
            commits.push(make_commit(commits.len(), "alice", at(2024, 1, 3 + w * 7), 5));
        }
        // Bob: everything in the first week.
        for d in 1..=6u32 {
            commits.push(make_commit(commits.len(), "bob", at(2024, 1, d), 5));
        }
        let perf = run(&commits, at(2024, 2, 1));
        let alice = perf.iter().find(|p| p.totals.name == "alice").unwrap();
        let bob = perf.iter().find(|p| p.totals.name == "bob").unwrap();
        assert_eq!(alice.activity_pattern, ActivityPattern::Regular);
        assert_eq!(bob.activity_pattern, ActivityPattern::Burst);
        assert!(alice.consistency_score > bob.consistency_score);
        assert_eq!(alice.ranks.by_consistency, 1);
    }

    #[test]
    fn trend_compares_recent_and_previous_windows() {
        let t = Thresholds::default();
        let now = at(2024, 3, 1);
        let recent: Vec<DateTime<Utc>> = (1..=6).map(|i| now - Duration::days(i)).collect();
        let previous: Vec<DateTime<Utc>> = (31..=33).map(|i| now - Duration::days(i)).collect();

        let improving = [recent.clone(), previous.clone()].concat();
        assert_eq!(recent_trend(&improving, now, &t).last_30_days, TrendDirection::Improving);

        let declining = [recent[..1].to_vec(), previous.clone(), previous.clone()].concat();
        let trend = recent_trend(&declining, now, &t);
        assert_eq!(trend.last_30_days, TrendDirection::Declining);
        assert_eq!(trend.recent_commits, 1);
        assert_eq!(trend.previous_commits, 6);

        let steady = [recent[..3].to_vec(), previous.clone()].concat();
        assert_eq!(recent_trend(&steady, now, &t).last_30_days, TrendDirection::Stable);
    }

    #[test]
    fn few_commits_force_stable_trend() {
        let t = Thresholds::default();
        let now = at(2024, 3, 1);
        let three: Vec<DateTime<Utc>> = (1..=3).map(|i| now - Duration::days(i)).collect();
        let trend = recent_trend(&three, now, &t);
        assert_eq!(trend.recent_commits, 3);
        assert_eq!(trend.last_30_days, TrendDirection::Stable);
    }

    #[test]
    fn trend_minimum_counts_all_commits() {
        // One commit predates both windows but still counts toward the minimum.
        let t = Thresholds::default();
        let now = at(2024, 3, 1);
        let mut stamps: Vec<DateTime<Utc>> = (1..=3).map(|i| now - Duration::days(i)).collect();
        stamps.push(now - Duration::days(200));
        let trend = recent_trend(&stamps, now, &t);
        assert_eq!(trend.recent_commits + trend.previous_commits, 3);
        assert_eq!(trend.last_30_days, TrendDirection::Improving);
    }

    #[test]
    fn oversized_trend_window_does_not_overflow() {
        let t = Thresholds {
            trend_window_days: 1_000_000_000,
            ..Thresholds::default()
        };
        let now = at(2024, 3, 1);
        let stamps: Vec<DateTime<Utc>> = (1..=5).map(|i| now - Duration::days(i)).collect();
        let trend = recent_trend(&stamps, now, &t);
        assert_eq!(trend.recent_commits, 5);
        assert_eq!(trend.previous_commits, 0);
    }

    #[test]
    fn peak_and_low_windows_need_two_commits() {
        assert_eq!(peak_and_low_windows(&[day(1)], 7), (None, None));

        let days = [day(1), day(2), day(10), day(11), day(12), day(20)];
        let (peak, low) = peak_and_low_windows(&days, 7);
        let peak = peak.unwrap();
        let low = low.unwrap();
        assert_eq!(peak.commits, 3);
        assert_eq!(peak.start, day(6));
        assert_eq!(low.commits, 0);
        assert_eq!(low.start, day(3));
        assert_eq!(low.end - low.start, Duration::days(6));
    }

    #[test]
    fn short_span_yields_single_window() {
        let (peak, low) = peak_and_low_windows(&[day(3), day(4)], 7);
        let peak = peak.unwrap();
        assert_eq!(peak.start, day(3));
        assert_eq!(peak.end, day(4));
        assert_eq!(peak.commits, 2);
        assert_eq!(low.unwrap(), peak);
    }

    #[test]
    fn ranks_are_one_based_and_ties_keep_input_order() {
        let commits = vec![
            make_commit(0, "alice", at(2024, 1, 1), 10),
            make_commit(1, "alice", at(2024, 1, 2), 10),
            make_commit(2, "bob", at(2024, 1, 3), 10),
            make_commit(3, "bob", at(2024, 1, 4), 10),
            make_commit(4, "carol", at(2024, 1, 5), 10),
        ];
        let perf = run(&commits, at(2024, 1, 6));
        let names: Vec<&str> = perf.iter().map(|p| p.totals.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
        assert_eq!(perf[0].ranks.by_rate, 1);
        assert_eq!(perf[1].ranks.by_rate, 2);
        assert_eq!(perf[2].ranks.by_rate, 3);
    }

    #[test]
    fn productivity_is_capped() {
        assert_eq!(productivity_score(50.0, 1000.0), MAX_PRODUCTIVITY);
        assert_eq!(productivity_score(1.0, 100.0), 20.0);
        assert_eq!(productivity_score(0.0, 0.0), 0.0);
    }

    #[test]
    fn performance_serializes_flat_camel_case() {
        let commits = vec![make_commit(0, "alice", at(2024, 1, 1), 3)];
        let perf = run(&commits, at(2024, 1, 2));
        let json = serde_json::to_value(&perf[0]).unwrap();
        assert_eq!(json["name"], "alice");
        assert_eq!(json["commitCount"], 1);
        assert!(json.get("commitsPerWeek").is_some());
        assert_eq!(json["trend"]["last30Days"], "stable");
        assert!(json["peakPeriod"].is_null());
    }
}
