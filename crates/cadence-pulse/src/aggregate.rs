//! Commit aggregation and gap filling.
//!
//! Folds normalized commits into per-contributor totals and per-day
//! activity buckets, then densifies the daily series so every calendar day
//! between the first and last commit has an entry.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::commits::CommitRecord;
use crate::normalize::{AuthorNormalizer, Identity};

/// Totals for one canonical contributor.
///
/// # Examples
///
/// ```
/// use cadence_pulse::aggregate::ContributorAggregate;
///
/// let agg = ContributorAggregate {
///     name: "alice".into(),
///     commit_count: 12,
///     lines_added: 340,
///     lines_deleted: 120,
///     distinct_files_changed: 9,
/// };
/// assert_eq!(agg.total_lines(), 460);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorAggregate {
    /// Canonical contributor name.
    pub name: String,
    /// Commits surviving normalization.
    pub commit_count: u32,
    /// Lines inserted across all commits.
    pub lines_added: u64,
    /// Lines deleted across all commits.
    pub lines_deleted: u64,
    /// Unique paths with numeric line counts.
    pub distinct_files_changed: usize,
}

impl ContributorAggregate {
    /// `lines_added + lines_deleted`, saturating at `u64::MAX`.
    pub fn total_lines(&self) -> u64 {
        self.lines_added.saturating_add(self.lines_deleted)
    }
}

/// Activity on a single calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    /// Calendar day.
    pub date: NaiveDate,
    /// Commits on this day.
    pub commit_count: u32,
    /// Distinct canonical contributors who committed on this day.
    pub distinct_contributor_count: u32,
    /// Lines inserted on this day.
    pub lines_added: u64,
    /// Lines deleted on this day.
    pub lines_deleted: u64,
}

impl DailyActivity {
    /// An inactive day.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            commit_count: 0,
            distinct_contributor_count: 0,
            lines_added: 0,
            lines_deleted: 0,
        }
    }
}

/// An inclusive range of calendar days.
///
/// # Examples
///
/// ```
/// use cadence_pulse::aggregate::DateSpan;
/// use chrono::NaiveDate;
///
/// let span = DateSpan::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
/// );
/// assert_eq!(span.days(), 8);
/// assert_eq!(span.weeks(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSpan {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of calendar days, counting both ends. 0 if reversed.
    pub fn days(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(0)
    }

    /// Calendar weeks covered, `ceil(days / 7)`, never less than 1.
    pub fn weeks(&self) -> u32 {
        let weeks = (self.days() + 6) / 7;
        u32::try_from(weeks).unwrap_or(u32::MAX).max(1)
    }

    /// Whether `date` falls inside the span.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A commit after normalization, reduced to what the metrics need.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCommit {
    /// Canonical contributor name.
    pub contributor: String,
    /// Commit time.
    pub timestamp: DateTime<Utc>,
    /// Lines inserted.
    pub lines_added: u64,
    /// Lines deleted.
    pub lines_deleted: u64,
    /// Files with numeric line counts.
    pub file_count: usize,
}

impl NormalizedCommit {
    /// Calendar day (UTC) of the commit.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// `lines_added + lines_deleted`, saturating at `u64::MAX`.
    pub fn total_lines(&self) -> u64 {
        self.lines_added.saturating_add(self.lines_deleted)
    }
}

/// Result of folding a commit set.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// One entry per canonical contributor, most commits first, ties by name.
    pub contributors: Vec<ContributorAggregate>,
    /// Sparse per-day buckets (commit days only).
    pub daily: BTreeMap<NaiveDate, DailyActivity>,
    /// Surviving commits in chronological order.
    pub commits: Vec<NormalizedCommit>,
    /// Commits dropped because their author is excluded.
    pub excluded_commits: usize,
}

impl Aggregation {
    /// First and last commit day, if any commit survived.
    pub fn date_range(&self) -> Option<DateSpan> {
        let first = *self.daily.keys().next()?;
        let last = *self.daily.keys().next_back()?;
        Some(DateSpan::new(first, last))
    }

    /// The gap-filled daily series between the first and last commit day.
    pub fn dense_daily(&self) -> Vec<DailyActivity> {
        match self.date_range() {
            Some(span) => fill_gaps(&self.daily, span.start, span.end),
            None => Vec::new(),
        }
    }
}

#[derive(Default)]
struct ContributorAcc {
    commits: u32,
    added: u64,
    deleted: u64,
    files: HashSet<String>,
}

#[derive(Default)]
struct DayAcc {
    commits: u32,
    added: u64,
    deleted: u64,
    contributors: HashSet<String>,
}

/// Normalize and fold `commits` into contributor and daily aggregates.
///
/// Input order does not matter; commits are sorted by timestamp (then id)
/// before folding. Excluded authors are dropped before anything is counted.
///
/// # Examples
///
/// ```
/// use cadence_core::ProjectConfig;
/// use cadence_pulse::aggregate::aggregate;
/// use cadence_pulse::commits::{CommitRecord, FileStat};
/// use cadence_pulse::normalize::AuthorNormalizer;
/// use chrono::{TimeZone, Utc};
///
/// let commits = vec![CommitRecord {
///     id: "1".into(),
///     author: "alice".into(),
///     timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap(),
///     files: vec![FileStat::new("a.rs", 5, 1)],
///     stat_summary: None,
/// }];
/// let agg = aggregate(&commits, &AuthorNormalizer::new(&ProjectConfig::default()));
/// assert_eq!(agg.contributors[0].commit_count, 1);
/// assert_eq!(agg.daily.len(), 1);
/// ```
pub fn aggregate(commits: &[CommitRecord], normalizer: &AuthorNormalizer) -> Aggregation {
    let mut ordered: Vec<&CommitRecord> = commits.iter().collect();
    ordered.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

    let mut per_contributor: HashMap<String, ContributorAcc> = HashMap::new();
    let mut per_day: BTreeMap<NaiveDate, DayAcc> = BTreeMap::new();
    let mut normalized = Vec::with_capacity(ordered.len());
    let mut excluded_commits = 0usize;

    for commit in ordered {
        let name = match normalizer.normalize(&commit.author) {
            Identity::Canonical(name) => name.to_string(),
            Identity::Excluded => {
                excluded_commits += 1;
                continue;
            }
        };

        let stats = commit.diff_stats();
        let date = commit.timestamp.date_naive();

        let acc = per_contributor.entry(name.clone()).or_default();
        acc.commits += 1;
        acc.added = acc.added.saturating_add(stats.lines_added);
        acc.deleted = acc.deleted.saturating_add(stats.lines_deleted);
        acc.files.extend(stats.paths.iter().cloned());

        let day = per_day.entry(date).or_default();
        day.commits += 1;
        day.added = day.added.saturating_add(stats.lines_added);
        day.deleted = day.deleted.saturating_add(stats.lines_deleted);
        day.contributors.insert(name.clone());

        normalized.push(NormalizedCommit {
            contributor: name,
            timestamp: commit.timestamp,
            lines_added: stats.lines_added,
            lines_deleted: stats.lines_deleted,
            file_count: stats.file_count,
        });
    }

    let mut contributors: Vec<ContributorAggregate> = per_contributor
        .into_iter()
        .map(|(name, acc)| ContributorAggregate {
            name,
            commit_count: acc.commits,
            lines_added: acc.added,
            lines_deleted: acc.deleted,
            distinct_files_changed: acc.files.len(),
        })
        .collect();
    contributors.sort_by(|a, b| {
        b.commit_count
            .cmp(&a.commit_count)
            .then_with(|| a.name.cmp(&b.name))
    });

    let daily = per_day
        .into_iter()
        .map(|(date, acc)| {
            (
                date,
                DailyActivity {
                    date,
                    commit_count: acc.commits,
                    distinct_contributor_count: acc.contributors.len() as u32,
                    lines_added: acc.added,
                    lines_deleted: acc.deleted,
                },
            )
        })
        .collect();

    tracing::debug!(
        commits = normalized.len(),
        excluded = excluded_commits,
        contributors = contributors.len(),
        "aggregated commit history"
    );

    Aggregation {
        contributors,
        daily,
        commits: normalized,
        excluded_commits,
    }
}

/// Densify a sparse daily map over `[first, last]` inclusive.
///
/// Days missing from `daily` are zero-filled. Returns an empty series when
/// `first > last`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use cadence_pulse::aggregate::{fill_gaps, DailyActivity};
/// use chrono::NaiveDate;
///
/// let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let d3 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// let mut sparse = BTreeMap::new();
/// sparse.insert(d1, DailyActivity { commit_count: 2, ..DailyActivity::empty(d1) });
/// sparse.insert(d3, DailyActivity { commit_count: 1, ..DailyActivity::empty(d3) });
///
/// let dense = fill_gaps(&sparse, d1, d3);
/// assert_eq!(dense.len(), 3);
/// assert_eq!(dense[1].commit_count, 0);
/// ```
pub fn fill_gaps(
    daily: &BTreeMap<NaiveDate, DailyActivity>,
    first: NaiveDate,
    last: NaiveDate,
) -> Vec<DailyActivity> {
    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| {
            daily
                .get(&day)
                .cloned()
                .unwrap_or_else(|| DailyActivity::empty(day))
        })
        .collect()
}
