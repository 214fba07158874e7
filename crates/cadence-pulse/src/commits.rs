//! Commit records as supplied by a history provider.
//!
//! A record carries structured per-file line counts when the provider has
//! them. When it does not, the optional stat summary (`git log --numstat`
//! or `--shortstat` text) is parsed instead, and a commit with neither still
//! counts as a commit with zero lines.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One commit from the repository history.
///
/// # Examples
///
/// ```
/// use cadence_pulse::commits::{CommitRecord, FileStat};
/// use chrono::{TimeZone, Utc};
///
/// let commit = CommitRecord {
///     id: "a1b2c3d".into(),
///     author: "alice".into(),
///     timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
///     files: vec![FileStat::new("src/lib.rs", 12, 4)],
///     stat_summary: None,
/// };
/// let stats = commit.diff_stats();
/// assert_eq!(stats.lines_added, 12);
/// assert_eq!(stats.file_count, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Commit hash or other unique identifier.
    pub id: String,
    /// Raw author identity, before normalization.
    pub author: String,
    /// Commit time.
    pub timestamp: DateTime<Utc>,
    /// Per-file line counts.
    #[serde(default)]
    pub files: Vec<FileStat>,
    /// Patch-style stat text used when `files` is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_summary: Option<String>,
}

/// Line counts for one touched file. Binary files have no counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStat {
    /// File path relative to the repository root.
    pub path: String,
    /// Lines inserted, `None` for binary files.
    #[serde(default)]
    pub insertions: Option<u64>,
    /// Lines deleted, `None` for binary files.
    #[serde(default)]
    pub deletions: Option<u64>,
}

impl FileStat {
    /// A text file change with known line counts.
    pub fn new(path: impl Into<String>, insertions: u64, deletions: u64) -> Self {
        Self {
            path: path.into(),
            insertions: Some(insertions),
            deletions: Some(deletions),
        }
    }

    /// A file change without line counts (binary content).
    pub fn binary(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            insertions: None,
            deletions: None,
        }
    }

    fn counts(&self) -> Option<(u64, u64)> {
        Some((self.insertions?, self.deletions?))
    }
}

/// Resolved line statistics for a single commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffStats {
    /// Total lines inserted.
    pub lines_added: u64,
    /// Total lines deleted.
    pub lines_deleted: u64,
    /// Paths with numeric line counts.
    pub paths: BTreeSet<String>,
    /// Number of files with numeric line counts. Can exceed `paths.len()`
    /// when only a shortstat line was available.
    pub file_count: usize,
}

impl DiffStats {
    /// `lines_added + lines_deleted`, saturating at `u64::MAX`.
    pub fn total_lines(&self) -> u64 {
        self.lines_added.saturating_add(self.lines_deleted)
    }
}

impl CommitRecord {
    /// Resolve this commit's line statistics.
    ///
    /// Structured `files` win; otherwise the stat summary is parsed; if that
    /// is absent or unrecognizable the result is all zeros.
    pub fn diff_stats(&self) -> DiffStats {
        if !self.files.is_empty() {
            return structured_stats(&self.files);
        }

        match self.stat_summary.as_deref() {
            Some(summary) => parse_stat_summary(summary).unwrap_or_else(|| {
                tracing::warn!(commit = %self.id, "unrecognized stat summary, counting zero lines");
                DiffStats::default()
            }),
            None => DiffStats::default(),
        }
    }
}

fn structured_stats(files: &[FileStat]) -> DiffStats {
    let mut stats = DiffStats::default();
    for file in files {
        let Some((added, deleted)) = file.counts() else {
            continue;
        };
        // A path listed twice is one file; its counts still add up.
        stats.lines_added = stats.lines_added.saturating_add(added);
        stats.lines_deleted = stats.lines_deleted.saturating_add(deleted);
        stats.paths.insert(file.path.clone());
    }
    stats.file_count = stats.paths.len();
    stats
}

/// Parse a patch-style stat summary.
///
/// Understands `--numstat` lines (`12\t3\tsrc/main.rs`, `-\t-\tlogo.png`)
/// and the `--shortstat` line (`3 files changed, 10 insertions(+), 2
/// deletions(-)`). Numstat lines take precedence when both are present.
/// Returns `None` if no line is recognized.
///
/// # Examples
///
/// ```
/// use cadence_pulse::commits::parse_stat_summary;
///
/// let stats = parse_stat_summary("10\t2\tsrc/a.rs\n-\t-\timg.png\n").unwrap();
/// assert_eq!(stats.lines_added, 10);
/// assert_eq!(stats.file_count, 1);
///
/// let stats = parse_stat_summary(" 2 files changed, 7 insertions(+)").unwrap();
/// assert_eq!(stats.lines_added, 7);
/// assert_eq!(stats.lines_deleted, 0);
/// assert_eq!(stats.file_count, 2);
///
/// assert!(parse_stat_summary("Merge branch 'main'").is_none());
/// ```
pub fn parse_stat_summary(summary: &str) -> Option<DiffStats> {
    let mut numstat: Vec<FileStat> = Vec::new();
    let mut shortstat: Option<DiffStats> = None;

    for line in summary.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(file) = parse_numstat_line(line) {
            numstat.push(file);
        } else if let Some(stats) = parse_shortstat_line(line) {
            shortstat = Some(stats);
        }
    }

    if !numstat.is_empty() {
        return Some(structured_stats(&numstat));
    }
    shortstat
}

fn parse_numstat_line(line: &str) -> Option<FileStat> {
    let mut parts = line.splitn(3, '\t');
    let added = parts.next()?.trim();
    let deleted = parts.next()?.trim();
    let path = parts.next()?.trim();
    if path.is_empty() {
        return None;
    }

    match (added, deleted) {
        ("-", "-") => Some(FileStat::binary(path)),
        (a, d) => Some(FileStat::new(path, a.parse().ok()?, d.parse().ok()?)),
    }
}

fn parse_shortstat_line(line: &str) -> Option<DiffStats> {
    let mut stats = DiffStats::default();
    let mut recognized = false;

    for part in line.split(',') {
        let mut words = part.split_whitespace();
        let Some(count) = words.next().and_then(|w| w.parse::<u64>().ok()) else {
            continue;
        };
        let Some(label) = words.next() else {
            continue;
        };

        if label.starts_with("file") {
            stats.file_count = usize::try_from(count).unwrap_or(usize::MAX);
            recognized = true;
        } else if label.starts_with("insertion") {
            stats.lines_added = count;
            recognized = true;
        } else if label.starts_with("deletion") {
            stats.lines_deleted = count;
            recognized = true;
        }
    }

    recognized.then_some(stats)
}
