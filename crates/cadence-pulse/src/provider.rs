//! Commit history sources.
//!
//! The engine never talks to a version-control system itself. A
//! [`HistoryProvider`] hands it commit records, and [`JsonHistoryProvider`]
//! reads them from an exported JSON log.

use std::path::PathBuf;

use cadence_core::{CadenceError, Result};
use chrono::NaiveDate;

use crate::commits::CommitRecord;

/// Restrictions a caller may ask a provider to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// First day to include (UTC).
    pub since: Option<NaiveDate>,
    /// Last day to include (UTC).
    pub until: Option<NaiveDate>,
    /// Raw author identity to keep, before normalization.
    pub author: Option<String>,
}

impl HistoryQuery {
    /// Whether `commit` passes every restriction.
    pub fn matches(&self, commit: &CommitRecord) -> bool {
        let day = commit.timestamp.date_naive();
        self.since.map_or(true, |since| day >= since)
            && self.until.map_or(true, |until| day <= until)
            && self.author.as_deref().map_or(true, |a| commit.author == a)
    }
}

/// Anything that can supply a repository's commits.
///
/// Implementations may return commits in any order.
pub trait HistoryProvider {
    fn commits(&self, query: &HistoryQuery) -> Result<Vec<CommitRecord>>;
}

/// Reads a JSON array of [`CommitRecord`]s from disk.
///
/// # Examples
///
/// ```no_run
/// use cadence_pulse::provider::{HistoryProvider, HistoryQuery, JsonHistoryProvider};
///
/// let provider = JsonHistoryProvider::new("history.json");
/// let commits = provider.commits(&HistoryQuery::default()).unwrap();
/// println!("{} commits", commits.len());
/// ```
#[derive(Debug, Clone)]
pub struct JsonHistoryProvider {
    path: PathBuf,
}

impl JsonHistoryProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryProvider for JsonHistoryProvider {
    fn commits(&self, query: &HistoryQuery) -> Result<Vec<CommitRecord>> {
        if !self.path.exists() {
            return Err(CadenceError::FileNotFound(self.path.clone()));
        }
        let content = std::fs::read_to_string(&self.path)?;
        let commits = parse_commit_log(&content)?;
        let total = commits.len();
        let kept: Vec<CommitRecord> = commits.into_iter().filter(|c| query.matches(c)).collect();
        tracing::debug!(
            path = %self.path.display(),
            total,
            kept = kept.len(),
            "loaded commit log"
        );
        Ok(kept)
    }
}

/// Parse a JSON commit log.
///
/// # Errors
///
/// Returns [`CadenceError::Serialization`] if `content` is not a JSON array
/// of commit records.
pub fn parse_commit_log(content: &str) -> Result<Vec<CommitRecord>> {
    Ok(serde_json::from_str(content)?)
}
