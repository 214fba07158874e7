//! Author identity normalization.
//!
//! Maps raw author identities to canonical contributor names using a
//! project's alias groups and exclusion list. Exclusion always wins over
//! grouping, and matching is exact and case-sensitive.

use std::collections::{HashMap, HashSet};

use cadence_core::ProjectConfig;

/// Outcome of normalizing one raw identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity<'a> {
    /// The commit belongs to this canonical contributor.
    Canonical(&'a str),
    /// The identity is excluded; drop the commit.
    Excluded,
}

/// Lookup tables built once from a [`ProjectConfig`].
///
/// # Examples
///
/// ```
/// use cadence_core::{AuthorGroup, ProjectConfig};
/// use cadence_pulse::normalize::{AuthorNormalizer, Identity};
///
/// let project = ProjectConfig {
///     grouped_authors: vec![AuthorGroup {
///         primary_name: "Alice".into(),
///         aliases: vec!["alice@laptop".into()],
///     }],
///     excluded_users: vec!["ci-bot".into()],
/// };
/// let normalizer = AuthorNormalizer::new(&project);
/// assert_eq!(normalizer.normalize("alice@laptop"), Identity::Canonical("Alice"));
/// assert_eq!(normalizer.normalize("bob"), Identity::Canonical("bob"));
/// assert_eq!(normalizer.normalize("ci-bot"), Identity::Excluded);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuthorNormalizer {
    aliases: HashMap<String, String>,
    excluded: HashSet<String>,
}

impl AuthorNormalizer {
    /// Build the alias and exclusion tables.
    ///
    /// Groups are applied in order; if an alias were listed twice the first
    /// group would win, but [`ProjectConfig::validate`] rejects that case.
    pub fn new(project: &ProjectConfig) -> Self {
        let mut aliases = HashMap::new();
        for group in &project.grouped_authors {
            for alias in &group.aliases {
                aliases
                    .entry(alias.clone())
                    .or_insert_with(|| group.primary_name.clone());
            }
        }

        Self {
            aliases,
            excluded: project.excluded_users.iter().cloned().collect(),
        }
    }

    /// Normalize a raw author identity.
    pub fn normalize<'a>(&'a self, raw: &'a str) -> Identity<'a> {
        if self.excluded.contains(raw) {
            return Identity::Excluded;
        }
        match self.aliases.get(raw) {
            Some(primary) => Identity::Canonical(primary.as_str()),
            None => Identity::Canonical(raw),
        }
    }
}
