use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CadenceError;
use crate::types::WeekStart;

/// Top-level configuration loaded from `.cadence.toml`.
///
/// Acts as the configuration store: global [`Settings`], heuristic
/// [`Thresholds`], and one [`ProjectConfig`] per repository.
///
/// # Examples
///
/// ```
/// use cadence_core::{CadenceConfig, WeekStart};
///
/// let config = CadenceConfig::default();
/// assert_eq!(config.settings.first_day_of_week, WeekStart::Sunday);
/// assert_eq!(config.thresholds.large_commit_lines, 500);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CadenceConfig {
    /// Global settings shared by every repository.
    #[serde(default)]
    pub settings: Settings,
    /// Heuristic thresholds used by the analytics engine.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Per-repository author grouping and exclusions.
    #[serde(default)]
    pub projects: HashMap<String, ProjectConfig>,
}

impl CadenceConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Io`] if the file cannot be read, or
    /// [`CadenceError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cadence_core::CadenceConfig;
    /// use std::path::Path;
    ///
    /// let config = CadenceConfig::from_file(Path::new(".cadence.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, CadenceError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence_core::{CadenceConfig, WeekStart};
    ///
    /// let toml = r#"
    /// [settings]
    /// first_day_of_week = "monday"
    /// "#;
    /// let config = CadenceConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.settings.first_day_of_week, WeekStart::Monday);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, CadenceError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Resolve the project configuration for `repository`.
    ///
    /// Repositories without a `[projects."<name>"]` section get the empty
    /// default (no groups, no exclusions).
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::InvalidInput`] if `repository` is blank and
    /// [`CadenceError::Config`] if the stored project configuration is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence_core::CadenceConfig;
    ///
    /// let config = CadenceConfig::default();
    /// let project = config.project_config("acme/api").unwrap();
    /// assert!(project.grouped_authors.is_empty());
    /// assert!(config.project_config("  ").is_err());
    /// ```
    pub fn project_config(&self, repository: &str) -> Result<ProjectConfig, CadenceError> {
        let name = repository.trim();
        if name.is_empty() {
            return Err(CadenceError::InvalidInput(
                "repository identity is empty".into(),
            ));
        }
        let project = self.projects.get(name).cloned().unwrap_or_default();
        project.validate()?;
        Ok(project)
    }
}

/// Global settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// First day of the week for weekly buckets and seasonality (default: sunday).
    #[serde(default)]
    pub first_day_of_week: WeekStart,
}

/// Author normalization rules for one repository.
///
/// # Examples
///
/// ```
/// use cadence_core::{AuthorGroup, ProjectConfig};
///
/// let project = ProjectConfig {
///     grouped_authors: vec![AuthorGroup {
///         primary_name: "Alice".into(),
///         aliases: vec!["alice".into(), "asmith".into()],
///     }],
///     excluded_users: vec!["dependabot[bot]".into()],
/// };
/// assert!(project.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Ordered alias groups; each alias maps to its group's primary name.
    #[serde(default, alias = "groupedAuthors")]
    pub grouped_authors: Vec<AuthorGroup>,
    /// Identities whose commits are dropped entirely.
    #[serde(default, alias = "excludedUsers")]
    pub excluded_users: Vec<String>,
}

impl ProjectConfig {
    /// Check that every alias belongs to exactly one group.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Config`] naming the first alias that appears
    /// in more than one group, or a blank primary name.
    pub fn validate(&self) -> Result<(), CadenceError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for group in &self.grouped_authors {
            if group.primary_name.trim().is_empty() {
                return Err(CadenceError::Config(
                    "author group has an empty primary name".into(),
                ));
            }
            for alias in &group.aliases {
                if !seen.insert(alias.as_str()) {
                    return Err(CadenceError::Config(format!(
                        "alias '{alias}' is listed in more than one author group"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A canonical contributor and the raw identities that map to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorGroup {
    /// Canonical contributor name.
    #[serde(alias = "primaryName")]
    pub primary_name: String,
    /// Raw identities folded into `primary_name`.
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Heuristic thresholds for classification, scoring, and issue detection.
///
/// Every boundary value used by the analytics engine lives here so that
/// tests can target it and users can override it from `[thresholds]`.
///
/// # Examples
///
/// ```
/// use cadence_core::Thresholds;
///
/// let t = Thresholds::default();
/// assert_eq!(t.major_contributor_share, 0.20);
/// assert_eq!(t.trend_slope_band, 0.1);
/// assert_eq!(t.anomaly_sigma, 2.0);
/// assert_eq!(t.forecast_days, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// A commit whose added + deleted lines exceed this is "large".
    pub large_commit_lines: u64,
    /// Average commit size above this draws the smaller size penalty.
    pub medium_commit_lines: u64,
    /// Share of commits that makes a contributor count toward the bus factor.
    pub major_contributor_share: f64,
    /// Share of commits above which one contributor dominates the project.
    pub dominant_contributor_share: f64,
    /// Dominance share at which the dependency issue becomes critical.
    pub critical_dominance_share: f64,
    /// Team commits per week below this is low activity.
    pub low_velocity_per_week: f64,
    /// Team commits per week below this is critically low activity.
    pub critical_velocity_per_week: f64,
    /// Velocity change (percent) inside which the trend is stable.
    pub velocity_stable_band_pct: f64,
    /// Velocity drop (percent) considered a major decline.
    pub velocity_major_drop_pct: f64,
    /// Velocity growth (percent) that earns the health bonus.
    pub velocity_growth_bonus_pct: f64,
    /// Regression slope inside `[-band, band]` is a stable trend.
    pub trend_slope_band: f64,
    /// Residuals beyond this many standard deviations are anomalies.
    pub anomaly_sigma: f64,
    /// Number of days to forecast past the last observation.
    pub forecast_days: u32,
    /// Length of the recent/previous windows for contributor trends.
    pub trend_window_days: i64,
    /// Recent/previous ratio above which a contributor is improving.
    pub improving_ratio: f64,
    /// Recent/previous ratio below which a contributor is declining.
    pub declining_ratio: f64,
    /// Contributors with fewer commits than this always trend stable.
    pub min_commits_for_trend: u32,
    /// Consistency at or above this is regular.
    pub regular_consistency_min: f64,
    /// Peak week to average week ratio that marks bursty activity.
    pub burst_peak_ratio: f64,
    /// Width of the peak/low activity windows.
    pub peak_window_days: i64,
    /// Share of irregular contributors above which the team is irregular.
    pub irregular_team_share: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            large_commit_lines: 500,
            medium_commit_lines: 200,
            major_contributor_share: 0.20,
            dominant_contributor_share: 0.70,
            critical_dominance_share: 0.90,
            low_velocity_per_week: 2.0,
            critical_velocity_per_week: 1.0,
            velocity_stable_band_pct: 10.0,
            velocity_major_drop_pct: 50.0,
            velocity_growth_bonus_pct: 20.0,
            trend_slope_band: 0.1,
            anomaly_sigma: 2.0,
            forecast_days: 7,
            trend_window_days: 30,
            improving_ratio: 1.2,
            declining_ratio: 0.8,
            min_commits_for_trend: 4,
            regular_consistency_min: 7.0,
            burst_peak_ratio: 3.0,
            peak_window_days: 7,
            irregular_team_share: 0.5,
        }
    }
}

/// Longest trend, peak, or forecast window accepted from configuration.
const MAX_WINDOW_DAYS: i64 = 3650;

impl Thresholds {
    /// Check that every threshold is finite and inside its usable range.
    ///
    /// Window lengths must be between 1 and 3650 days, shares must lie in
    /// `[0, 1]`, and `anomaly_sigma` must be positive.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::Config`] naming the first offending key.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence_core::Thresholds;
    ///
    /// assert!(Thresholds::default().validate().is_ok());
    /// let t = Thresholds { anomaly_sigma: -1.0, ..Thresholds::default() };
    /// assert!(t.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), CadenceError> {
        let windows = [
            ("trend_window_days", self.trend_window_days),
            ("peak_window_days", self.peak_window_days),
            ("forecast_days", i64::from(self.forecast_days)),
        ];
        for (key, days) in windows {
            if !(1..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(CadenceError::Config(format!(
                    "thresholds.{key} must be between 1 and {MAX_WINDOW_DAYS} days, got {days}"
                )));
            }
        }

        let shares = [
            ("major_contributor_share", self.major_contributor_share),
            ("dominant_contributor_share", self.dominant_contributor_share),
            ("critical_dominance_share", self.critical_dominance_share),
            ("irregular_team_share", self.irregular_team_share),
        ];
        for (key, share) in shares {
            if !(0.0..=1.0).contains(&share) {
                return Err(CadenceError::Config(format!(
                    "thresholds.{key} must be a share between 0 and 1, got {share}"
                )));
            }
        }

        let non_negative = [
            ("low_velocity_per_week", self.low_velocity_per_week),
            ("critical_velocity_per_week", self.critical_velocity_per_week),
            ("velocity_stable_band_pct", self.velocity_stable_band_pct),
            ("velocity_major_drop_pct", self.velocity_major_drop_pct),
            ("velocity_growth_bonus_pct", self.velocity_growth_bonus_pct),
            ("trend_slope_band", self.trend_slope_band),
            ("improving_ratio", self.improving_ratio),
            ("declining_ratio", self.declining_ratio),
            ("regular_consistency_min", self.regular_consistency_min),
            ("burst_peak_ratio", self.burst_peak_ratio),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CadenceError::Config(format!(
                    "thresholds.{key} must be a non-negative number, got {value}"
                )));
            }
        }

        if !self.anomaly_sigma.is_finite() || self.anomaly_sigma <= 0.0 {
            return Err(CadenceError::Config(format!(
                "thresholds.anomaly_sigma must be positive, got {}",
                self.anomaly_sigma
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = CadenceConfig::default();
        assert_eq!(config.settings.first_day_of_week, WeekStart::Sunday);
        assert!(config.projects.is_empty());
        assert_eq!(config.thresholds.large_commit_lines, 500);
        assert_eq!(config.thresholds.medium_commit_lines, 200);
        assert_eq!(config.thresholds.improving_ratio, 1.2);
        assert_eq!(config.thresholds.declining_ratio, 0.8);
        assert_eq!(config.thresholds.min_commits_for_trend, 4);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = CadenceConfig::from_toml("").unwrap();
        assert_eq!(config.settings.first_day_of_week, WeekStart::Sunday);
        assert_eq!(config.thresholds, Thresholds::default());
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = CadenceConfig::from_toml("{{invalid}}");
        assert!(result.is_err());
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[settings]
first_day_of_week = "monday"

[thresholds]
large_commit_lines = 800
anomaly_sigma = 3.0

[projects."acme/api"]
excluded_users = ["ci-bot"]

[[projects."acme/api".grouped_authors]]
primary_name = "Alice"
aliases = ["alice", "alice@old-laptop"]
"#;
        let config = CadenceConfig::from_toml(toml).unwrap();
        assert_eq!(config.settings.first_day_of_week, WeekStart::Monday);
        assert_eq!(config.thresholds.large_commit_lines, 800);
        assert_eq!(config.thresholds.anomaly_sigma, 3.0);
        // Untouched thresholds keep their defaults.
        assert_eq!(config.thresholds.medium_commit_lines, 200);

        let project = config.project_config("acme/api").unwrap();
        assert_eq!(project.excluded_users, vec!["ci-bot"]);
        assert_eq!(project.grouped_authors[0].primary_name, "Alice");
        assert_eq!(project.grouped_authors[0].aliases.len(), 2);
    }

    #[test]
    fn camel_case_project_keys_are_accepted() {
        let toml = r#"
[projects.web]
excludedUsers = ["bot"]

[[projects.web.groupedAuthors]]
primaryName = "Bob"
aliases = ["bobby"]
"#;
        let config = CadenceConfig::from_toml(toml).unwrap();
        let project = config.project_config("web").unwrap();
        assert_eq!(project.excluded_users, vec!["bot"]);
        assert_eq!(project.grouped_authors[0].primary_name, "Bob");
    }

    #[test]
    fn unknown_repository_gets_empty_project() {
        let config = CadenceConfig::default();
        let project = config.project_config("somewhere/else").unwrap();
        assert_eq!(project, ProjectConfig::default());
    }

    #[test]
    fn blank_repository_is_rejected() {
        let config = CadenceConfig::default();
        let err = config.project_config("").unwrap_err();
        assert!(matches!(err, CadenceError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_alias_is_rejected() {
        let project = ProjectConfig {
            grouped_authors: vec![
                AuthorGroup {
                    primary_name: "Alice".into(),
                    aliases: vec!["ali".into()],
                },
                AuthorGroup {
                    primary_name: "Alicia".into(),
                    aliases: vec!["ali".into()],
                },
            ],
            excluded_users: vec![],
        };
        let err = project.validate().unwrap_err();
        assert!(err.to_string().contains("'ali'"));
    }

    #[test]
    fn blank_primary_name_is_rejected() {
        let project = ProjectConfig {
            grouped_authors: vec![AuthorGroup {
                primary_name: " ".into(),
                aliases: vec!["x".into()],
            }],
            excluded_users: vec![],
        };
        assert!(project.validate().is_err());
    }

    #[test]
    fn oversized_trend_window_is_rejected() {
        let config = CadenceConfig::from_toml("[thresholds]\ntrend_window_days = 1000000000").unwrap();
        let err = config.thresholds.validate().unwrap_err();
        assert!(matches!(err, CadenceError::Config(_)));
        assert!(err.to_string().contains("trend_window_days"));
    }

    #[test]
    fn threshold_ranges_are_checked() {
        let bad = [
            Thresholds { forecast_days: 0, ..Thresholds::default() },
            Thresholds { forecast_days: 1_000_000, ..Thresholds::default() },
            Thresholds { peak_window_days: -3, ..Thresholds::default() },
            Thresholds { anomaly_sigma: 0.0, ..Thresholds::default() },
            Thresholds { anomaly_sigma: f64::NAN, ..Thresholds::default() },
            Thresholds { major_contributor_share: 1.5, ..Thresholds::default() },
            Thresholds { improving_ratio: -0.2, ..Thresholds::default() },
        ];
        for t in bad {
            assert!(t.validate().is_err(), "{t:?} should be rejected");
        }
        let edge = Thresholds {
            trend_window_days: 3650,
            forecast_days: 1,
            major_contributor_share: 1.0,
            ..Thresholds::default()
        };
        assert!(edge.validate().is_ok());
    }
}
