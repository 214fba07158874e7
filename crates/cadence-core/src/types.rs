use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Severity of a detected project issue.
///
/// # Examples
///
/// ```
/// use cadence_core::Severity;
///
/// let s: Severity = serde_json::from_str("\"critical\"").unwrap();
/// assert_eq!(s, Severity::Critical);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth noting, no action needed yet.
    Low,
    /// Should be addressed in the normal course of work.
    Medium,
    /// Needs attention soon.
    High,
    /// Immediate risk to the project.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

impl Severity {
    /// Returns `true` if `self` is at least as severe as `threshold`.
    ///
    /// Severity order: Critical > High > Medium > Low.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence_core::Severity;
    ///
    /// assert!(Severity::Critical.meets_threshold(Severity::High));
    /// assert!(Severity::High.meets_threshold(Severity::High));
    /// assert!(!Severity::Medium.meets_threshold(Severity::High));
    /// ```
    pub fn meets_threshold(self, threshold: Severity) -> bool {
        self.rank() >= threshold.rank()
    }

    /// Numeric rank, higher is more severe.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Low => 0,
            Severity::Medium => 1,
            Severity::High => 2,
            Severity::Critical => 3,
        }
    }
}

/// First day of the calendar week.
///
/// Governs weekly bucket boundaries in contributor consistency scoring and
/// the ordering of day-of-week seasonality.
///
/// # Examples
///
/// ```
/// use cadence_core::WeekStart;
/// use chrono::NaiveDate;
///
/// // 2024-01-03 is a Wednesday.
/// let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// assert_eq!(WeekStart::Sunday.week_of(date), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
/// assert_eq!(WeekStart::Monday.week_of(date), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Position of `day` within a week that starts on `self` (0..=6).
    pub fn day_index(self, day: Weekday) -> u32 {
        match self {
            WeekStart::Sunday => day.num_days_from_sunday(),
            WeekStart::Monday => day.num_days_from_monday(),
        }
    }

    /// The first day of the week containing `date`.
    pub fn week_of(self, date: NaiveDate) -> NaiveDate {
        date - Duration::days(i64::from(self.day_index(date.weekday())))
    }

    /// Weekdays in display order, starting from `self`.
    pub fn ordered_days(self) -> [Weekday; 7] {
        let first = match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        };
        let mut days = [first; 7];
        for i in 1..7 {
            days[i] = days[i - 1].succ();
        }
        days
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Sunday => write!(f, "sunday"),
            WeekStart::Monday => write!(f, "monday"),
        }
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            other => Err(format!("unknown week start: {other}")),
        }
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use cadence_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn severity_roundtrips_through_json() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, "\"high\"");

        let parsed: Severity = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, Severity::Medium);
    }

    #[test]
    fn severity_from_str() {
        assert_eq!("low".parse::<Severity>().unwrap(), Severity::Low);
        assert_eq!("Critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("bug".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_meets_threshold() {
        assert!(Severity::Critical.meets_threshold(Severity::Low));
        assert!(Severity::High.meets_threshold(Severity::Medium));
        assert!(Severity::Medium.meets_threshold(Severity::Medium));
        assert!(!Severity::Low.meets_threshold(Severity::Medium));
        assert!(!Severity::High.meets_threshold(Severity::Critical));
    }

    #[test]
    fn week_start_defaults_to_sunday() {
        assert_eq!(WeekStart::default(), WeekStart::Sunday);
        assert_eq!("Monday".parse::<WeekStart>().unwrap(), WeekStart::Monday);
        assert!("friday".parse::<WeekStart>().is_err());
    }

    #[test]
    fn week_of_respects_start_day() {
        // 2024-01-07 is a Sunday.
        let sunday = date(2024, 1, 7);
        assert_eq!(WeekStart::Sunday.week_of(sunday), sunday);
        assert_eq!(WeekStart::Monday.week_of(sunday), date(2024, 1, 1));

        let monday = date(2024, 1, 8);
        assert_eq!(WeekStart::Sunday.week_of(monday), sunday);
        assert_eq!(WeekStart::Monday.week_of(monday), monday);
    }

    #[test]
    fn day_index_is_relative_to_start() {
        assert_eq!(WeekStart::Sunday.day_index(Weekday::Sun), 0);
        assert_eq!(WeekStart::Sunday.day_index(Weekday::Sat), 6);
        assert_eq!(WeekStart::Monday.day_index(Weekday::Sun), 6);
        assert_eq!(WeekStart::Monday.day_index(Weekday::Mon), 0);
    }

    #[test]
    fn ordered_days_start_at_configured_day() {
        let days = WeekStart::Monday.ordered_days();
        assert_eq!(days[0], Weekday::Mon);
        assert_eq!(days[6], Weekday::Sun);
        assert_eq!(WeekStart::Sunday.ordered_days()[0], Weekday::Sun);
    }
}
