//! Time-series analysis of the daily commit-count series.
//!
//! Runs independently of the contributor metrics: ordinary least squares
//! against the day index, volatility, residual anomalies, a short linear
//! forecast, and day-of-week / month seasonality.

use std::collections::{BTreeMap, HashMap};

use cadence_core::{Thresholds, WeekStart};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::aggregate::DailyActivity;
use crate::stats;

/// Direction of a fitted or compared series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl Direction {
    /// Classify a regression slope against a symmetric stable band.
    pub fn from_slope(slope: f64, band: f64) -> Self {
        if slope > band {
            Self::Increasing
        } else if slope < -band {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        })
    }
}

/// Whether an anomaly sits above or below the fitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    High,
    Low,
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::High => "high",
            Self::Low => "low",
        })
    }
}

/// A day whose count strays too far from the regression line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub date: NaiveDate,
    pub value: f64,
    pub predicted: f64,
    pub kind: AnomalyKind,
}

/// One extrapolated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Predicted commit count, never negative.
    pub value: f64,
}

/// Mean commits for one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayMean {
    pub weekday: Weekday,
    pub mean: f64,
    /// Number of days of this weekday in the series.
    pub samples: usize,
}

/// Mean commits per day for one calendar month (1–12).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthMean {
    pub month: u32,
    pub mean: f64,
    pub samples: usize,
}

/// Recurring patterns in the series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seasonality {
    /// Observed weekdays, ordered from the configured week start.
    pub by_weekday: Vec<WeekdayMean>,
    /// Observed months, ascending.
    pub by_month: Vec<MonthMean>,
}

impl Seasonality {
    /// The weekday with the highest mean, if any.
    pub fn busiest_weekday(&self) -> Option<&WeekdayMean> {
        self.by_weekday
            .iter()
            .filter(|w| w.mean > 0.0)
            .max_by(|a, b| a.mean.partial_cmp(&b.mean).unwrap_or(std::cmp::Ordering::Equal))
    }
}

/// Everything derived from the daily series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    /// Number of days analyzed.
    pub points: usize,
    pub slope: f64,
    pub intercept: f64,
    pub trend: Direction,
    /// Coefficient of variation of the daily counts.
    pub volatility: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub anomalies: Vec<Anomaly>,
    pub forecast: Vec<ForecastPoint>,
    pub seasonality: Seasonality,
}

/// Ordinary least squares of `values` against `x = 0..n`.
///
/// Returns `(slope, intercept)`; fewer than two points gives `(0, mean)`.
///
/// # Examples
///
/// ```
/// use cadence_pulse::trends::linear_regression;
///
/// let (slope, intercept) = linear_regression(&[1.0, 3.0, 5.0, 7.0]);
/// assert!((slope - 2.0).abs() < 1e-12);
/// assert!((intercept - 1.0).abs() < 1e-12);
/// ```
pub fn linear_regression(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    if values.len() < 2 {
        return (0.0, stats::mean(values));
    }

    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_xx: f64 = (0..values.len()).map(|i| (i as f64).powi(2)).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return (0.0, stats::mean(values));
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    (slope, intercept)
}

/// Classify one observation against its prediction.
///
/// Flags strictly beyond `limit` in either direction; a residual exactly
/// equal to `limit` is not an anomaly.
///
/// # Examples
///
/// ```
/// use cadence_pulse::trends::{classify_anomaly, AnomalyKind};
///
/// assert_eq!(classify_anomaly(12.0, 10.0, 2.0), None);
/// assert_eq!(classify_anomaly(12.5, 10.0, 2.0), Some(AnomalyKind::High));
/// assert_eq!(classify_anomaly(7.5, 10.0, 2.0), Some(AnomalyKind::Low));
/// ```
pub fn classify_anomaly(actual: f64, predicted: f64, limit: f64) -> Option<AnomalyKind> {
    let residual = actual - predicted;
    if residual.abs() <= limit {
        None
    } else if residual > 0.0 {
        Some(AnomalyKind::High)
    } else {
        Some(AnomalyKind::Low)
    }
}

/// Analyze a dense, date-ascending daily series.
///
/// Fewer than two points yields slope 0, a stable trend, and no anomalies,
/// forecast, or seasonality.
pub fn analyze_series(
    series: &[DailyActivity],
    week_start: WeekStart,
    thresholds: &Thresholds,
) -> TrendAnalysis {
    let values: Vec<f64> = series.iter().map(|d| f64::from(d.commit_count)).collect();
    if values.len() < 2 {
        return TrendAnalysis {
            points: values.len(),
            mean: stats::mean(&values),
            ..TrendAnalysis::default()
        };
    }

    let (slope, intercept) = linear_regression(&values);
    let mean = stats::mean(&values);
    let std_dev = stats::std_dev(&values);
    let limit = thresholds.anomaly_sigma * std_dev;

    let anomalies: Vec<Anomaly> = series
        .iter()
        .zip(&values)
        .enumerate()
        .filter_map(|(i, (day, value))| {
            let predicted = slope * i as f64 + intercept;
            classify_anomaly(*value, predicted, limit).map(|kind| Anomaly {
                date: day.date,
                value: *value,
                predicted,
                kind,
            })
        })
        .collect();

    let forecast = forecast(series, slope, intercept, thresholds.forecast_days);

    tracing::debug!(
        points = values.len(),
        slope,
        anomalies = anomalies.len(),
        "analyzed daily series"
    );

    TrendAnalysis {
        points: values.len(),
        slope,
        intercept,
        trend: Direction::from_slope(slope, thresholds.trend_slope_band),
        volatility: stats::coefficient_of_variation(&values),
        mean,
        std_dev,
        anomalies,
        forecast,
        seasonality: seasonality(series, week_start),
    }
}

fn forecast(series: &[DailyActivity], slope: f64, intercept: f64, days: u32) -> Vec<ForecastPoint> {
    let Some(last) = series.last() else {
        return Vec::new();
    };
    let last_index = series.len() as f64 - 1.0;

    (1..=days)
        .map(|step| ForecastPoint {
            date: last.date + Duration::days(i64::from(step)),
            value: (slope * (last_index + f64::from(step)) + intercept).max(0.0),
        })
        .collect()
}

/// Mean commits by weekday and by calendar month.
pub fn seasonality(series: &[DailyActivity], week_start: WeekStart) -> Seasonality {
    let mut weekdays: HashMap<Weekday, (f64, usize)> = HashMap::new();
    let mut months: BTreeMap<u32, (f64, usize)> = BTreeMap::new();

    for day in series {
        let weekday = weekdays.entry(day.date.weekday()).or_insert((0.0, 0));
        weekday.0 += f64::from(day.commit_count);
        weekday.1 += 1;

        let month = months.entry(day.date.month()).or_insert((0.0, 0));
        month.0 += f64::from(day.commit_count);
        month.1 += 1;
    }

    Seasonality {
        by_weekday: week_start
            .ordered_days()
            .into_iter()
            .filter_map(|weekday| {
                let (total, samples) = weekdays.get(&weekday).copied()?;
                Some(WeekdayMean {
                    weekday,
                    mean: stats::ratio(total, samples as f64),
                    samples,
                })
            })
            .collect(),
        by_month: months
            .into_iter()
            .map(|(month, (total, samples))| MonthMean {
                month,
                mean: stats::ratio(total, samples as f64),
                samples,
            })
            .collect(),
    }
}
