//! Human-readable renderings of analysis results.

use std::fmt;

use crate::pipeline::AnalyticsResult;
use crate::trends::TrendAnalysis;

impl fmt::Display for AnalyticsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Team Analytics: {}", self.repository)?;
        writeln!(f, "{}", "=".repeat(16 + self.repository.len()))?;
        match &self.window {
            Some(w) => writeln!(
                f,
                "Window: {} to {} ({} commits, {} excluded)\n",
                w.start, w.end, self.total_commits, self.excluded_commits
            )?,
            None => writeln!(f, "Window: no commits\n")?,
        }

        let h = &self.health;
        writeln!(f, "Health: {:.0}/100", h.score)?;
        writeln!(
            f,
            "  velocity {:.1}/week ({}, {:+.0}%)  developers {}  bus factor {}  avg commit {:.0} lines",
            h.velocity.current_rate,
            h.velocity.trend,
            h.velocity.change_pct,
            h.collaboration.active_developers,
            h.collaboration.bus_factor,
            h.code_quality.avg_commit_size,
        )?;
        for adj in &h.adjustments {
            writeln!(f, "  {:+4.0}  {}", adj.points, adj.reason)?;
        }

        if !self.contributors.is_empty() {
            writeln!(
                f,
                "\n{:<24} {:>7} {:>8} {:>9} {:>11} {:>10} {:>10}",
                "Contributor", "Commits", "Per wk", "Lines/c", "Consistency", "Pattern", "Trend"
            )?;
            writeln!(f, "{}", "-".repeat(85))?;
            for c in &self.contributors {
                writeln!(
                    f,
                    "{:<24} {:>7} {:>8.1} {:>9.1} {:>11.1} {:>10} {:>10}",
                    truncate(&c.totals.name, 24),
                    c.totals.commit_count,
                    c.commits_per_week,
                    c.lines_per_commit,
                    c.consistency_score,
                    c.activity_pattern,
                    c.trend.last_30_days,
                )?;
            }
        }

        if !self.issues.is_empty() {
            writeln!(f, "\nIssues")?;
            for issue in &self.issues {
                writeln!(f, "  [{}] {}: {}", issue.severity, issue.title, issue.description)?;
                for s in &issue.suggestions {
                    writeln!(f, "      - {s}")?;
                }
            }
        }

        writeln!(f, "\nKey findings")?;
        for line in &self.insights.key_findings {
            writeln!(f, "  - {line}")?;
        }
        writeln!(f, "\nRecommendations")?;
        for line in &self.insights.recommendations {
            writeln!(f, "  - {line}")?;
        }
        if !self.insights.risk_factors.is_empty() {
            writeln!(f, "\nRisk factors")?;
            for line in &self.insights.risk_factors {
                writeln!(f, "  - {line}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.trends)
    }
}

impl AnalyticsResult {
    /// Render the result as a markdown string.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Team Analytics: {}\n\n", self.repository));
        if let Some(w) = &self.window {
            out.push_str(&format!(
                "**Window:** {} to {} · **Commits:** {} · **Excluded:** {}\n\n",
                w.start, w.end, self.total_commits, self.excluded_commits
            ));
        }

        let h = &self.health;
        out.push_str(&format!("## Health: {:.0}/100\n\n", h.score));
        out.push_str("| Velocity | Trend | Developers | Bus factor | Avg commit | Refactor ratio |\n");
        out.push_str("|----------|-------|------------|------------|------------|----------------|\n");
        out.push_str(&format!(
            "| {:.1}/week | {} ({:+.0}%) | {} | {} | {:.0} lines | {:.2} |\n\n",
            h.velocity.current_rate,
            h.velocity.trend,
            h.velocity.change_pct,
            h.collaboration.active_developers,
            h.collaboration.bus_factor,
            h.code_quality.avg_commit_size,
            h.code_quality.refactor_ratio,
        ));
        for adj in &h.adjustments {
            out.push_str(&format!("- `{:+.0}` {}\n", adj.points, adj.reason));
        }
        if !h.adjustments.is_empty() {
            out.push('\n');
        }

        if !self.contributors.is_empty() {
            out.push_str("## Contributors\n\n");
            out.push_str("| Contributor | Commits | Per week | Lines/commit | Consistency | Pattern | Trend |\n");
            out.push_str("|-------------|---------|----------|--------------|-------------|---------|-------|\n");
            for c in &self.contributors {
                out.push_str(&format!(
                    "| {} | {} | {:.1} | {:.1} | {:.1} | {} | {} |\n",
                    c.totals.name,
                    c.totals.commit_count,
                    c.commits_per_week,
                    c.lines_per_commit,
                    c.consistency_score,
                    c.activity_pattern,
                    c.trend.last_30_days,
                ));
            }
            out.push('\n');
        }

        if !self.issues.is_empty() {
            out.push_str("## Issues\n\n");
            for issue in &self.issues {
                out.push_str(&format!(
                    "### {} ({})\n\n{}\n\n*Impact:* {}\n\n",
                    issue.title, issue.severity, issue.description, issue.impact
                ));
                for s in &issue.suggestions {
                    out.push_str(&format!("- {s}\n"));
                }
                out.push('\n');
            }
        }

        for (heading, lines) in [
            ("Key Findings", &self.insights.key_findings),
            ("Recommendations", &self.insights.recommendations),
            ("Risk Factors", &self.insights.risk_factors),
        ] {
            if lines.is_empty() {
                continue;
            }
            out.push_str(&format!("## {heading}\n\n"));
            for line in lines {
                out.push_str(&format!("- {line}\n"));
            }
            out.push('\n');
        }

        out.push_str(&self.trends.to_markdown());
        out
    }
}

impl fmt::Display for TrendAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Activity trend over {} days", self.points)?;
        writeln!(
            f,
            "  {} (slope {:+.3}/day), mean {:.2}/day, volatility {:.2}",
            self.trend, self.slope, self.mean, self.volatility
        )?;
        for a in &self.anomalies {
            writeln!(
                f,
                "  anomaly {}: {} commits, expected {:.1} ({})",
                a.date, a.value, a.predicted, a.kind
            )?;
        }
        if !self.forecast.is_empty() {
            let values: Vec<String> = self.forecast.iter().map(|p| format!("{:.1}", p.value)).collect();
            writeln!(f, "  forecast: {}", values.join(" "))?;
        }
        if let Some(busiest) = self.seasonality.busiest_weekday() {
            writeln!(f, "  busiest weekday: {} ({:.1}/day)", busiest.weekday, busiest.mean)?;
        }
        Ok(())
    }
}

impl TrendAnalysis {
    /// Render the trend analysis as a markdown section.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("## Activity Trend\n\n");
        out.push_str(&format!(
            "**{}** over {} days: slope {:+.3}/day, mean {:.2}/day, volatility {:.2}\n\n",
            self.trend, self.points, self.slope, self.mean, self.volatility
        ));

        if !self.anomalies.is_empty() {
            out.push_str("| Date | Commits | Expected | Kind |\n");
            out.push_str("|------|---------|----------|------|\n");
            for a in &self.anomalies {
                out.push_str(&format!(
                    "| {} | {} | {:.1} | {} |\n",
                    a.date, a.value, a.predicted, a.kind
                ));
            }
            out.push('\n');
        }

        if !self.forecast.is_empty() {
            out.push_str("**Forecast:** ");
            let points: Vec<String> = self
                .forecast
                .iter()
                .map(|p| format!("{} {:.1}", p.date.format("%m-%d"), p.value))
                .collect();
            out.push_str(&points.join(", "));
            out.push_str("\n\n");
        }

        if !self.seasonality.by_weekday.is_empty() {
            out.push_str("| Weekday | Mean commits |\n");
            out.push_str("|---------|--------------|\n");
            for w in &self.seasonality.by_weekday {
                out.push_str(&format!("| {} | {:.2} |\n", w.weekday, w.mean));
            }
            out.push('\n');
        }
        out
    }
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let kept: String = name.chars().take(width.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
