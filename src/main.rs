use std::io::IsTerminal;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};

use cadence_core::{CadenceConfig, OutputFormat, Severity, WeekStart};
use cadence_pulse::commits::CommitRecord;
use cadence_pulse::provider::{parse_commit_log, HistoryProvider, HistoryQuery, JsonHistoryProvider};
use cadence_pulse::{analyze, AnalysisOptions, AnalyticsResult};

#[derive(Parser)]
#[command(
    name = "cadence",
    version,
    about = "Team analytics from commit history",
    long_about = "Cadence turns a repository's commit history into team analytics:\n\
                   contributor metrics, a project health score, detected risks,\n\
                   narrative insights, and activity trends with forecasts.\n\n\
                   Examples:\n  \
                     cadence analyze --repo acme/api --log history.json\n  \
                     cadence analyze --repo acme/api --since 2024-01-01 --format json < history.json\n  \
                     cadence trends --repo acme/api --log history.json\n  \
                     cadence init                          Create a .cadence.toml config file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .cadence.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tables and summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

/// Options shared by every command that reads a commit log.
#[derive(clap::Args)]
struct HistoryArgs {
    /// Repository identity used for reporting and config lookup
    #[arg(long)]
    repo: String,

    /// JSON commit log (default: read stdin)
    #[arg(long)]
    log: Option<PathBuf>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    since: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    until: Option<NaiveDate>,

    /// Override the configured first day of the week (sunday or monday)
    #[arg(long)]
    week_start: Option<WeekStart>,

    /// Anchor time for recent-activity trends (RFC 3339, default: now)
    #[arg(long, hide = true)]
    now: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze contributors, project health, issues, and trends
    #[command(long_about = "Analyze contributors, project health, issues, and trends.\n\n\
        Reads a JSON array of commit records, folds author aliases and exclusions\n\
        from the repository's [projects] section, and reports per-contributor metrics,\n\
        a 0-100 health score with every adjustment listed, detected risks, insights,\n\
        and the activity trend.\n\n\
        Examples:\n  cadence analyze --repo acme/api --log history.json\n  cadence analyze --repo acme/api --author Alice --format markdown\n  cadence analyze --repo acme/api --log history.json --fail-on high")]
    Analyze {
        #[command(flatten)]
        history: HistoryArgs,

        /// Only analyze this contributor (canonical name, aliases included)
        #[arg(long)]
        author: Option<String>,

        /// Exit with non-zero code if an issue meets this severity
        #[arg(
            long,
            long_help = "Exit with non-zero code if an issue of this severity or higher is detected.\n\n\
                Severity ranking: critical > high > medium > low.\n\
                Useful in CI pipelines to flag unhealthy projects."
        )]
        fail_on: Option<Severity>,
    },
    /// Show the daily activity trend, anomalies, forecast, and seasonality
    #[command(long_about = "Show the daily activity trend, anomalies, forecast, and seasonality.\n\n\
        Fits a least-squares line to the gap-filled daily commit counts, flags days\n\
        more than two standard deviations off the line, and extrapolates a week ahead.\n\n\
        Examples:\n  cadence trends --repo acme/api --log history.json\n  cadence trends --repo acme/api --since 2024-01-01 --format json")]
    Trends {
        #[command(flatten)]
        history: HistoryArgs,
    },
    /// Create a default .cadence.toml configuration file
    #[command(long_about = "Create a default .cadence.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .cadence.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1mcadence\x1b[0m v{version} — team analytics from commit history\n");

        println!("Quick start:");
        println!("  \x1b[36mcadence init\x1b[0m                              Create a .cadence.toml config file");
        println!("  \x1b[36mcadence analyze --repo NAME --log FILE\x1b[0m   Analyze a commit log\n");

        println!("All commands:");
        println!("  \x1b[32manalyze\x1b[0m   Contributors, health, issues, insights, trends");
        println!("  \x1b[32mtrends\x1b[0m    Daily activity trend, anomalies, forecast");
        println!("  \x1b[32minit\x1b[0m      Create default configuration\n");
    } else {
        println!("cadence v{version} — team analytics from commit history\n");

        println!("Quick start:");
        println!("  cadence init                              Create a .cadence.toml config file");
        println!("  cadence analyze --repo NAME --log FILE   Analyze a commit log\n");

        println!("All commands:");
        println!("  analyze   Contributors, health, issues, insights, trends");
        println!("  trends    Daily activity trend, anomalies, forecast");
        println!("  init      Create default configuration\n");
    }

    println!("Run 'cadence <command> --help' for details.");
}

fn load_config(path: Option<&Path>) -> Result<CadenceConfig> {
    let config = match path {
        Some(path) => CadenceConfig::from_file(path)?,
        None => {
            let default_path = Path::new(".cadence.toml");
            if default_path.exists() {
                CadenceConfig::from_file(default_path)?
            } else {
                CadenceConfig::default()
            }
        }
    };
    Ok(config)
}

async fn load_commits(history: &HistoryArgs) -> Result<Vec<CommitRecord>> {
    let query = HistoryQuery {
        since: history.since,
        until: history.until,
        author: None,
    };

    match &history.log {
        Some(path) => {
            let provider = JsonHistoryProvider::new(path);
            let commits = tokio::task::spawn_blocking(move || provider.commits(&query))
                .await
                .into_diagnostic()?
                .wrap_err(format!("reading {}", path.display()))?;
            Ok(commits)
        }
        None => {
            let input = tokio::task::spawn_blocking(|| {
                let mut input = String::new();
                std::io::stdin().read_to_string(&mut input).map(|_| input)
            })
            .await
            .into_diagnostic()?
            .into_diagnostic()
            .wrap_err("reading stdin")?;
            let commits = parse_commit_log(&input).wrap_err("parsing commit log from stdin")?;
            Ok(commits.into_iter().filter(|c| query.matches(c)).collect())
        }
    }
}

async fn run_analysis(
    config: &CadenceConfig,
    history: &HistoryArgs,
    author: Option<String>,
) -> Result<AnalyticsResult> {
    let project = config.project_config(&history.repo)?;
    let commits = load_commits(history).await?;
    tracing::debug!(commits = commits.len(), repo = %history.repo, "loaded history");

    let options = AnalysisOptions {
        repository: history.repo.clone(),
        since: history.since,
        until: history.until,
        author,
        week_start: history.week_start.unwrap_or(config.settings.first_day_of_week),
        thresholds: config.thresholds.clone(),
        now: history.now.unwrap_or_else(Utc::now),
    };
    Ok(analyze(&commits, &project, &options)?)
}

const DEFAULT_CONFIG: &str = r#"# Cadence Configuration

[settings]
# First day of the week for weekly buckets and seasonality: "sunday" or "monday"
# first_day_of_week = "sunday"

[thresholds]
# large_commit_lines = 500
# medium_commit_lines = 200
# major_contributor_share = 0.20
# dominant_contributor_share = 0.70
# critical_dominance_share = 0.90
# low_velocity_per_week = 2.0
# critical_velocity_per_week = 1.0
# velocity_stable_band_pct = 10.0
# velocity_major_drop_pct = 50.0
# velocity_growth_bonus_pct = 20.0
# trend_slope_band = 0.1
# anomaly_sigma = 2.0
# forecast_days = 7
# trend_window_days = 30
# improving_ratio = 1.2
# declining_ratio = 0.8
# min_commits_for_trend = 4
# regular_consistency_min = 7.0
# burst_peak_ratio = 3.0
# peak_window_days = 7
# irregular_team_share = 0.5

# Per-repository author grouping and exclusions
# [projects."owner/repo"]
# excluded_users = ["dependabot[bot]"]
#
# [[projects."owner/repo".grouped_authors]]
# primary_name = "Alice Smith"
# aliases = ["alice", "alice@laptop"]
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let cli = Cli::parse();
    cadence_core::logging::init(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    tracing::debug!(format = %cli.format, projects = config.projects.len(), "configuration loaded");

    match cli.command {
        None => {
            print_welcome(use_color);
            return Ok(());
        }
        Some(Command::Analyze {
            ref history,
            ref author,
            fail_on,
        }) => {
            let result = run_analysis(&config, history, author.clone()).await?;

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
                }
                OutputFormat::Markdown => {
                    print!("{}", result.to_markdown());
                }
                OutputFormat::Text => {
                    print!("{result}");
                }
            }

            if let Some(threshold) = fail_on {
                let has_issues = result
                    .issues
                    .iter()
                    .any(|i| i.severity.meets_threshold(threshold));
                if has_issues {
                    std::process::exit(1);
                }
            }
        }
        Some(Command::Trends { ref history }) => {
            let result = run_analysis(&config, history, None).await?;

            match cli.format {
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "repository": result.repository,
                        "daily": result.daily,
                        "trends": result.trends,
                    });
                    println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
                }
                OutputFormat::Markdown => {
                    println!("# Activity: {}\n", result.repository);
                    print!("{}", result.trends.to_markdown());
                }
                OutputFormat::Text => {
                    print!("{}", result.trends);
                }
            }
        }
        Some(Command::Init) => {
            let path = Path::new(".cadence.toml");
            if path.exists() {
                miette::bail!(".cadence.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .cadence.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "cadence", &mut std::io::stdout());
        }
    }

    Ok(())
}
