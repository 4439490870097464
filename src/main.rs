use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tabled::{Table, Tabled};

use liftrs::adherence::AdherenceCalculator;
use liftrs::aggregate::{AggregateOptions, Period, VolumeAggregator};
use liftrs::config::AppConfig;
use liftrs::heatmap::build_heatmap;
use liftrs::import;
use liftrs::logging::{init_logging, LogLevel};
use liftrs::prs::PrDetector;
use liftrs::recovery::RecoveryAdvisor;
use liftrs::trend::{classify_overload, duration_points, fit_duration_trend};

/// liftrs - Strength-Training Analytics CLI
///
/// Computes volume trends, personal records, calendar heatmaps, schedule
/// adherence, streaks, and muscle-recovery advisories from a workout log.
#[derive(Parser)]
#[command(name = "liftrs")]
#[command(version = "0.1.0")]
#[command(about = "Strength-training analytics", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily volume and set rollups over a period
    Volume {
        /// Workout log file (JSON or CSV)
        #[arg(short, long)]
        log: PathBuf,

        /// Period start (YYYY-MM-DD), default end minus the configured window
        #[arg(long)]
        from: Option<String>,

        /// Period end, exclusive (YYYY-MM-DD), default today
        #[arg(long)]
        to: Option<String>,

        /// Count incomplete sets toward set totals
        #[arg(long)]
        include_incomplete: bool,
    },

    /// Calendar heatmap of training volume
    Heatmap {
        #[arg(short, long)]
        log: PathBuf,

        /// Grid start (YYYY-MM-DD), default today minus the configured window
        #[arg(long)]
        from: Option<String>,

        /// Grid end, inclusive (YYYY-MM-DD), default today
        #[arg(long)]
        to: Option<String>,
    },

    /// Duration trend and weekly progressive-overload status
    Trend {
        #[arg(short, long)]
        log: PathBuf,
    },

    /// Personal records detected across the full log
    Prs {
        #[arg(short, long)]
        log: PathBuf,
    },

    /// Schedule adherence, streaks, and achievements
    Adherence {
        /// Schedule file (JSON array of weeks)
        #[arg(short, long)]
        schedule: PathBuf,

        /// Weeks shown in the trend series
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Muscle recovery status and schedule advisories
    Recovery {
        #[arg(short, long)]
        log: PathBuf,

        /// Schedule file; enables week analysis and rest-day suggestion
        #[arg(short, long)]
        schedule: Option<PathBuf>,
    },
}

#[derive(Tabled)]
struct VolumeRow {
    #[tabled(rename = "Date")]
    date: NaiveDate,
    #[tabled(rename = "Volume (kg)")]
    volume: Decimal,
    #[tabled(rename = "Sets")]
    sets: u32,
}

#[derive(Tabled)]
struct PrRow {
    #[tabled(rename = "Exercise")]
    exercise: String,
    #[tabled(rename = "Record")]
    kind: String,
    #[tabled(rename = "Value")]
    value: Decimal,
    #[tabled(rename = "Previous")]
    previous: Decimal,
    #[tabled(rename = "Change %")]
    pct: Decimal,
    #[tabled(rename = "Date")]
    date: NaiveDate,
}

#[derive(Tabled)]
struct OverloadRow {
    #[tabled(rename = "Week")]
    week: String,
    #[tabled(rename = "Volume (kg)")]
    volume: Decimal,
    #[tabled(rename = "Change %")]
    pct: Decimal,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct RecoveryRow {
    #[tabled(rename = "Muscle")]
    muscle: String,
    #[tabled(rename = "Hours since")]
    hours: i64,
    #[tabled(rename = "Status")]
    status: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(AppConfig::default_path)
        .context("Could not determine config path")?;
    let mut config = AppConfig::load(&config_path)?;

    config.logging.level = match cli.verbose {
        0 => config.logging.level,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Volume {
            log,
            from,
            to,
            include_incomplete,
        } => {
            let records = import::import_workouts(&log)?;
            let period = resolve_period(&from, &to, config.analysis.default_period_days)?;
            let aggregator = VolumeAggregator::with_options(AggregateOptions {
                include_incomplete: include_incomplete
                    || config.analysis.include_incomplete_sets,
            });
            let rollup = aggregator.aggregate(&records, &period);

            println!(
                "{}",
                format!("Training volume {} to {}", period.start, period.end)
                    .green()
                    .bold()
            );
            let rows: Vec<VolumeRow> = rollup
                .daily_volume
                .iter()
                .map(|(date, volume)| VolumeRow {
                    date: *date,
                    volume: volume.round_dp(1),
                    sets: rollup.daily_sets.get(date).copied().unwrap_or(0),
                })
                .collect();
            println!("{}", Table::new(rows));

            println!("{}", "Per-exercise volume".green().bold());
            for (exercise, volume) in &rollup.per_exercise_volume {
                println!("  {:<24} {}", exercise, volume.round_dp(1));
            }
        }

        Commands::Heatmap { log, from, to } => {
            let records = import::import_workouts(&log)?;
            // the heatmap grid is inclusive of its end date
            let end = match &to {
                Some(raw) => parse_date(raw)?,
                None => Utc::now().date_naive(),
            };
            let start = match &from {
                Some(raw) => parse_date(raw)?,
                None => end - Duration::days(config.analysis.default_period_days as i64 - 1),
            };
            if start > end {
                anyhow::bail!("grid start {} must not be after end {}", start, end);
            }
            let grid = Period::new(start, end);
            let rollup = VolumeAggregator::new()
                .aggregate(&records, &Period::new(start, end + Duration::days(1)));
            let cells = build_heatmap(&rollup.daily_volume, &grid);

            println!("{}", "Volume heatmap".cyan().bold());
            const SHADES: [&str; 5] = [" ", "░", "▒", "▓", "█"];
            for chunk in cells.chunks(7) {
                let line: String = chunk
                    .iter()
                    .map(|c| SHADES[c.level.min(4) as usize])
                    .collect();
                let label = chunk.first().map(|c| c.date.to_string()).unwrap_or_default();
                println!("  {}  {}", label.dimmed(), line);
            }
        }

        Commands::Trend { log } => {
            let records = import::import_workouts(&log)?;

            let points = duration_points(&records);
            let line = fit_duration_trend(&points);
            println!("{}", "Duration trend".blue().bold());
            println!(
                "  {} min/day over {} sessions (intercept {} min)",
                line.slope.round_dp(2),
                points.len(),
                line.intercept.round_dp(1)
            );

            let weekly: Vec<(String, Decimal)> = VolumeAggregator::new()
                .weekly_volume(&records)
                .into_iter()
                .collect();
            let changes = classify_overload(&weekly);
            println!("{}", "Progressive overload".blue().bold());
            let rows: Vec<OverloadRow> = changes
                .iter()
                .map(|c| OverloadRow {
                    week: c.week_id.clone(),
                    volume: c.volume.round_dp(0),
                    pct: c.pct_change.round_dp(1),
                    status: c.status.to_string(),
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        Commands::Prs { log } => {
            let records = import::import_workouts(&log)?;
            let prs = PrDetector::detect_prs(&records)?;

            println!(
                "{}",
                format!("{} personal records", prs.len()).magenta().bold()
            );
            let rows: Vec<PrRow> = prs
                .iter()
                .map(|pr| PrRow {
                    exercise: pr.exercise_name.clone(),
                    kind: pr.kind.to_string(),
                    value: pr.value.round_dp(1),
                    previous: pr.previous.round_dp(1),
                    pct: pr.pct_change.round_dp(1),
                    date: pr.achieved_at.date_naive(),
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        Commands::Adherence { schedule, window } => {
            let weeks = import::json::read_schedule(&schedule)?;
            let calculator = AdherenceCalculator::with_window(
                window.unwrap_or(config.analysis.adherence_window_weeks),
            );
            let summary = calculator.compute(&weeks)?;

            println!("{}", "Schedule adherence".yellow().bold());
            println!("  Completion: {}%", summary.percentage.round_dp(1));
            println!("  Current streak: {} days", summary.current_streak);
            println!("  Best streak: {} days", summary.best_streak);
            for week in &summary.weekly_series {
                println!("  {:<10} {}%", week.week_id, week.percentage.round_dp(0));
            }
            if !summary.achievements.is_empty() {
                println!("{}", "Achievements".yellow().bold());
                for achievement in &summary.achievements {
                    println!("  {:?}", achievement);
                }
            }
        }

        Commands::Recovery { log, schedule } => {
            let records = import::import_workouts(&log)?;
            let advisor = RecoveryAdvisor::with_table(config.recovery.table());
            let now = Utc::now().fixed_offset();

            let last_trained = VolumeAggregator::new().last_trained(&records);
            let statuses = advisor.status_all(&last_trained, now);

            println!("{}", "Muscle recovery".red().bold());
            let rows: Vec<RecoveryRow> = statuses
                .iter()
                .map(|s| RecoveryRow {
                    muscle: s.muscle.to_string(),
                    hours: s.hours_since,
                    status: s.tier.to_string(),
                })
                .collect();
            println!("{}", Table::new(rows));

            if let Some(schedule) = schedule {
                let weeks = import::json::read_schedule(&schedule)?;
                for week in &weeks {
                    let warnings = advisor.analyze_week(week)?;
                    if !warnings.is_empty() {
                        println!("{}", format!("Warnings for {}", week.id).red().bold());
                        for warning in &warnings {
                            println!("  {}", warning);
                        }
                    }
                    if let Some(suggestion) = advisor.suggest_rest_day(week)? {
                        println!(
                            "  Suggested rest day for {}: {} (longest run becomes {})",
                            week.id, suggestion.weekday, suggestion.resulting_longest_run
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

/// Resolve an optional from/to pair into a period, defaulting to the last
/// `default_days` days ending today
fn resolve_period(
    from: &Option<String>,
    to: &Option<String>,
    default_days: u32,
) -> Result<Period> {
    let today = Utc::now().date_naive();
    let end = match to {
        Some(raw) => parse_date(raw)?,
        None => today,
    };
    let start = match from {
        Some(raw) => parse_date(raw)?,
        None => end - Duration::days(default_days as i64),
    };
    if start >= end {
        anyhow::bail!("period start {} must be before end {}", start, end);
    }
    Ok(Period::new(start, end))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))
}
