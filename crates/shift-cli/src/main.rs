//! `shift` CLI: query and edit worker availability configuration.
//!
//! ## Usage
//!
//! ```sh
//! # Start an empty configuration file
//! shift -c salon.json init
//!
//! # Facility default for Mondays, with a lunch break
//! shift -c salon.json set-template --owner 0 --weekday 1 --open 10:30-20:00 --break 12:00-13:00
//!
//! # Worker 7 is off on Christmas
//! shift -c salon.json set-exception --owner 7 --date 2026-12-25 --kind closed
//!
//! # Is worker 7 working this slot?
//! shift -c salon.json check --worker 7 --start 2026-10-19T18:30 --end 2026-10-19T19:30
//!
//! # Effective schedule of a day
//! shift -c salon.json day --worker 7 --date 2026-10-19
//! ```
//!
//! Logs go to stderr; `-v` or `RUST_LOG=debug` shows configuration writes and
//! resolver decisions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use shift_engine::{
    parse_date, weekday_from_iso, DaySchedule, ExceptionKind, MidnightPolicy, OpenDayBreak, Owner,
    Resolver, ScheduleConfig, WorkingWindow,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shift",
    version,
    about = "Worker availability from weekly templates and date exceptions"
)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true, default_value = "shift.json")]
    config: PathBuf,

    /// Log configuration writes and resolver decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Is a worker working for the whole of an interval?
    Check {
        /// Worker id (0 asks about the facility itself)
        #[arg(short, long)]
        worker: u64,
        /// Interval start, local time (e.g. 2026-10-19T18:30)
        #[arg(short, long)]
        start: String,
        /// Interval end, local time
        #[arg(short, long)]
        end: String,
        /// Override the stored break policy for exception-opened days
        #[arg(long)]
        open_day_break: Option<BreakArg>,
        /// Override the stored policy for intervals crossing midnight
        #[arg(long)]
        midnight: Option<MidnightArg>,
    },
    /// Show the effective schedule of a worker on a date
    Day {
        #[arg(short, long)]
        worker: u64,
        /// Calendar date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },
    /// Set the open and break windows of one weekday
    SetTemplate {
        /// Owner id (0 = facility default)
        #[arg(short, long)]
        owner: u64,
        /// ISO weekday, Monday = 1 through Sunday = 7
        #[arg(long)]
        weekday: u8,
        /// Open window, HH:MM-HH:MM
        #[arg(long, required_unless_present = "closed")]
        open: Option<String>,
        /// Break window, HH:MM-HH:MM (no break if omitted)
        #[arg(long = "break")]
        break_window: Option<String>,
        /// Mark the day as not worked (the open hours are kept for exception days)
        #[arg(long)]
        closed: bool,
    },
    /// Remove a weekday template so the owner falls back to the facility default
    ClearTemplate {
        #[arg(short, long)]
        owner: u64,
        #[arg(long)]
        weekday: u8,
    },
    /// Force a date closed or open
    SetException {
        #[arg(short, long)]
        owner: u64,
        #[arg(short, long)]
        date: String,
        #[arg(short, long, value_enum, ignore_case = true)]
        kind: KindArg,
    },
    /// Remove a date exception
    ClearException {
        #[arg(short, long)]
        owner: u64,
        #[arg(short, long)]
        date: String,
    },
    /// Report stored windows that end before they start
    Validate,
    /// Write an empty configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BreakArg {
    Keep,
    Suppress,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    /// Not working, whatever the template says
    Closed,
    /// Working with the weekday's template hours
    Open,
}

#[derive(Clone, Copy, ValueEnum)]
enum MidnightArg {
    Reject,
    Split,
}

impl From<BreakArg> for OpenDayBreak {
    fn from(arg: BreakArg) -> Self {
        match arg {
            BreakArg::Keep => OpenDayBreak::KeepBreak,
            BreakArg::Suppress => OpenDayBreak::SuppressBreak,
        }
    }
}

impl From<KindArg> for ExceptionKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Closed => ExceptionKind::Closed,
            KindArg::Open => ExceptionKind::Open,
        }
    }
}

impl From<MidnightArg> for MidnightPolicy {
    fn from(arg: MidnightArg) -> Self {
        match arg {
            MidnightArg::Reject => MidnightPolicy::Reject,
            MidnightArg::Split => MidnightPolicy::SplitPerDay,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let path = cli.config.as_path();

    match cli.command {
        Commands::Check {
            worker,
            start,
            end,
            open_day_break,
            midnight,
        } => {
            let config = load(path)?;
            let start = parse_instant(&start)?;
            let end = parse_instant(&end)?;

            let mut policy = config.policy;
            if let Some(arg) = open_day_break {
                policy.open_day_break = arg.into();
            }
            if let Some(arg) = midnight {
                policy.midnight = arg.into();
            }

            let working = Resolver::new(&config)
                .with_policy(policy)
                .is_working(start, end, Owner::from_id(worker));
            println!("{}", if working { "working" } else { "not working" });
        }
        Commands::Day { worker, date } => {
            let config = load(path)?;
            let date = parse_date(&date)?;
            let owner = Owner::from_id(worker);
            let schedule = Resolver::new(&config).resolve_day(owner, date);
            println!(
                "{} {} {}: {}",
                date,
                date.weekday(),
                owner,
                describe_day(&schedule)
            );
        }
        Commands::SetTemplate {
            owner,
            weekday,
            open,
            break_window,
            closed,
        } => {
            let mut config = load_or_default(path)?;
            let weekday = weekday_from_iso(weekday)?;
            let owner = Owner::from_id(owner);

            let mut open = match open {
                Some(s) => WorkingWindow::parse(&s).context("Invalid --open window")?,
                None => WorkingWindow::inactive(),
            };
            if closed {
                open = open.deactivated();
            }
            let break_window = match break_window {
                Some(s) => WorkingWindow::parse(&s).context("Invalid --break window")?,
                None => WorkingWindow::inactive(),
            };

            config
                .set_template(owner, weekday, open, break_window)
                .context("Failed to set template")?;
            save(&config, path)?;
            println!("template set: {owner} {weekday} open {open}, break {break_window}");
        }
        Commands::ClearTemplate { owner, weekday } => {
            let mut config = load(path)?;
            let weekday = weekday_from_iso(weekday)?;
            let owner = Owner::from_id(owner);
            if config.clear_template(owner, weekday) {
                save(&config, path)?;
                println!("template cleared: {owner} {weekday}");
            } else {
                println!("no template for {owner} {weekday}");
            }
        }
        Commands::SetException { owner, date, kind } => {
            let mut config = load_or_default(path)?;
            let owner = Owner::from_id(owner);
            let date = parse_date(&date)?;
            let kind = ExceptionKind::from(kind);
            config.set_exception(owner, kind, date);
            save(&config, path)?;
            println!("exception set: {owner} {date} {kind}");
        }
        Commands::ClearException { owner, date } => {
            let mut config = load(path)?;
            let owner = Owner::from_id(owner);
            let date = parse_date(&date)?;
            match config.clear_exception(owner, date) {
                Some(kind) => {
                    save(&config, path)?;
                    println!("exception cleared: {owner} {date} {kind}");
                }
                None => println!("no exception for {owner} {date}"),
            }
        }
        Commands::Validate => {
            let config = load(path)?;
            let issues = config.validate();
            if issues.is_empty() {
                println!("configuration ok");
            } else {
                for issue in &issues {
                    println!("{issue}");
                }
                anyhow::bail!("{} corrupt window(s) in {}", issues.len(), path.display());
            }
        }
        Commands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            save(&ScheduleConfig::new(), path)?;
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Accepts `YYYY-MM-DDTHH:MM[:SS]` or the same with a space separator.
fn parse_instant(s: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    let trimmed = s.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .with_context(|| format!("Invalid local datetime: '{}' (expected YYYY-MM-DDTHH:MM)", s))
}

fn describe_day(schedule: &DaySchedule) -> String {
    match schedule {
        DaySchedule::Closed => "closed".to_string(),
        DaySchedule::Open {
            open,
            break_window,
            forced,
        } => {
            let hours = format!("open {}-{}", open.start, open.end);
            let brk = format!("break {break_window}");
            if *forced {
                format!("{hours}, {brk} (exception)")
            } else {
                format!("{hours}, {brk}")
            }
        }
    }
}

fn load(path: &Path) -> Result<ScheduleConfig> {
    ScheduleConfig::load(path)
        .with_context(|| format!("Failed to load configuration: {}", path.display()))
}

fn load_or_default(path: &Path) -> Result<ScheduleConfig> {
    if path.exists() {
        load(path)
    } else {
        info!(path = %path.display(), "configuration file missing, starting empty");
        Ok(ScheduleConfig::new())
    }
}

fn save(config: &ScheduleConfig, path: &Path) -> Result<()> {
    config
        .save(path)
        .with_context(|| format!("Failed to write configuration: {}", path.display()))
}
