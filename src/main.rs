//! Prints upcoming or past occurrences of a cron expression.
//!
//! ```text
//! cronline -n 3 --from "2011-08-15 02:02" "*/15 * * * *"
//! ```

use std::fmt::Display;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use clap::Parser;
use cronline::{parser::CronParser, Schedule, DEFAULT_SEARCH_LIMIT};
use tracing_subscriber::EnvFilter;

const REFERENCE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Parser)]
#[command(name = "cronline", version, about = "Print occurrences of a cron expression")]
struct Args {
    /// Five-field cron expression or @macro, e.g. "*/15 9-17 * * mon-fri"
    expression: String,

    /// Number of occurrences to print
    #[arg(short = 'n', long, default_value_t = 5)]
    count: usize,

    /// Walk backward from the reference time
    #[arg(short, long)]
    previous: bool,

    /// Require both day of month and day of week to match
    #[arg(long)]
    strict: bool,

    /// Reference time as "YYYY-MM-DD HH:MM[:SS]", defaults to now
    #[arg(long)]
    from: Option<String>,

    /// Use UTC instead of the local time zone
    #[arg(long)]
    utc: bool,

    /// Maximum search iterations per occurrence
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    search_limit: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let parser = CronParser::builder()
        .dom_and_dow(args.strict)
        .search_limit(args.search_limit)
        .build();
    let from = args.from.as_deref().map(parse_reference).transpose()?;

    if args.utc {
        run(&args, &parser, Utc, from)
    } else {
        run(&args, &parser, Local, from)
    }
}

fn parse_reference(text: &str) -> Result<NaiveDateTime> {
    REFERENCE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text.trim(), format).ok())
        .with_context(|| format!("cannot read reference time '{text}', expected YYYY-MM-DD HH:MM[:SS]"))
}

fn run<Tz>(args: &Args, parser: &CronParser, zone: Tz, from: Option<NaiveDateTime>) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let schedule = Schedule::with_parser(&args.expression, parser, zone.clone())
        .with_context(|| format!("cannot parse '{}'", args.expression))?;

    let from = match from {
        Some(naive) => zone
            .from_local_datetime(&naive)
            .earliest()
            .with_context(|| format!("{naive:?} does not exist in the selected time zone"))?,
        None => Utc::now().with_timezone(&zone),
    };
    tracing::debug!(expression = %schedule.cron(), %from, previous = args.previous, "listing occurrences");

    let occurrences = if args.previous {
        schedule.previous_n(&from, args.count)
    } else {
        schedule.next_n(&from, args.count)
    }
    .with_context(|| format!("no occurrence of '{}' found", schedule.cron()))?;

    for occurrence in occurrences {
        println!("{occurrence}");
    }
    Ok(())
}
