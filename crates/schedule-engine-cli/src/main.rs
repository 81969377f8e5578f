//! `schedule2cal` CLI: turn pasted course-schedule text into calendar events.
//!
//! ## Usage
//!
//! ```sh
//! # Parse schedule text (stdin → stdout) into event JSON
//! pbpaste | schedule2cal parse
//!
//! # Parse from file to file, pinning "now" for reproducible output
//! schedule2cal parse -i schedule.txt -o events.json --now 2025-09-24T18:00:00Z
//!
//! # Human-readable preview
//! schedule2cal parse -i schedule.txt --format text
//!
//! # Check events JSON before submitting it to a calendar
//! schedule2cal validate -i events.json
//! ```
//!
//! Configuration comes from `schedule2cal.toml` (or `--config`) and
//! `SCHEDULE2CAL_*` environment variables. Logs go to stderr.

mod settings;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use schedule_engine::{
    describe_datetime, describe_recurrence, expand_occurrences, is_ongoing, is_ongoing_json,
    parse_untrusted, validate_structure, CalendarEvent, Clock, FixedClock, ResolvedInstant,
    SystemClock,
};
use serde_json::Value;
use std::fmt::Write as _;
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "schedule2cal",
    version,
    about = "Convert course-schedule text into calendar events"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse schedule text into calendar events
    Parse {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Treat this RFC 3339 instant as "now" instead of the system clock
        #[arg(long)]
        now: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Configuration file (defaults to ./schedule2cal.toml if present)
        #[arg(long)]
        config: Option<String>,
    },
    /// Check events JSON for required fields and report which are still ongoing
    Validate {
        /// Input file with a JSON array of events (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Treat this RFC 3339 instant as "now" instead of the system clock
        #[arg(long)]
        now: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    settings::init_tracing(cli.log_json, &cli.log_level);

    match cli.command {
        Commands::Parse {
            input,
            output,
            now,
            format,
            config,
        } => {
            let config = settings::load_config(config.as_deref())?;
            let clock = build_clock(now.as_deref())?;
            let text = read_input(input.as_deref())?;

            let events =
                parse_untrusted(&text, &config, clock.as_ref()).context("Failed to parse schedule")?;

            let rendered = match format {
                OutputFormat::Json => {
                    let mut json = serde_json::to_string_pretty(&events)?;
                    json.push('\n');
                    json
                }
                OutputFormat::Text => render_preview(&events, clock.now())?,
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Validate { input, now } => {
            let clock = build_clock(now.as_deref())?;
            let json = read_input(input.as_deref())?;
            let value: Value = serde_json::from_str(&json).context("Input is not valid JSON")?;
            let events = match value {
                Value::Array(events) => events,
                single => vec![single],
            };

            let mut failures = 0;
            for (index, event) in events.iter().enumerate() {
                let summary = event["summary"].as_str().unwrap_or("<no summary>");
                match validate_structure(event) {
                    Ok(()) => {
                        let state = if is_ongoing_json(event, clock.now()) {
                            "ongoing"
                        } else {
                            "ended"
                        };
                        println!("ok       #{} {} ({})", index + 1, summary, state);
                    }
                    Err(e) => {
                        failures += 1;
                        println!("invalid  #{} {}: {}", index + 1, summary, e);
                    }
                }
            }

            if failures > 0 {
                anyhow::bail!("{} of {} events failed validation", failures, events.len());
            }
        }
    }

    Ok(())
}

fn build_clock(now: Option<&str>) -> Result<Box<dyn Clock>> {
    match now {
        Some(raw) => {
            let now = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("--now '{}' is not an RFC 3339 datetime", raw))?;
            Ok(Box::new(FixedClock(now.with_timezone(&Utc))))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

/// Plain-text preview, one paragraph per event.
fn render_preview(events: &[CalendarEvent], now: DateTime<Utc>) -> Result<String> {
    let mut out = String::new();
    if events.is_empty() {
        out.push_str("No courses found.\n");
        return Ok(out);
    }

    for event in events {
        writeln!(out, "{}", event.summary)?;
        if !event.location.is_empty() {
            writeln!(out, "  Location: {}", event.location)?;
        }
        writeln!(
            out,
            "  Starts:   {}",
            describe_datetime(&event.start.date_time.to_rfc3339())
        )?;
        writeln!(
            out,
            "  Ends:     {}",
            describe_datetime(&event.end.date_time.to_rfc3339())
        )?;
        if let Some(rule) = &event.recurrence {
            let tz: Tz = event
                .start
                .time_zone
                .parse()
                .map_err(|e| anyhow!("Unknown time zone '{}': {}", event.start.time_zone, e))?;
            let first = ResolvedInstant::new(event.start.date_time.with_timezone(&tz));
            let sessions = expand_occurrences(rule, first, event.end.date_time - event.start.date_time)
                .context("Failed to expand recurrence")?
                .len();
            writeln!(
                out,
                "  Repeats:  {} ({} sessions)",
                describe_recurrence(event.recurrence_lines().as_slice()),
                sessions
            )?;
        }
        if !is_ongoing(event, now) {
            writeln!(out, "  (already ended)")?;
        }
        out.push('\n');
    }
    Ok(out)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
