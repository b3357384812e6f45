//! `event-engine` command line: extract an event or a bare date from
//! colloquial Russian text and print the result as JSON.

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use event_engine::{handle_date, handle_event, Config, Extractor, ParseRequest, RussianRecognizer};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Extract events and dates from colloquial Russian text
#[derive(Parser, Debug)]
#[command(name = "event-engine")]
#[command(version, about, long_about = None)]
struct Args {
    /// Reference time for relative words, as RFC 3339 (defaults to now)
    #[arg(long, global = true)]
    now: Option<String>,

    /// Timezone for requests that do not name one (overrides EVENT_ENGINE_DEFAULT_TZ)
    #[arg(long, global = true)]
    default_timezone: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract an event name with its start and optional end
    Event {
        /// Text to parse, or "-" to read stdin
        text: String,
        /// IANA timezone of the text
        #[arg(short, long)]
        timezone: Option<String>,
    },
    /// Extract a single date and time
    Date {
        /// Text to parse, or "-" to read stdin
        text: String,
        /// IANA timezone of the text
        #[arg(short, long)]
        timezone: Option<String>,
    },
}

/// Exit code for a request rejected at the boundary.
const EXIT_INVALID_REQUEST: u8 = 2;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(name) = &args.default_timezone {
        config.apply_default_timezone(name);
    }

    let recognizer = match &args.now {
        Some(now) => RussianRecognizer::new(parse_now(now)?),
        None => RussianRecognizer::now(),
    };
    debug!(anchor = %recognizer.anchor(), "recognizer ready");
    let extractor = Extractor::new(recognizer);

    let outcome = match &args.command {
        Command::Event { text, timezone } => {
            let request = ParseRequest::new(read_text(text)?, timezone.clone());
            handle_event(&extractor, &config, &request).map(|reply| render(&reply, args.pretty))
        }
        Command::Date { text, timezone } => {
            let request = ParseRequest::new(read_text(text)?, timezone.clone());
            handle_date(&extractor, &config, &request).map(|reply| render(&reply, args.pretty))
        }
    };

    match outcome {
        Ok(json) => {
            println!("{}", json?);
            Ok(ExitCode::SUCCESS)
        }
        Err(rejected) => {
            println!("{}", render(&rejected, args.pretty)?);
            Ok(ExitCode::from(EXIT_INVALID_REQUEST))
        }
    }
}

fn parse_now(value: &str) -> Result<DateTime<Utc>> {
    let now = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("--now expects an RFC 3339 timestamp, got '{value}'"))?;
    Ok(now.with_timezone(&Utc))
}

fn read_text(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("failed to read text from stdin")?;
    Ok(text)
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
