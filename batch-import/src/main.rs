//! batch-import - Import draft posts from CSV and JSON files
//!
//! Reads one or more files into drafts, optionally assigns them dates from
//! a recurring time slot and promotes the valid ones to scheduled.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use libbatchcast::logging;
use libbatchcast::scheduling::format_days;
use libbatchcast::{BatchService, BatchcastError, Config, DraftPost};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "batch-import")]
#[command(version)]
#[command(about = "Import draft posts from CSV and JSON files")]
#[command(long_about = "\
batch-import - Import draft posts from CSV and JSON files

DESCRIPTION:
    batch-import reads each file into draft posts. A failing file is reported
    on stderr and skipped; the remaining files are still imported.

    Supported files:
        .csv, .txt   CSV with a header row (content, platforms, date, time)
        .json        Array of objects with content, platforms, date, time

USAGE EXAMPLES:
    # Import a CSV file and print the drafts
    batch-import posts.csv

    # Spread the drafts over the Morning Boost slot and schedule them
    batch-import posts.csv --slot morning-boost --schedule

    # Machine-readable output
    batch-import posts.csv --format json

    # Show the configured time slots
    batch-import --list-slots

CONFIGURATION:
    Configuration file: ~/.config/batchcast/config.toml

    Override with environment variables:
        BATCHCAST_CONFIG       - Path to config file
        BATCHCAST_LOG_FORMAT   - text, json or pretty
        BATCHCAST_LOG_LEVEL    - Log level (default: warn)

EXIT CODES:
    0 - Every file imported
    1 - One or more files failed to import
    2 - Configuration error
    3 - Invalid input (unknown slot, no files)
")]
struct Cli {
    /// Files to import
    files: Vec<PathBuf>,

    /// Time slot (id or name) used to assign dates to the imported drafts
    #[arg(long)]
    slot: Option<String>,

    /// Promote every ready draft to scheduled
    #[arg(long)]
    schedule: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// List the configured time slots and exit
    #[arg(long)]
    list_slots: bool,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One tab-separated line per draft
    Text,
    /// Pretty-printed JSON array
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::config_from_env(cli.verbose).init();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<BatchcastError>()
                .map(BatchcastError::exit_code)
                .unwrap_or(1);
            std::process::exit(code);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config = Config::load_or_default().context("Failed to load configuration")?;
    let mut service = BatchService::from_config(config)?;

    if cli.list_slots {
        print_slots(&service, cli.format)?;
        return Ok(0);
    }

    if cli.files.is_empty() {
        return Err(BatchcastError::InvalidInput("No input files given".to_string()).into());
    }

    // Resolve the slot up front so a typo fails before anything is imported
    let slot_id = match cli.slot.as_deref() {
        Some(name) => match service.slots().find(name) {
            Some(slot) => Some(slot.id.clone()),
            None => {
                return Err(
                    BatchcastError::InvalidInput(format!("Unknown time slot: {}", name)).into(),
                )
            }
        },
        None => None,
    };

    let reports = service.import_files(&cli.files).await;
    for report in &reports {
        let mark = if report.success { "ok" } else { "failed" };
        eprintln!("{}: {} ({})", report.file, report.message, mark);
    }

    let ids: Vec<String> = reports
        .iter()
        .flat_map(|r| r.draft_ids.iter().cloned())
        .collect();

    if let Some(slot_id) = slot_id {
        let updated = service.apply_slot(&slot_id, &ids)?;
        debug!(slot_id = %slot_id, updated, "slot applied");
    }

    if cli.schedule {
        let scheduled = service.schedule_all_ready();
        info!(count = scheduled.len(), "drafts scheduled");
    }

    let drafts: Vec<&DraftPost> = ids.iter().filter_map(|id| service.store().get(id)).collect();
    print_drafts(&drafts, cli.format)?;

    let failed = reports.iter().filter(|r| !r.success).count();
    Ok(if failed == 0 { 0 } else { 1 })
}

fn print_drafts(drafts: &[&DraftPost], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(drafts)?);
        return Ok(());
    }

    for draft in drafts {
        let platforms = draft
            .platforms
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let when = match (&draft.scheduled_date, &draft.scheduled_time) {
            (Some(date), Some(time)) => format!("{} {}", date, time),
            (Some(date), None) => date.to_string(),
            _ => "-".to_string(),
        };
        println!(
            "{}\t{}\t{}\t{}\t{}",
            draft.id,
            draft.status,
            platforms,
            when,
            preview(&draft.content)
        );
        for error in &draft.errors {
            println!("\t! {}", error);
        }
    }
    Ok(())
}

fn print_slots(service: &BatchService, format: OutputFormat) -> Result<()> {
    let slots = service.slots().slots();
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(slots)?);
        return Ok(());
    }

    for slot in slots {
        let platforms = slot
            .platforms
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "{}\t{}\t{} {}\t{}{}",
            slot.id,
            slot.name,
            format_days(&slot.days),
            slot.time,
            platforms,
            if slot.is_default { "\t(default)" } else { "" }
        );
    }
    Ok(())
}

/// First line of the content, cut to 50 characters
fn preview(content: &str) -> String {
    let first = content.lines().next().unwrap_or("");
    if first.chars().count() > 50 {
        format!("{}...", first.chars().take(47).collect::<String>())
    } else {
        first.to_string()
    }
}
