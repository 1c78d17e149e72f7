//! batch-export - Write the CSV import template or export drafts as CSV
//!
//! The `csv` format reads the JSON produced by `batch-import --format json`
//! and writes it back out in the importer's column layout.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use libbatchcast::logging;
use libbatchcast::service::import::{export_csv, CSV_TEMPLATE};
use libbatchcast::{BatchcastError, DraftPost};
use tracing::info;

#[derive(Parser)]
#[command(name = "batch-export")]
#[command(version)]
#[command(about = "Write the CSV import template or export drafts as CSV", long_about = None)]
struct Cli {
    /// Export format
    #[arg(short, long, value_enum)]
    format: ExportFormat,

    /// JSON draft file for the csv format (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, ValueEnum)]
enum ExportFormat {
    /// Header plus two example rows
    Template,
    /// Drafts as CSV rows
    Csv,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::config_from_env(cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<BatchcastError>()
            .map(BatchcastError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let text = match cli.format {
        ExportFormat::Template => CSV_TEMPLATE.to_string(),
        ExportFormat::Csv => {
            let json = read_input(cli.input.as_ref()).await?;
            let drafts: Vec<DraftPost> =
                serde_json::from_str(&json).map_err(BatchcastError::Serialization)?;
            info!(count = drafts.len(), "exporting drafts");
            export_csv(&drafts)
        }
    };

    match cli.output {
        Some(path) => tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", text),
    }
    Ok(())
}

async fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
