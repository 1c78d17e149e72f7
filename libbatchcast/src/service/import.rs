//! Bulk import of draft posts from CSV and JSON files
//!
//! CSV input needs a header row. Columns are located by case-insensitive
//! name, accepting a few synonyms:
//!
//! | field     | accepted headers            |
//! |-----------|-----------------------------|
//! | content   | content, text, post         |
//! | platforms | platforms, platform         |
//! | date      | date, scheduled_date        |
//! | time      | time, scheduled_time        |
//!
//! Rows are split on commas that sit outside double quotes, each field is
//! trimmed and one layer of surrounding quotes is removed. Import never
//! blocks on bad data: a row with no recognised platform still becomes a
//! draft, and validation reports the problem afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ImportError;
use crate::scheduling::parse_date;
use crate::types::{dedup_platforms, DraftPost, Platform, RawRow};

const CONTENT_HEADERS: [&str; 3] = ["content", "text", "post"];
const PLATFORM_HEADERS: [&str; 2] = ["platforms", "platform"];
const DATE_HEADERS: [&str; 2] = ["date", "scheduled_date"];
const TIME_HEADERS: [&str; 2] = ["time", "scheduled_time"];

/// Example file offered to users as a starting point
pub const CSV_TEMPLATE: &str = "content,platforms,date,time
\"Excited to share our latest product update! #launch\",\"instagram,facebook\",2024-12-20,09:00
\"Behind the scenes with the team this week\",\"linkedin,twitter\",2024-12-21,14:30
";

/// Supported import file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Pick a format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "txt" => Ok(FileFormat::Csv),
            "json" => Ok(FileFormat::Json),
            "" => Err(ImportError::UnsupportedFileType("no extension".to_string())),
            other => Err(ImportError::UnsupportedFileType(format!(".{}", other))),
        }
    }
}

/// Outcome of importing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub file: String,
    pub success: bool,
    pub message: String,
    pub draft_ids: Vec<String>,
}

impl ImportReport {
    pub fn succeeded(file: impl Into<String>, draft_ids: Vec<String>) -> Self {
        let count = draft_ids.len();
        Self {
            file: file.into(),
            success: true,
            message: format!(
                "Imported {} post{}",
                count,
                if count == 1 { "" } else { "s" }
            ),
            draft_ids,
        }
    }

    pub fn failed(file: impl Into<String>, error: &ImportError) -> Self {
        Self {
            file: file.into(),
            success: false,
            message: error.to_string(),
            draft_ids: Vec::new(),
        }
    }
}

/// Parse CSV text into raw rows
///
/// Returns an empty list when there is no header plus at least one data
/// line. `default_platform` fills the platforms field when the column is
/// missing or the cell is blank.
pub fn parse_csv(text: &str, default_platform: Platform) -> Vec<RawRow> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Vec::new();
    }

    let header: Vec<String> = split_csv_line(lines[0])
        .into_iter()
        .map(|h| h.to_lowercase())
        .collect();
    let content_idx = find_column(&header, &CONTENT_HEADERS);
    let platform_idx = find_column(&header, &PLATFORM_HEADERS);
    let date_idx = find_column(&header, &DATE_HEADERS);
    let time_idx = find_column(&header, &TIME_HEADERS);

    debug!(
        ?content_idx,
        ?platform_idx,
        ?date_idx,
        ?time_idx,
        rows = lines.len() - 1,
        "parsed CSV header"
    );

    lines[1..]
        .iter()
        .map(|line| {
            let fields = split_csv_line(line);
            let field = |idx: Option<usize>| {
                idx.and_then(|i| fields.get(i))
                    .cloned()
                    .unwrap_or_default()
            };

            let platforms = field(platform_idx);
            RawRow {
                content: field(content_idx),
                platforms: if platforms.is_empty() {
                    default_platform.to_string()
                } else {
                    platforms
                },
                date: field(date_idx),
                time: field(time_idx),
            }
        })
        .collect()
}

/// Parse a JSON array of raw rows
///
/// Rows with a missing or blank `platforms` value get `default_platform`,
/// the same as CSV rows.
pub fn parse_json(text: &str, default_platform: Platform) -> Result<Vec<RawRow>, ImportError> {
    let mut rows: Vec<RawRow> =
        serde_json::from_str(text).map_err(|e| ImportError::Processing(e.to_string()))?;
    for row in &mut rows {
        if row.platforms.trim().is_empty() {
            row.platforms = default_platform.to_string();
        }
    }
    Ok(rows)
}

/// Turn raw rows into fresh drafts
///
/// Unknown platform tags are dropped; an unparseable date is left unset.
pub fn import_rows(rows: Vec<RawRow>) -> Vec<DraftPost> {
    rows.into_iter()
        .map(|row| {
            let platforms = row
                .platforms
                .split(',')
                .filter_map(Platform::from_tag)
                .collect();

            let mut draft = DraftPost::new(row.content, dedup_platforms(platforms), Vec::new());
            draft.scheduled_date = parse_date(&row.date);
            draft.scheduled_time = Some(row.time).filter(|t| !t.is_empty());
            draft
        })
        .collect()
}

/// Read and parse one file into raw rows
pub async fn read_rows(path: &Path, default_platform: Platform) -> Result<Vec<RawRow>, ImportError> {
    let format = FileFormat::from_path(path)?;

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ImportError::Processing(e.to_string()))?;

    let rows = match format {
        FileFormat::Csv => parse_csv(&text, default_platform),
        FileFormat::Json => parse_json(&text, default_platform)?,
    };

    if rows.is_empty() {
        return Err(ImportError::NoValidData);
    }
    Ok(rows)
}

/// Write drafts back out in the template's column layout
pub fn export_csv(drafts: &[DraftPost]) -> String {
    let mut out = String::from("content,platforms,date,time\n");
    for draft in drafts {
        let platforms = draft
            .platforms
            .iter()
            .map(Platform::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let date = draft
            .scheduled_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let time = draft.scheduled_time.clone().unwrap_or_default();

        out.push_str(&format!(
            "{},{},{},{}\n",
            quote_field(&draft.content),
            quote_field(&platforms),
            quote_field(&date),
            quote_field(&time)
        ));
    }
    out
}

fn find_column(header: &[String], names: &[&str]) -> Option<usize> {
    header.iter().position(|h| names.contains(&h.as_str()))
}

/// Split on commas outside double quotes, then clean each field
///
/// A quote only opens a quoted section at the start of a field; anywhere
/// else it is a literal character.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                current.push(c);
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                in_quotes = true;
                current.push(c);
            }
            ',' if !in_quotes => {
                fields.push(clean_field(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(clean_field(&current));
    fields
}

fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        return trimmed[1..trimmed.len() - 1].replace("\"\"", "\"");
    }
    let unlead = trimmed.strip_prefix('"').unwrap_or(trimmed);
    unlead.strip_suffix('"').unwrap_or(unlead).to_string()
}

fn quote_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains(char::is_whitespace) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
