//! Calendar helpers for slot-based scheduling
//!
//! Weekday and time-of-day parsing, plus the date sequence used when a time
//! slot is applied to a batch of drafts.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};

use crate::{BatchcastError, Result};

/// Date formats accepted for imported schedule dates
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parse a weekday name such as "Mon" or "monday"
pub fn parse_weekday(input: &str) -> Result<Weekday> {
    input
        .trim()
        .parse::<Weekday>()
        .map_err(|_| BatchcastError::InvalidInput(format!("Unknown weekday: '{}'", input)))
}

/// Parse a 24-hour "HH:MM" time of day
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M").map_err(|_| {
        BatchcastError::InvalidInput(format!("Time must be HH:MM (24-hour), got '{}'", input))
    })
}

/// Parse an imported date leniently
///
/// Returns `None` for blank or unrecognised input; validation reports the
/// missing schedule later.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// First date on or after `from` that falls on `weekday`
pub fn next_weekday(from: NaiveDate, weekday: Weekday) -> NaiveDate {
    from.iter_days()
        .take(7)
        .find(|d| d.weekday() == weekday)
        .unwrap_or(from)
}

/// Dates for `count` posts cycling through `days`, starting from `today`
///
/// Post `i` lands on `days[i % days.len()]`, pushed out by
/// `i / days.len()` whole weeks.
pub fn slot_dates(today: NaiveDate, days: &[Weekday], count: usize) -> Result<Vec<NaiveDate>> {
    if days.is_empty() {
        return Err(BatchcastError::InvalidInput(
            "Time slot has no days".to_string(),
        ));
    }

    let mut dates = Vec::with_capacity(count);
    for index in 0..count {
        let week = (index / days.len()) as u64;
        let weekday = days[index % days.len()];
        let base = next_weekday(today, weekday);
        let date = base.checked_add_days(Days::new(week * 7)).ok_or_else(|| {
            BatchcastError::InvalidInput("Scheduled date out of range".to_string())
        })?;
        dates.push(date);
    }
    Ok(dates)
}

/// Format a weekday list the way slots are displayed ("Mon, Wed, Fri")
pub fn format_days(days: &[Weekday]) -> String {
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
