use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};

/// Date half of a wire timestamp (e.g. "2026-08-05").
pub const FULL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Hour half of a wire timestamp (e.g. "18:30").
pub const HOUR_FORMAT: &str = "%H:%M";

pub fn format_full_date(date: NaiveDate) -> String {
    date.format(FULL_DATE_FORMAT).to_string()
}

pub fn format_hour(time: NaiveTime) -> String {
    time.format(HOUR_FORMAT).to_string()
}

/// The API expects date and hour as one space-joined string, not a
/// structured timestamp.
pub fn wire_timestamp(date: NaiveDate, time: NaiveTime) -> String {
    format!("{} {}", format_full_date(date), format_hour(time))
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), FULL_DATE_FORMAT)
        .map_err(|_| anyhow!("invalid date '{}', expected YYYY-MM-DD", input))
}

pub fn parse_hour(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), HOUR_FORMAT)
        .map_err(|_| anyhow!("invalid time '{}', expected HH:MM", input))
}
