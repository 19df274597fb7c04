use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};

/// RFC 3339 with millisecond precision and a `Z` suffix.
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn display_occurrences(occurrences: &[DateTime<Utc>]) -> Result<()> {
    let formatted: Vec<String> = occurrences.iter().map(format_instant).collect();
    println!("{}", serde_json::to_string_pretty(&formatted)?);
    Ok(())
}
