use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use chrono_english::{parse_date_string, Dialect};
use planme_core::weekdays::Weekday;

/// Parses an instant given as RFC 3339 or as an English phrase such as
/// 'tomorrow 9am', relative to `now`.
pub fn parse_instant(date_str: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(date_str.trim()) {
        return Ok(instant.with_timezone(&Utc));
    }
    parse_date_string(date_str, now, Dialect::Us)
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", date_str, e))
}

/// Parse days string like "mon,tue,wed", "monday,tuesday", or "weekdays"
pub fn parse_days_string(days_str: &str) -> Result<Vec<Weekday>> {
    let input = days_str.trim().to_lowercase();

    match input.as_str() {
        "weekdays" | "workdays" => return Ok(Weekday::ALL[..5].to_vec()),
        "weekends" => return Ok(Weekday::ALL[5..].to_vec()),
        "daily" | "everyday" => return Ok(Weekday::ALL.to_vec()),
        _ => {}
    }

    let mut days = Vec::new();
    let mut invalid_days = Vec::new();

    for day in input.split(',') {
        let day = day.trim();
        if day.is_empty() {
            continue;
        }
        match day.parse::<Weekday>() {
            Ok(weekday) if !days.contains(&weekday) => days.push(weekday),
            Ok(_) => {}
            Err(_) => invalid_days.push(day.to_string()),
        }
    }

    if !invalid_days.is_empty() {
        return Err(anyhow!(
            "Invalid day(s): {}\n\nSupported formats:\n  • Full names: 'monday,tuesday,wednesday'\n  • Short names: 'mon,tue,wed'\n  • Single letters: 'm,tu,w,th,f,sa,su'\n  • Groups: 'weekdays', 'weekends', 'daily'",
            invalid_days.join(", ")
        ));
    }

    if days.is_empty() {
        return Err(anyhow!(
            "No valid days specified in: '{}'\n\nExamples:\n  • mon,wed,fri\n  • weekdays\n  • monday,wednesday,friday",
            days_str
        ));
    }

    Ok(days)
}

/// Value parser for `--week-of-month`: 1..=5, or 'last' / -1.
pub fn parse_week_of_month(value: &str) -> Result<i8, String> {
    let input = value.trim().to_lowercase();
    let week = match input.as_str() {
        "last" => -1,
        "first" => 1,
        "second" => 2,
        "third" => 3,
        "fourth" => 4,
        "fifth" => 5,
        other => other
            .parse::<i8>()
            .map_err(|_| format!("'{}' is not a week of the month", value))?,
    };

    if week == -1 || (1..=5).contains(&week) {
        Ok(week)
    } else {
        Err(format!("week of month must be 1-5 or last, got {}", week))
    }
}
