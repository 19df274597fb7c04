pub mod next;
pub mod plan;
pub mod preview;
pub mod weekdays;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::config::OutputFormat;
use crate::views;

/// Prints occurrences in the requested format.
pub(crate) fn render(occurrences: &[DateTime<Utc>], output: OutputFormat, now: DateTime<Utc>) -> Result<()> {
    match output {
        OutputFormat::Json => views::json::display_occurrences(occurrences),
        OutputFormat::Table => {
            views::table::display_occurrences(occurrences, now);
            Ok(())
        }
    }
}
