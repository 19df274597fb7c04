use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use planme_core::recurrence::next_occurrence;

use crate::cli::NextCommand;
use crate::config::{Config, OutputFormat};
use crate::parser::parse_instant;
use crate::util::resolve_rule;
use crate::views::json::format_instant;

pub fn next(command: NextCommand, config: &Config) -> Result<()> {
    let now = Utc::now();
    let rule = resolve_rule(&command.rule, now)?;
    let from = command
        .from
        .as_deref()
        .map(|from| parse_instant(from, now))
        .transpose()?
        .unwrap_or(now);

    let next = next_occurrence(&rule, from);

    match OutputFormat::resolve(command.json, config.output) {
        OutputFormat::Json => super::render(next.as_slice(), OutputFormat::Json, now),
        OutputFormat::Table => {
            match next {
                Some(occurrence) => println!(
                    "{} {}",
                    "Next occurrence:".blue().bold(),
                    format_instant(&occurrence).cyan()
                ),
                None => println!("No upcoming occurrence (series may have ended)"),
            }
            Ok(())
        }
    }
}
