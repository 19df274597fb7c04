use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use planme_core::recurrence::{generate_occurrences, GenerateOptions};

use crate::cli::PreviewCommand;
use crate::config::{Config, OutputFormat};
use crate::parser::parse_instant;
use crate::util::resolve_rule;
use crate::views::table::describe_rule;

pub fn preview(command: PreviewCommand, config: &Config) -> Result<()> {
    let now = Utc::now();
    let rule = resolve_rule(&command.rule, now)?;
    let from = match &command.from {
        Some(from) => parse_instant(from, now)?,
        None => rule.start_date_time,
    };
    let limit = command.limit.unwrap_or(config.preview_count);

    let occurrences = generate_occurrences(
        &rule,
        from,
        GenerateOptions {
            max_to_generate: limit,
            already_generated_count: command.already,
        },
    );

    let output = OutputFormat::resolve(command.json, config.output);
    if output == OutputFormat::Table {
        println!("{} (up to {} occurrences)", "Series Preview".blue().bold(), limit);
        println!("Rule: {}", describe_rule(&rule).cyan());
        println!();
    }
    super::render(&occurrences, output, now)
}
