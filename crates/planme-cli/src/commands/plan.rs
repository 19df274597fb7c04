use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use planme_core::planner::{OccurrencePlanner, PlannerConfig};

use crate::cli::PlanCommand;
use crate::config::{Config, OutputFormat};
use crate::parser::parse_instant;
use crate::util::resolve_rule;

pub fn plan(command: PlanCommand, config: &Config) -> Result<()> {
    let now = Utc::now();
    let rule = resolve_rule(&command.rule, now)?;
    let from = command
        .from
        .as_deref()
        .map(|from| parse_instant(from, now))
        .transpose()?
        .unwrap_or(now);
    let horizon_days = command.horizon.unwrap_or(config.horizon_days);

    let planner = OccurrencePlanner::new(PlannerConfig {
        horizon_days,
        ..config.planner()
    });

    let occurrences = if command.after_completion {
        let pending = command
            .pending
            .iter()
            .map(|pending| parse_instant(pending, now))
            .collect::<Result<Vec<_>>>()?;
        planner
            .plan_after_completion(&rule, &pending, from)
            .into_iter()
            .collect::<Vec<_>>()
    } else {
        planner.generate_initial_occurrences(&rule, from, horizon_days)
    };

    let output = OutputFormat::resolve(command.json, config.output);
    if output == OutputFormat::Table {
        println!(
            "{} ({} day{} from {})",
            "Planned Occurrences".blue().bold(),
            horizon_days,
            if horizon_days == 1 { "" } else { "s" },
            from.format("%Y-%m-%d %H:%M UTC")
        );
        println!();
    }
    super::render(&occurrences, output, now)
}
