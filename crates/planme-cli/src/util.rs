use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Datelike, SubsecRound, Utc};
use planme_core::error::CoreError;
use planme_core::models::{RecurrenceEndType, RecurrenceFrequency, RecurrenceRule};
use planme_core::weekdays::{date_to_weekday, Weekday};

use crate::cli::{RecurrenceShortcut, RuleArgs};
use crate::parser::{parse_days_string, parse_instant};

/// Builds the rule described by the command line, from `--rule` or from the
/// individual flags, and validates it.
pub fn resolve_rule(args: &RuleArgs, now: DateTime<Utc>) -> Result<RecurrenceRule> {
    let rule = match (&args.rule, args.every) {
        (Some(path), _) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read rule file '{}'", path.display()))?;
            serde_json::from_str::<RecurrenceRule>(&content)
                .with_context(|| format!("Failed to parse rule file '{}'", path.display()))?
        }
        (None, Some(shortcut)) => rule_from_flags(shortcut, args, now)?,
        (None, None) => {
            return Err(anyhow!(CoreError::InvalidInput(
                "Either --rule or --every must be provided".to_string()
            )));
        }
    };

    rule.validate()?;
    tracing::debug!(frequency = %rule.frequency, end_type = %rule.end_type, "resolved rule");
    Ok(rule)
}

fn rule_from_flags(
    shortcut: RecurrenceShortcut,
    args: &RuleArgs,
    now: DateTime<Utc>,
) -> Result<RecurrenceRule> {
    let start = match &args.start {
        Some(start) => parse_instant(start, now)?,
        None => now.trunc_subsecs(0),
    };

    let frequency = match shortcut {
        RecurrenceShortcut::Daily => RecurrenceFrequency::DailyInterval,
        RecurrenceShortcut::Weekly | RecurrenceShortcut::Weekdays | RecurrenceShortcut::Weekends => {
            RecurrenceFrequency::WeeklyDays
        }
        RecurrenceShortcut::Monthly => RecurrenceFrequency::MonthlyDayOfMonth,
        RecurrenceShortcut::MonthlyWeekday => RecurrenceFrequency::MonthlyWeekdaysOfMonth,
        RecurrenceShortcut::Yearly => RecurrenceFrequency::YearlyInterval,
    };

    let end_type = if args.once {
        RecurrenceEndType::Once
    } else if args.until.is_some() {
        RecurrenceEndType::OnDate
    } else if args.count.is_some() {
        RecurrenceEndType::AfterOccurrences
    } else {
        RecurrenceEndType::Never
    };

    let mut rule = RecurrenceRule::new(frequency, end_type, start);

    if let Some(interval) = args.interval {
        rule = rule.with_interval(interval);
    }
    if let Some(until) = &args.until {
        rule = rule.with_end_date(parse_instant(until, now)?);
    }
    if let Some(count) = args.count {
        rule = rule.with_max_occurrences(count);
    }

    rule = match shortcut {
        RecurrenceShortcut::Weekly => {
            let days = match &args.on {
                Some(on) => parse_days_string(on)?,
                None => vec![date_to_weekday(start)],
            };
            rule.with_weekdays(days)
        }
        RecurrenceShortcut::Weekdays => rule.with_weekdays(Weekday::ALL[..5].iter().copied()),
        RecurrenceShortcut::Weekends => rule.with_weekdays(Weekday::ALL[5..].iter().copied()),
        RecurrenceShortcut::Monthly => rule.with_day_of_month(args.day_of_month.unwrap_or(start.day())),
        RecurrenceShortcut::MonthlyWeekday => {
            // the start's own position, e.g. the 2nd Tuesday
            let week = args.week_of_month.unwrap_or(((start.day() - 1) / 7 + 1) as i8);
            let weekday = args.weekday.unwrap_or_else(|| date_to_weekday(start));
            rule.with_weekday_of_month(week, weekday)
        }
        RecurrenceShortcut::Daily | RecurrenceShortcut::Yearly => rule,
    };

    Ok(rule)
}
