use chrono::{DateTime, Utc};
use std::ops::ControlFlow;

use super::{judge, open_search, Verdict, WEEKLY_SAFETY_LIMIT_DAYS};
use crate::calendar::{start_of_day, start_of_week, with_time_of_day};
use crate::models::{RecurrenceFrequency, RecurrenceRule};
use crate::weekdays::{date_to_weekday, has_weekday};

/// Next occurrence of a `WEEKLY_DAYS` rule strictly after `from`.
///
/// Weeks are Monday-aligned and counted from the week containing the rule
/// start; only every `interval`-th week qualifies. Days are visited one by
/// one so several selected weekdays of the same week come out in calendar
/// order.
///
/// # Panics
///
/// Panics if `rule.frequency` is not `WEEKLY_DAYS`.
pub fn next_weekly_days_occurrence(
    rule: &RecurrenceRule,
    from: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    assert_eq!(
        rule.frequency,
        RecurrenceFrequency::WeeklyDays,
        "next_weekly_days_occurrence only supports WEEKLY_DAYS rules"
    );

    let mask = match rule.weekdays_bitmask {
        Some(mask) if mask != 0 => mask,
        _ => return None,
    };

    let floor = match open_search(rule, from) {
        ControlFlow::Continue(floor) => floor,
        ControlFlow::Break(result) => return result,
    };

    let start = rule.start_date_time;
    let weeks_interval = i64::from(rule.effective_interval());
    let base_week = start_of_week(start_of_day(start));

    let mut cursor = start_of_day(floor);
    for _ in 0..WEEKLY_SAFETY_LIMIT_DAYS {
        let weeks_from_base = (start_of_week(cursor) - base_week).num_days().div_euclid(7);

        if weeks_from_base >= 0
            && weeks_from_base % weeks_interval == 0
            && has_weekday(mask, date_to_weekday(cursor))
        {
            match judge(rule, from, with_time_of_day(cursor, start)) {
                Verdict::Accept(occurrence) => return Some(occurrence),
                Verdict::Stop => return None,
                Verdict::Skip => {}
            }
        }

        cursor = cursor.succ_opt()?;
    }

    tracing::debug!(
        frequency = %rule.frequency,
        limit_days = WEEKLY_SAFETY_LIMIT_DAYS,
        "safety horizon exhausted without a match"
    );
    None
}
