use chrono::{DateTime, Datelike, Utc};
use std::ops::ControlFlow;

use super::{judge, open_search, Verdict, MONTHLY_SAFETY_LIMIT_MONTHS};
use crate::calendar::{add_months, clamped_date, month_index, with_time_of_day};
use crate::models::{RecurrenceFrequency, RecurrenceRule};

/// Next occurrence of a `MONTHLY_DAY_OF_MONTH` rule strictly after `from`.
///
/// Every `interval`-th month counted from the start month qualifies. The
/// target day is clamped to the month length, so a rule on the 31st lands
/// on the 30th in April and on the 28th or 29th in February.
///
/// # Panics
///
/// Panics if `rule.frequency` is not `MONTHLY_DAY_OF_MONTH`.
pub fn next_monthly_day_of_month_occurrence(
    rule: &RecurrenceRule,
    from: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    assert_eq!(
        rule.frequency,
        RecurrenceFrequency::MonthlyDayOfMonth,
        "next_monthly_day_of_month_occurrence only supports MONTHLY_DAY_OF_MONTH rules"
    );

    let day_of_month = match rule.day_of_month {
        Some(day) if day > 0 => day,
        _ => return None,
    };

    let floor = match open_search(rule, from) {
        ControlFlow::Continue(floor) => floor,
        ControlFlow::Break(result) => return result,
    };

    let start = rule.start_date_time;
    let months_interval = i64::from(rule.effective_interval());
    let base = month_index(start.year(), start.month());

    let (mut year, mut month) = (floor.year(), floor.month());
    for _ in 0..MONTHLY_SAFETY_LIMIT_MONTHS {
        let months_from_base = month_index(year, month) - base;

        if months_from_base >= 0 && months_from_base % months_interval == 0 {
            let date = clamped_date(year, month, day_of_month)?;
            match judge(rule, from, with_time_of_day(date, start)) {
                Verdict::Accept(occurrence) => return Some(occurrence),
                Verdict::Stop => return None,
                Verdict::Skip => {}
            }
        }

        (year, month) = add_months(year, month, 1);
    }

    tracing::debug!(
        frequency = %rule.frequency,
        limit_months = MONTHLY_SAFETY_LIMIT_MONTHS,
        "safety horizon exhausted without a match"
    );
    None
}
