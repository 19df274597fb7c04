use chrono::{DateTime, Datelike, Utc};
use std::ops::ControlFlow;

use super::{judge, open_search, Verdict, YEARLY_SAFETY_LIMIT_YEARS};
use crate::calendar::{clamped_date, with_time_of_day};
use crate::models::{RecurrenceFrequency, RecurrenceRule};

/// Next occurrence of a `YEARLY_INTERVAL` rule strictly after `from`.
///
/// Occurrences fall on the month and day of the rule start, every
/// `interval` years. The day is clamped to the month length, which moves a
/// February 29 start to February 28 in common years.
///
/// # Panics
///
/// Panics if `rule.frequency` is not `YEARLY_INTERVAL`.
pub fn next_yearly_interval_occurrence(
    rule: &RecurrenceRule,
    from: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    assert_eq!(
        rule.frequency,
        RecurrenceFrequency::YearlyInterval,
        "next_yearly_interval_occurrence only supports YEARLY_INTERVAL rules"
    );

    let floor = match open_search(rule, from) {
        ControlFlow::Continue(floor) => floor,
        ControlFlow::Break(result) => return result,
    };

    let start = rule.start_date_time;
    let years_interval = i64::from(rule.effective_interval());

    let mut year = floor.year();
    for _ in 0..YEARLY_SAFETY_LIMIT_YEARS {
        let years_from_base = i64::from(year) - i64::from(start.year());

        if years_from_base >= 0 && years_from_base % years_interval == 0 {
            let date = clamped_date(year, start.month(), start.day())?;
            match judge(rule, from, with_time_of_day(date, start)) {
                Verdict::Accept(occurrence) => return Some(occurrence),
                Verdict::Stop => return None,
                Verdict::Skip => {}
            }
        }

        year = year.checked_add(1)?;
    }

    tracing::debug!(
        frequency = %rule.frequency,
        limit_years = YEARLY_SAFETY_LIMIT_YEARS,
        "safety horizon exhausted without a match"
    );
    None
}
