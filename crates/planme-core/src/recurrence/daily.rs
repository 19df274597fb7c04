use chrono::{DateTime, Days, Utc};
use std::ops::ControlFlow;

use super::{judge, open_search, Verdict};
use crate::models::{RecurrenceEndType, RecurrenceFrequency, RecurrenceRule};

/// Next occurrence of a `DAILY_INTERVAL` rule strictly after `from`.
///
/// Occurrences sit on the grid `start + k * interval` days, so the answer is
/// computed in closed form rather than searched. Unlike the other
/// frequencies, the grid index is also checked against the rule's own
/// `max_occurrences` for `AFTER_OCCURRENCES` rules.
///
/// # Panics
///
/// Panics if `rule.frequency` is not `DAILY_INTERVAL`.
pub fn next_daily_interval_occurrence(
    rule: &RecurrenceRule,
    from: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    assert_eq!(
        rule.frequency,
        RecurrenceFrequency::DailyInterval,
        "next_daily_interval_occurrence only supports DAILY_INTERVAL rules"
    );

    let floor = match open_search(rule, from) {
        ControlFlow::Continue(floor) => floor,
        ControlFlow::Break(result) => return result,
    };

    let start = rule.start_date_time;
    let interval = u64::from(rule.effective_interval());

    // 0-based position on the grid of the occurrence we are about to return
    let next_index = if from < start {
        0
    } else {
        let elapsed_days = (floor - start).num_days().max(0) as u64;
        elapsed_days / interval + 1
    };

    if rule.end_type == RecurrenceEndType::AfterOccurrences {
        if let Some(max) = rule.max_occurrences.filter(|max| *max > 0) {
            if next_index >= u64::from(max) {
                return None;
            }
        }
    }

    let candidate = start.checked_add_days(Days::new(next_index.checked_mul(interval)?))?;
    match judge(rule, from, candidate) {
        Verdict::Accept(occurrence) => Some(occurrence),
        Verdict::Skip | Verdict::Stop => None,
    }
}
