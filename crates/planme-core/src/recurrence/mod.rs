//! Next-occurrence functions, one per recurrence frequency, and the
//! occurrence generator built on top of them.
//!
//! Every function in this module shares one policy:
//!
//! - the search never starts before the rule's `start_date_time`
//! - a returned occurrence is strictly after the reference instant
//! - a `ONCE` rule only ever yields its start instant
//! - an `ON_DATE` rule stops for good at the first candidate past its end date
//! - `AFTER_OCCURRENCES` is a budget enforced by [`generate_occurrences`],
//!   not by the per-frequency functions (the daily function additionally
//!   checks its own grid index)
//! - every search is bounded by a fixed safety horizon
//! - occurrences carry the UTC time of day of the rule's start

use chrono::{DateTime, Utc};
use std::iter::FusedIterator;
use std::ops::ControlFlow;

use crate::models::{RecurrenceEndType, RecurrenceFrequency, RecurrenceRule};

mod daily;
mod generator;
mod monthly_day;
mod monthly_weekday;
mod weekly;
mod yearly;

pub use daily::next_daily_interval_occurrence;
pub use generator::{generate_occurrences, GenerateOptions};
pub use monthly_day::next_monthly_day_of_month_occurrence;
pub use monthly_weekday::{next_monthly_weekday_of_month_occurrence, nth_weekday_of_month};
pub use weekly::next_weekly_days_occurrence;
pub use yearly::next_yearly_interval_occurrence;

/// Days searched by the weekly function (two years of weeks).
pub const WEEKLY_SAFETY_LIMIT_DAYS: u32 = 7 * 52 * 2;
/// Months searched by both monthly functions (ten years).
pub const MONTHLY_SAFETY_LIMIT_MONTHS: u32 = 12 * 10;
/// Years searched by the yearly function.
pub const YEARLY_SAFETY_LIMIT_YEARS: u32 = 100;

/// Returns the next occurrence of `rule` strictly after `from`, dispatching
/// on the rule's frequency. `NONE` rules never occur.
pub fn next_occurrence(rule: &RecurrenceRule, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match rule.frequency {
        RecurrenceFrequency::DailyInterval => next_daily_interval_occurrence(rule, from),
        RecurrenceFrequency::WeeklyDays => next_weekly_days_occurrence(rule, from),
        RecurrenceFrequency::MonthlyDayOfMonth => next_monthly_day_of_month_occurrence(rule, from),
        RecurrenceFrequency::MonthlyWeekdaysOfMonth => {
            next_monthly_weekday_of_month_occurrence(rule, from)
        }
        RecurrenceFrequency::YearlyInterval => next_yearly_interval_occurrence(rule, from),
        RecurrenceFrequency::None => None,
    }
}

/// Lazily walks the occurrences of a rule, each strictly after the previous.
///
/// The walk ends at the rule's natural end (end date, exhausted search
/// horizon, single-shot rule). It does not apply any `AFTER_OCCURRENCES`
/// budget; see [`generate_occurrences`] for that.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    rule: &'a RecurrenceRule,
    cursor: Option<DateTime<Utc>>,
}

impl<'a> Occurrences<'a> {
    pub fn new(rule: &'a RecurrenceRule, from: DateTime<Utc>) -> Self {
        Self {
            rule,
            cursor: Some(from),
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        let from = self.cursor?;
        self.cursor = next_occurrence(self.rule, from);
        self.cursor
    }
}

impl FusedIterator for Occurrences<'_> {}

/// Applies the checks every function runs before searching.
///
/// `Continue` carries the search floor, `max(from, start)`. `Break` carries
/// the final answer for rules that need no search.
pub(crate) fn open_search(
    rule: &RecurrenceRule,
    from: DateTime<Utc>,
) -> ControlFlow<Option<DateTime<Utc>>, DateTime<Utc>> {
    let start = rule.start_date_time;
    let floor = from.max(start);

    if let Some(end) = rule.ends_on() {
        if floor > end {
            return ControlFlow::Break(None);
        }
    }

    if rule.end_type == RecurrenceEndType::Once {
        return ControlFlow::Break((start > from).then_some(start));
    }

    ControlFlow::Continue(floor)
}

/// What to do with a calendar candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Not eligible, keep looking.
    Skip,
    /// The next occurrence.
    Accept(DateTime<Utc>),
    /// Past the end of the series, give up.
    Stop,
}

pub(crate) fn judge(rule: &RecurrenceRule, from: DateTime<Utc>, candidate: DateTime<Utc>) -> Verdict {
    if candidate < rule.start_date_time || candidate <= from {
        return Verdict::Skip;
    }
    match rule.ends_on() {
        Some(end) if candidate > end => Verdict::Stop,
        _ => Verdict::Accept(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weekdays::Weekday;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn sample_rules() -> Vec<RecurrenceRule> {
        let start = at(2025, 1, 6, 9);
        vec![
            RecurrenceRule::new(RecurrenceFrequency::DailyInterval, RecurrenceEndType::Never, start)
                .with_interval(3),
            RecurrenceRule::new(RecurrenceFrequency::WeeklyDays, RecurrenceEndType::Never, start)
                .with_weekdays([Weekday::Monday, Weekday::Thursday])
                .with_interval(2),
            RecurrenceRule::new(RecurrenceFrequency::MonthlyDayOfMonth, RecurrenceEndType::Never, start)
                .with_day_of_month(6),
            RecurrenceRule::new(
                RecurrenceFrequency::MonthlyWeekdaysOfMonth,
                RecurrenceEndType::Never,
                start,
            )
            .with_weekday_of_month(1, Weekday::Monday),
            RecurrenceRule::new(RecurrenceFrequency::YearlyInterval, RecurrenceEndType::Never, start),
        ]
    }

    mod dispatch_tests {
        use super::*;

        #[test]
        fn test_none_never_occurs() {
            let rule = RecurrenceRule::new(RecurrenceFrequency::None, RecurrenceEndType::Never, at(2025, 1, 1, 0));
            assert_eq!(next_occurrence(&rule, at(2024, 1, 1, 0)), None);
        }

        #[test]
        fn test_dispatches_to_matching_function() {
            let start = at(2025, 1, 6, 9);
            for rule in sample_rules() {
                // every sample rule has its start on its own grid
                assert_eq!(next_occurrence(&rule, start - Duration::days(1)), Some(start));
            }
        }
    }

    mod search_policy_tests {
        use super::*;

        #[test]
        fn test_open_search_floors_at_start() {
            let rule = RecurrenceRule::new(RecurrenceFrequency::DailyInterval, RecurrenceEndType::Never, at(2025, 1, 6, 9));
            assert_eq!(open_search(&rule, at(2025, 1, 1, 0)), ControlFlow::Continue(at(2025, 1, 6, 9)));
            assert_eq!(open_search(&rule, at(2025, 2, 1, 0)), ControlFlow::Continue(at(2025, 2, 1, 0)));
        }

        #[test]
        fn test_open_search_once() {
            let rule = RecurrenceRule::new(RecurrenceFrequency::WeeklyDays, RecurrenceEndType::Once, at(2025, 1, 6, 9));
            assert_eq!(open_search(&rule, at(2025, 1, 6, 8)), ControlFlow::Break(Some(at(2025, 1, 6, 9))));
            assert_eq!(open_search(&rule, at(2025, 1, 6, 9)), ControlFlow::Break(None));
        }

        #[test]
        fn test_open_search_past_end_date() {
            let rule = RecurrenceRule::new(RecurrenceFrequency::DailyInterval, RecurrenceEndType::OnDate, at(2025, 1, 6, 9))
                .with_end_date(at(2025, 1, 10, 0));
            assert_eq!(open_search(&rule, at(2025, 1, 11, 0)), ControlFlow::Break(None));
        }

        #[test]
        fn test_judge() {
            let rule = RecurrenceRule::new(RecurrenceFrequency::DailyInterval, RecurrenceEndType::OnDate, at(2025, 1, 6, 9))
                .with_end_date(at(2025, 1, 10, 9));
            let from = at(2025, 1, 7, 9);
            assert_eq!(judge(&rule, from, at(2025, 1, 5, 9)), Verdict::Skip);
            assert_eq!(judge(&rule, from, from), Verdict::Skip);
            assert_eq!(judge(&rule, from, at(2025, 1, 10, 9)), Verdict::Accept(at(2025, 1, 10, 9)));
            assert_eq!(judge(&rule, from, at(2025, 1, 11, 9)), Verdict::Stop);
        }
    }

    mod iterator_tests {
        use super::*;

        #[test]
        fn test_walks_until_natural_end() {
            let rule = RecurrenceRule::new(RecurrenceFrequency::DailyInterval, RecurrenceEndType::OnDate, at(2025, 1, 1, 10))
                .with_end_date(at(2025, 1, 4, 10));
            let all: Vec<_> = Occurrences::new(&rule, at(2024, 12, 31, 0)).collect();
            assert_eq!(all, vec![at(2025, 1, 1, 10), at(2025, 1, 2, 10), at(2025, 1, 3, 10), at(2025, 1, 4, 10)]);
        }

        #[test]
        fn test_is_fused() {
            let rule = RecurrenceRule::new(RecurrenceFrequency::DailyInterval, RecurrenceEndType::Once, at(2025, 1, 1, 10));
            let mut iter = Occurrences::new(&rule, at(2024, 12, 31, 0));
            assert_eq!(iter.next(), Some(at(2025, 1, 1, 10)));
            assert_eq!(iter.next(), None);
            assert_eq!(iter.next(), None);
        }
    }

    proptest! {
        #[test]
        fn prop_strictly_after_from(rule_index in 0usize..5, offset_hours in -2_000i64..20_000) {
            let rule = &sample_rules()[rule_index];
            let from = rule.start_date_time + Duration::hours(offset_hours);
            if let Some(next) = next_occurrence(rule, from) {
                prop_assert!(next > from);
                prop_assert!(next >= rule.start_date_time);
                prop_assert_eq!(next.time(), rule.start_date_time.time());
            }
        }

        #[test]
        fn prop_floor_returns_start(rule_index in 0usize..5, hours_before in 1i64..5_000) {
            let rule = &sample_rules()[rule_index];
            let from = rule.start_date_time - Duration::hours(hours_before);
            prop_assert_eq!(next_occurrence(rule, from), Some(rule.start_date_time));
        }

        #[test]
        fn prop_idempotent(rule_index in 0usize..5, offset_hours in -500i64..50_000) {
            let rule = &sample_rules()[rule_index];
            let from = rule.start_date_time + Duration::hours(offset_hours);
            prop_assert_eq!(next_occurrence(rule, from), next_occurrence(rule, from));
        }
    }
}
