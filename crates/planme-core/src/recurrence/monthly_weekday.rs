use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::ops::ControlFlow;

use super::{judge, open_search, Verdict, MONTHLY_SAFETY_LIMIT_MONTHS};
use crate::calendar::{add_months, last_day_of_month, month_index, with_time_of_day};
use crate::models::{RecurrenceFrequency, RecurrenceRule};
use crate::weekdays::{date_to_weekday, Weekday};

/// Next occurrence of a `MONTHLY_WEEKDAYS_OF_MONTH` rule strictly after `from`.
///
/// Every `interval`-th month counted from the start month qualifies. A
/// month without the requested weekday (say, a fifth Monday) is skipped.
///
/// # Panics
///
/// Panics if `rule.frequency` is not `MONTHLY_WEEKDAYS_OF_MONTH`.
pub fn next_monthly_weekday_of_month_occurrence(
    rule: &RecurrenceRule,
    from: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    assert_eq!(
        rule.frequency,
        RecurrenceFrequency::MonthlyWeekdaysOfMonth,
        "next_monthly_weekday_of_month_occurrence only supports MONTHLY_WEEKDAYS_OF_MONTH rules"
    );

    let (week_of_month, weekday) = match (rule.week_of_month, rule.weekday_of_month) {
        (Some(week), Some(weekday)) if week != 0 => (week, weekday),
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
            if let Some(date) = nth_weekday_of_month(year, month, week_of_month, weekday) {
                match judge(rule, from, with_time_of_day(date, start)) {
                    Verdict::Accept(occurrence) => return Some(occurrence),
                    Verdict::Stop => return None,
                    Verdict::Skip => {}
                }
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

/// Date of the `week_of_month`-th `weekday` of a month, or of the last one
/// when `week_of_month` is -1.
///
/// Returns `None` when the month has no such day or the selector is outside
/// `1..=5` / `-1`.
///
/// ```
/// use chrono::NaiveDate;
/// use planme_core::recurrence::nth_weekday_of_month;
/// use planme_core::weekdays::Weekday;
///
/// assert_eq!(nth_weekday_of_month(2025, 2, 3, Weekday::Wednesday), NaiveDate::from_ymd_opt(2025, 2, 19));
/// assert_eq!(nth_weekday_of_month(2025, 3, -1, Weekday::Friday), NaiveDate::from_ymd_opt(2025, 3, 28));
/// assert_eq!(nth_weekday_of_month(2025, 2, 5, Weekday::Monday), None);
/// ```
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    week_of_month: i8,
    weekday: Weekday,
) -> Option<NaiveDate> {
    let last_day = last_day_of_month(year, month)?;

    if week_of_month == -1 {
        return (1..=last_day)
            .rev()
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .find(|date| date_to_weekday(*date) == weekday);
    }

    if !(1..=5).contains(&week_of_month) {
        return None;
    }

    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?;
    let first_weekday = date_to_weekday(first_of_month);
    let offset = (u32::from(weekday.iso_number()) + 7 - u32::from(first_weekday.iso_number())) % 7;

    let target_day = 1 + offset + (week_of_month as u32 - 1) * 7;
    if target_day > last_day {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, target_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecurrenceEndType;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn nth(week: i8, weekday: Weekday, start: DateTime<Utc>) -> RecurrenceRule {
        RecurrenceRule::new(
            RecurrenceFrequency::MonthlyWeekdaysOfMonth,
            RecurrenceEndType::Never,
            start,
        )
        .with_weekday_of_month(week, weekday)
    }

    mod nth_weekday_tests {
        use super::*;

        #[rstest]
        #[case(2025, 1, 1, Weekday::Wednesday, Some(1))]
        #[case(2025, 1, 1, Weekday::Monday, Some(6))]
        #[case(2025, 2, 3, Weekday::Wednesday, Some(19))]
        #[case(2025, 3, 3, Weekday::Wednesday, Some(19))]
        #[case(2025, 3, 5, Weekday::Monday, Some(31))]
        #[case(2025, 2, 5, Weekday::Monday, None)]
        #[case(2025, 3, -1, Weekday::Friday, Some(28))]
        #[case(2025, 4, -1, Weekday::Friday, Some(25))]
        #[case(2025, 5, -1, Weekday::Saturday, Some(31))]
        #[case(2025, 5, 0, Weekday::Saturday, None)]
        #[case(2025, 5, 6, Weekday::Saturday, None)]
        fn test_days(
            #[case] year: i32,
            #[case] month: u32,
            #[case] week: i8,
            #[case] weekday: Weekday,
            #[case] expected: Option<u32>,
        ) {
            let expected = expected.and_then(|day| NaiveDate::from_ymd_opt(year, month, day));
            assert_eq!(nth_weekday_of_month(year, month, week, weekday), expected);
        }
    }

    #[test]
    fn test_third_wednesday() {
        let rule = nth(3, Weekday::Wednesday, at(2025, 1, 1, 10));
        assert_eq!(
            next_monthly_weekday_of_month_occurrence(&rule, at(2025, 2, 1, 0)),
            Some(at(2025, 2, 19, 10))
        );
        assert_eq!(
            next_monthly_weekday_of_month_occurrence(&rule, at(2025, 2, 19, 10)),
            Some(at(2025, 3, 19, 10))
        );
    }

    #[test]
    fn test_last_friday() {
        let rule = nth(-1, Weekday::Friday, at(2025, 1, 1, 18));
        assert_eq!(
            next_monthly_weekday_of_month_occurrence(&rule, at(2025, 3, 1, 0)),
            Some(at(2025, 3, 28, 18))
        );
        assert_eq!(
            next_monthly_weekday_of_month_occurrence(&rule, at(2025, 3, 28, 18)),
            Some(at(2025, 4, 25, 18))
        );
    }

    #[test]
    fn test_months_without_fifth_weekday_are_skipped() {
        // fifth Monday: March 2025 has the 31st, April and May have none
        let rule = nth(5, Weekday::Monday, at(2025, 1, 1, 8));
        assert_eq!(
            next_monthly_weekday_of_month_occurrence(&rule, at(2025, 1, 1, 0)),
            Some(at(2025, 3, 31, 8))
        );
        assert_eq!(
            next_monthly_weekday_of_month_occurrence(&rule, at(2025, 3, 31, 8)),
            Some(at(2025, 6, 30, 8))
        );
    }

    #[test]
    fn test_every_other_month() {
        let rule = nth(1, Weekday::Monday, at(2025, 1, 6, 9)).with_interval(2);
        assert_eq!(
            next_monthly_weekday_of_month_occurrence(&rule, at(2025, 1, 6, 9)),
            Some(at(2025, 3, 3, 9))
        );
    }

    #[rstest]
    #[case(119, Some(at(2034, 12, 4, 9)))]
    #[case(120, None)]
    fn test_ten_year_horizon_boundary(#[case] interval: u32, #[case] expected: Option<DateTime<Utc>>) {
        let start = at(2025, 1, 6, 9);
        let rule = nth(1, Weekday::Monday, start).with_interval(interval);
        assert_eq!(next_monthly_weekday_of_month_occurrence(&rule, start), expected);
    }

    #[test]
    fn test_start_month_candidate_before_start_is_skipped() {
        // first Monday of Jan 2025 is the 6th, the series starts on the 10th
        let rule = nth(1, Weekday::Monday, at(2025, 1, 10, 9));
        assert_eq!(
            next_monthly_weekday_of_month_occurrence(&rule, at(2025, 1, 1, 0)),
            Some(at(2025, 2, 3, 9))
        );
    }

    #[rstest]
    #[case(None, Some(Weekday::Monday))]
    #[case(Some(1), None)]
    #[case(Some(0), Some(Weekday::Monday))]
    fn test_missing_selector_never_fires(#[case] week: Option<i8>, #[case] weekday: Option<Weekday>) {
        let mut rule = nth(1, Weekday::Monday, at(2025, 1, 1, 0));
        rule.week_of_month = week;
        rule.weekday_of_month = weekday;
        assert_eq!(next_monthly_weekday_of_month_occurrence(&rule, at(2025, 1, 1, 0)), None);
    }

    #[test]
    fn test_out_of_range_week_exhausts_horizon() {
        let rule = nth(7, Weekday::Monday, at(2025, 1, 1, 0));
        assert_eq!(next_monthly_weekday_of_month_occurrence(&rule, at(2025, 1, 1, 0)), None);
    }

    #[test]
    fn test_on_date_is_a_hard_stop() {
        let rule = nth(-1, Weekday::Friday, at(2025, 1, 1, 18))
            .with_end_type(RecurrenceEndType::OnDate)
            .with_end_date(at(2025, 4, 1, 0));
        assert_eq!(
            next_monthly_weekday_of_month_occurrence(&rule, at(2025, 3, 1, 0)),
            Some(at(2025, 3, 28, 18))
        );
        assert_eq!(next_monthly_weekday_of_month_occurrence(&rule, at(2025, 3, 28, 18)), None);
    }

    #[test]
    #[should_panic(expected = "only supports MONTHLY_WEEKDAYS_OF_MONTH")]
    fn test_wrong_frequency_panics() {
        let rule = RecurrenceRule::new(RecurrenceFrequency::MonthlyDayOfMonth, RecurrenceEndType::Never, at(2025, 1, 1, 0));
        next_monthly_weekday_of_month_occurrence(&rule, at(2025, 1, 1, 0));
    }
}
