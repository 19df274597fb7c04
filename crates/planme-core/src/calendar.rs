//! UTC calendar helpers shared by every next-occurrence function.
//!
//! Months are 1-based (January = 1) throughout, matching chrono.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

/// Last day (28..=31) of the given month, or `None` outside chrono's range.
///
/// ```
/// use planme_core::calendar::last_day_of_month;
///
/// assert_eq!(last_day_of_month(2024, 2), Some(29));
/// assert_eq!(last_day_of_month(2025, 2), Some(28));
/// assert_eq!(last_day_of_month(2025, 4), Some(30));
/// ```
pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = add_months(year, month, 1);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
}

/// Adds `n` months to `(year, month)`, rolling over year boundaries.
pub fn add_months(year: i32, month: u32, n: u32) -> (i32, u32) {
    let zero_based = i64::from(month) - 1 + i64::from(n);
    let year = i64::from(year) + zero_based.div_euclid(12);
    (year as i32, (zero_based.rem_euclid(12) + 1) as u32)
}

/// Absolute month number, so the difference of two indices is a month count.
#[inline]
pub fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

/// Puts the UTC time of day of `time_source` on `date`.
///
/// Hour, minute, second and sub-second precision are all carried over.
pub fn with_time_of_day(date: NaiveDate, time_source: DateTime<Utc>) -> DateTime<Utc> {
    date.and_time(time_source.time()).and_utc()
}

/// Calendar date of a UTC instant (its midnight, as a date).
#[inline]
pub fn start_of_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let days_from_monday = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(days_from_monday))
        .unwrap_or(date)
}

/// Date for `(year, month, day)` with `day` clamped to the month's last day.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(last_day_of_month(year, month)?))
}
