use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::CoreError;
use crate::weekdays::{decode_weekdays, encode_weekdays, Weekday, ALL_WEEKDAYS_MASK};

/// The recurrence pattern kind of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceFrequency {
    /// No recurrence at all.
    None,
    /// Every N days.
    DailyInterval,
    /// On selected weekdays, every N weeks.
    WeeklyDays,
    /// On a day of the month (e.g. the 10th), every N months.
    MonthlyDayOfMonth,
    /// On the Nth or last weekday of the month (e.g. the third Wednesday).
    MonthlyWeekdaysOfMonth,
    /// Every N years on the start date.
    YearlyInterval,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence frequency: {0}")]
pub struct ParseRecurrenceFrequencyError(String);

impl RecurrenceFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceFrequency::None => "NONE",
            RecurrenceFrequency::DailyInterval => "DAILY_INTERVAL",
            RecurrenceFrequency::WeeklyDays => "WEEKLY_DAYS",
            RecurrenceFrequency::MonthlyDayOfMonth => "MONTHLY_DAY_OF_MONTH",
            RecurrenceFrequency::MonthlyWeekdaysOfMonth => "MONTHLY_WEEKDAYS_OF_MONTH",
            RecurrenceFrequency::YearlyInterval => "YEARLY_INTERVAL",
        }
    }
}

impl fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceFrequency {
    type Err = ParseRecurrenceFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "NONE" => Ok(RecurrenceFrequency::None),
            "DAILY_INTERVAL" => Ok(RecurrenceFrequency::DailyInterval),
            "WEEKLY_DAYS" => Ok(RecurrenceFrequency::WeeklyDays),
            "MONTHLY_DAY_OF_MONTH" => Ok(RecurrenceFrequency::MonthlyDayOfMonth),
            "MONTHLY_WEEKDAYS_OF_MONTH" => Ok(RecurrenceFrequency::MonthlyWeekdaysOfMonth),
            "YEARLY_INTERVAL" => Ok(RecurrenceFrequency::YearlyInterval),
            _ => Err(ParseRecurrenceFrequencyError(s.to_string())),
        }
    }
}

/// The termination policy of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceEndType {
    /// Single shot: the only occurrence is the start instant.
    #[default]
    Once,
    /// Never ends.
    Never,
    /// Ends on `end_date` (inclusive).
    OnDate,
    /// Ends after `max_occurrences` occurrences.
    AfterOccurrences,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence end type: {0}")]
pub struct ParseRecurrenceEndTypeError(String);

impl RecurrenceEndType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceEndType::Once => "ONCE",
            RecurrenceEndType::Never => "NEVER",
            RecurrenceEndType::OnDate => "ON_DATE",
            RecurrenceEndType::AfterOccurrences => "AFTER_OCCURRENCES",
        }
    }
}

impl fmt::Display for RecurrenceEndType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceEndType {
    type Err = ParseRecurrenceEndTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "ONCE" => Ok(RecurrenceEndType::Once),
            "NEVER" => Ok(RecurrenceEndType::Never),
            "ON_DATE" => Ok(RecurrenceEndType::OnDate),
            "AFTER_OCCURRENCES" => Ok(RecurrenceEndType::AfterOccurrences),
            _ => Err(ParseRecurrenceEndTypeError(s.to_string())),
        }
    }
}

/// An abstract recurrence rule, anchored at `start_date_time`.
///
/// The engine only ever borrows a rule; it is a read-only snapshot for the
/// duration of a call. Fields that do not apply to the rule's frequency are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RecurrenceRuleData")]
pub struct RecurrenceRule {
    pub frequency: RecurrenceFrequency,
    pub end_type: RecurrenceEndType,
    /// Anchor of every calendar grid; no occurrence precedes it.
    pub start_date_time: DateTime<Utc>,
    /// Last instant an `ON_DATE` rule may produce.
    pub end_date: Option<DateTime<Utc>>,
    /// Days, weeks, months or years between occurrences. Absent or 0 means 1.
    pub interval: Option<u32>,
    /// Monday = bit 0 .. Sunday = bit 6. Only used by `WEEKLY_DAYS`.
    pub weekdays_bitmask: Option<u8>,
    /// 1..=31, clamped to shorter months. Only used by `MONTHLY_DAY_OF_MONTH`.
    pub day_of_month: Option<u32>,
    /// 1..=5, or -1 for the last one. Only used by `MONTHLY_WEEKDAYS_OF_MONTH`.
    pub week_of_month: Option<i8>,
    /// Paired with `week_of_month`.
    pub weekday_of_month: Option<Weekday>,
    /// Only used by `AFTER_OCCURRENCES`; always 1 for `ONCE`.
    pub max_occurrences: Option<u32>,
}

/// Wire shape of a [`RecurrenceRule`]. Every field except the frequency and
/// start is optional; `endType` defaults to `ONCE`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRuleData {
    pub frequency: RecurrenceFrequency,
    #[serde(default)]
    pub end_type: RecurrenceEndType,
    pub start_date_time: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Signed on the wire; zero or negative means the default of 1.
    #[serde(default)]
    pub interval: Option<i64>,
    #[serde(default)]
    pub weekdays_bitmask: Option<u8>,
    #[serde(default)]
    pub day_of_month: Option<u32>,
    #[serde(default)]
    pub week_of_month: Option<i8>,
    #[serde(default)]
    pub weekday_of_month: Option<Weekday>,
    #[serde(default)]
    pub max_occurrences: Option<u32>,
}

impl From<RecurrenceRuleData> for RecurrenceRule {
    fn from(data: RecurrenceRuleData) -> Self {
        let rule = RecurrenceRule {
            frequency: data.frequency,
            end_type: data.end_type,
            start_date_time: data.start_date_time,
            end_date: data.end_date,
            interval: data
                .interval
                .filter(|interval| *interval > 0)
                .map(|interval| u32::try_from(interval).unwrap_or(u32::MAX)),
            weekdays_bitmask: data.weekdays_bitmask,
            day_of_month: data.day_of_month,
            week_of_month: data.week_of_month,
            weekday_of_month: data.weekday_of_month,
            max_occurrences: data.max_occurrences,
        };
        rule.with_end_type(data.end_type)
    }
}

impl RecurrenceRule {
    /// Creates a rule with no selectors set.
    ///
    /// A `ONCE` rule gets `max_occurrences = 1`.
    pub fn new(
        frequency: RecurrenceFrequency,
        end_type: RecurrenceEndType,
        start_date_time: DateTime<Utc>,
    ) -> Self {
        Self {
            frequency,
            end_type: RecurrenceEndType::Never,
            start_date_time,
            end_date: None,
            interval: None,
            weekdays_bitmask: None,
            day_of_month: None,
            week_of_month: None,
            weekday_of_month: None,
            max_occurrences: None,
        }
        .with_end_type(end_type)
    }

    pub fn with_end_type(mut self, end_type: RecurrenceEndType) -> Self {
        self.end_type = end_type;
        if end_type == RecurrenceEndType::Once {
            self.max_occurrences = Some(1);
        }
        self
    }

    pub fn with_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_weekdays_bitmask(mut self, mask: u8) -> Self {
        self.weekdays_bitmask = Some(mask);
        self
    }

    pub fn with_weekdays<I>(self, days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        self.with_weekdays_bitmask(encode_weekdays(days))
    }

    pub fn with_day_of_month(mut self, day_of_month: u32) -> Self {
        self.day_of_month = Some(day_of_month);
        self
    }

    /// Selects the `week_of_month`-th `weekday` (or the last one for -1).
    pub fn with_weekday_of_month(mut self, week_of_month: i8, weekday: Weekday) -> Self {
        self.week_of_month = Some(week_of_month);
        self.weekday_of_month = Some(weekday);
        self
    }

    pub fn with_max_occurrences(mut self, max_occurrences: u32) -> Self {
        if self.end_type != RecurrenceEndType::Once {
            self.max_occurrences = Some(max_occurrences);
        }
        self
    }

    /// Interval with the "absent or zero means one" default applied.
    #[inline]
    pub fn effective_interval(&self) -> u32 {
        match self.interval {
            Some(interval) if interval > 0 => interval,
            _ => 1,
        }
    }

    /// Selected weekdays in Monday..Sunday order.
    pub fn weekdays(&self) -> Vec<Weekday> {
        decode_weekdays(self.weekdays_bitmask.unwrap_or(0))
    }

    /// The hard end of the series, if this rule has one.
    #[inline]
    pub fn ends_on(&self) -> Option<DateTime<Utc>> {
        match self.end_type {
            RecurrenceEndType::OnDate => self.end_date,
            _ => None,
        }
    }

    /// Whether the rule repeats at all.
    pub fn is_recurring(&self) -> bool {
        self.frequency != RecurrenceFrequency::None && self.end_type != RecurrenceEndType::Once
    }

    /// Checks the rule for structural problems.
    ///
    /// The engine does not need a validated rule; an invalid one simply never
    /// produces an occurrence. This exists for callers that want to reject
    /// such rules up front.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self.end_type {
            RecurrenceEndType::Once if self.max_occurrences != Some(1) => {
                return Err(CoreError::InvalidRule(
                    "ONCE rules must have exactly one occurrence".to_string(),
                ));
            }
            RecurrenceEndType::OnDate => match self.end_date {
                None => {
                    return Err(CoreError::InvalidRule(
                        "ON_DATE rules require an end date".to_string(),
                    ));
                }
                Some(end) if end < self.start_date_time => {
                    return Err(CoreError::InvalidRule(format!(
                        "end date {} is before the start {}",
                        end.to_rfc3339(),
                        self.start_date_time.to_rfc3339()
                    )));
                }
                Some(_) => {}
            },
            RecurrenceEndType::AfterOccurrences => {
                if self.max_occurrences.unwrap_or(0) == 0 {
                    return Err(CoreError::InvalidRule(
                        "AFTER_OCCURRENCES rules require a positive maximum".to_string(),
                    ));
                }
            }
            _ => {}
        }

        match self.frequency {
            RecurrenceFrequency::WeeklyDays => match self.weekdays_bitmask {
                None | Some(0) => Err(CoreError::InvalidRule(
                    "WEEKLY_DAYS rules require at least one weekday".to_string(),
                )),
                Some(mask) if mask & !ALL_WEEKDAYS_MASK != 0 => Err(CoreError::InvalidRule(
                    format!("weekday bitmask {:#b} has bits above Sunday", mask),
                )),
                Some(_) => Ok(()),
            },
            RecurrenceFrequency::MonthlyDayOfMonth => match self.day_of_month {
                Some(day) if (1..=31).contains(&day) => Ok(()),
                Some(day) => Err(CoreError::InvalidRule(format!(
                    "day of month must be 1..31, got {}",
                    day
                ))),
                None => Err(CoreError::InvalidRule(
                    "MONTHLY_DAY_OF_MONTH rules require a day of month".to_string(),
                )),
            },
            RecurrenceFrequency::MonthlyWeekdaysOfMonth => {
                match self.week_of_month {
                    Some(week) if week == -1 || (1..=5).contains(&week) => {}
                    Some(week) => {
                        return Err(CoreError::InvalidRule(format!(
                            "week of month must be 1..5 or -1, got {}",
                            week
                        )));
                    }
                    None => {
                        return Err(CoreError::InvalidRule(
                            "MONTHLY_WEEKDAYS_OF_MONTH rules require a week of month".to_string(),
                        ));
                    }
                }
                if self.weekday_of_month.is_none() {
                    return Err(CoreError::InvalidRule(
                        "MONTHLY_WEEKDAYS_OF_MONTH rules require a weekday".to_string(),
                    ));
                }
                Ok(())
            }
            RecurrenceFrequency::None
            | RecurrenceFrequency::DailyInterval
            | RecurrenceFrequency::YearlyInterval => Ok(()),
        }
    }
}
