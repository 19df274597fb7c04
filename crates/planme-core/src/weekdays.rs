use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// ISO day of the week, 1 (Monday) through 7 (Sunday).
///
/// Serialized as its ISO number so stored rules stay compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

/// Single-bit flag for each [`Weekday`], used to build a weekday bitmask.
///
/// Monday is bit 0, Sunday is bit 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WeekdayBit {
    Monday = 1 << 0,
    Tuesday = 1 << 1,
    Wednesday = 1 << 2,
    Thursday = 1 << 3,
    Friday = 1 << 4,
    Saturday = 1 << 5,
    Sunday = 1 << 6,
}

/// Bitmask with every weekday selected.
pub const ALL_WEEKDAYS_MASK: u8 = WeekdayBit::Monday as u8
    | WeekdayBit::Tuesday as u8
    | WeekdayBit::Wednesday as u8
    | WeekdayBit::Thursday as u8
    | WeekdayBit::Friday as u8
    | WeekdayBit::Saturday as u8
    | WeekdayBit::Sunday as u8;

impl Weekday {
    /// All weekdays in Monday..Sunday order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// ISO number of this weekday (1..7).
    #[inline]
    pub fn iso_number(self) -> u8 {
        self as u8
    }

    /// The bitmask flag for this weekday.
    #[inline]
    pub fn bit(self) -> WeekdayBit {
        WeekdayBit::from(self)
    }

    /// Builds a weekday from its ISO number.
    pub fn from_iso(number: u8) -> Result<Self, CoreError> {
        Self::ALL
            .get(usize::from(number).wrapping_sub(1))
            .copied()
            .ok_or(CoreError::InvalidWeekday(i64::from(number)))
    }

    /// English name of the weekday.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl WeekdayBit {
    /// Raw mask value of this flag.
    #[inline]
    pub fn mask(self) -> u8 {
        self as u8
    }
}

impl From<Weekday> for WeekdayBit {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Monday => WeekdayBit::Monday,
            Weekday::Tuesday => WeekdayBit::Tuesday,
            Weekday::Wednesday => WeekdayBit::Wednesday,
            Weekday::Thursday => WeekdayBit::Thursday,
            Weekday::Friday => WeekdayBit::Friday,
            Weekday::Saturday => WeekdayBit::Saturday,
            Weekday::Sunday => WeekdayBit::Sunday,
        }
    }
}

impl From<WeekdayBit> for Weekday {
    fn from(bit: WeekdayBit) -> Self {
        match bit {
            WeekdayBit::Monday => Weekday::Monday,
            WeekdayBit::Tuesday => Weekday::Tuesday,
            WeekdayBit::Wednesday => Weekday::Wednesday,
            WeekdayBit::Thursday => Weekday::Thursday,
            WeekdayBit::Friday => Weekday::Friday,
            WeekdayBit::Saturday => Weekday::Saturday,
            WeekdayBit::Sunday => Weekday::Sunday,
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
            Weekday::Sunday => chrono::Weekday::Sun,
        }
    }
}

impl TryFrom<u8> for Weekday {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Weekday::from_iso(value)
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> Self {
        day.iso_number()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        if let Ok(number) = input.parse::<u8>() {
            return Weekday::from_iso(number);
        }
        match input.as_str() {
            "mon" | "monday" | "m" => Ok(Weekday::Monday),
            "tue" | "tuesday" | "tu" => Ok(Weekday::Tuesday),
            "wed" | "wednesday" | "w" => Ok(Weekday::Wednesday),
            "thu" | "thursday" | "th" => Ok(Weekday::Thursday),
            "fri" | "friday" | "f" => Ok(Weekday::Friday),
            "sat" | "saturday" | "sa" => Ok(Weekday::Saturday),
            "sun" | "sunday" | "su" => Ok(Weekday::Sunday),
            _ => Err(CoreError::InvalidInput(format!("Invalid weekday: '{}'", s))),
        }
    }
}

/// ORs together the bit of every given weekday. An empty set encodes to 0.
///
/// ```
/// use planme_core::weekdays::{encode_weekdays, Weekday};
///
/// let mask = encode_weekdays([Weekday::Monday, Weekday::Wednesday, Weekday::Friday]);
/// assert_eq!(mask, 21);
/// ```
pub fn encode_weekdays<I>(days: I) -> u8
where
    I: IntoIterator<Item = Weekday>,
{
    days.into_iter().fold(0, |mask, day| mask | day.bit().mask())
}

/// Decodes a bitmask into its weekdays, in Monday..Sunday order.
pub fn decode_weekdays(mask: u8) -> Vec<Weekday> {
    Weekday::ALL
        .into_iter()
        .filter(|day| has_weekday(mask, *day))
        .collect()
}

#[inline]
pub fn has_weekday(mask: u8, day: Weekday) -> bool {
    mask & day.bit().mask() != 0
}

/// Converts a Sunday-based day number (0 = Sunday .. 6 = Saturday) to an ISO weekday.
pub fn try_weekday_from_js_day(js_day: i64) -> Result<Weekday, CoreError> {
    if !(0..=6).contains(&js_day) {
        return Err(CoreError::InvalidJsDay(js_day));
    }
    // 0 (Sunday) -> 7, 1 (Monday) -> 1, ..., 6 (Saturday) -> 6
    let iso = ((js_day + 6) % 7) + 1;
    Weekday::from_iso(iso as u8)
}

/// Infallible variant of [`try_weekday_from_js_day`].
///
/// # Panics
///
/// Panics when `js_day` is outside `0..=6`. Callers holding untrusted input
/// should use [`try_weekday_from_js_day`].
pub fn weekday_from_js_day(js_day: i64) -> Weekday {
    match try_weekday_from_js_day(js_day) {
        Ok(day) => day,
        Err(e) => panic!("{}", e),
    }
}

/// UTC day of the week of a date or instant.
pub fn date_to_weekday(date: impl Datelike) -> Weekday {
    weekday_from_js_day(i64::from(date.weekday().num_days_from_sunday()))
}
