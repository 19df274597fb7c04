//! # Planme Core Library
//!
//! The recurrence occurrence engine behind the Planme task planner. Given an
//! abstract [`RecurrenceRule`](models::RecurrenceRule) and a reference instant,
//! it deterministically computes the future occurrence instants of a
//! repeating task.
//!
//! ## Features
//!
//! - **Five recurrence kinds**: every N days, selected weekdays every N weeks,
//!   a day of the month, the Nth (or last) weekday of the month, and every
//!   N years
//! - **Three termination policies**: never, on a fixed date, after a number
//!   of occurrences (plus single-shot rules)
//! - **UTC calendar math**: month-length clamping, leap-year adjustment and
//!   ISO weekday mapping, with the time of day carried from the rule start
//! - **Bounded search**: every lookup gives up after a fixed safety horizon,
//!   so rules that can never match still terminate
//!
//! ## Core Modules
//!
//! - [`models`]: Recurrence rule and its enums
//! - [`weekdays`]: ISO weekday type and the weekday bitmask codec
//! - [`calendar`]: Shared UTC calendar helpers
//! - [`recurrence`]: Per-frequency next-occurrence functions and the generator
//! - [`planner`]: Time-horizon view on top of the generator
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use planme_core::models::{RecurrenceEndType, RecurrenceFrequency, RecurrenceRule};
//! use planme_core::recurrence::{generate_occurrences, GenerateOptions};
//!
//! let start = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
//! let rule = RecurrenceRule::new(RecurrenceFrequency::DailyInterval, RecurrenceEndType::Never, start)
//!     .with_interval(2);
//!
//! let from = Utc.with_ymd_and_hms(2025, 1, 11, 10, 0, 0).unwrap();
//! let occurrences = generate_occurrences(
//!     &rule,
//!     from,
//!     GenerateOptions { max_to_generate: 3, ..Default::default() },
//! );
//!
//! assert_eq!(occurrences[0], Utc.with_ymd_and_hms(2025, 1, 13, 10, 0, 0).unwrap());
//! assert_eq!(occurrences.len(), 3);
//! ```

pub mod calendar;
pub mod error;
pub mod models;
pub mod planner;
pub mod recurrence;
pub mod weekdays;
