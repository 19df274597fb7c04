use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid weekday: {0}. Expected 1..7 (Monday..Sunday)")]
    InvalidWeekday(i64),

    #[error("Invalid JS day: {0}. Expected 0..6")]
    InvalidJsDay(i64),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),
}
