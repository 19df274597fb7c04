use chrono::{DateTime, Utc};

use super::Occurrences;
use crate::models::{RecurrenceEndType, RecurrenceFrequency, RecurrenceRule};

/// Bounds of a single [`generate_occurrences`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Most occurrences this call may return.
    pub max_to_generate: usize,
    /// How many occurrences of the rule the caller already holds (for
    /// example, persisted in its history). Counts against an
    /// `AFTER_OCCURRENCES` budget.
    pub already_generated_count: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_to_generate: 1,
            already_generated_count: 0,
        }
    }
}

/// Generates up to `options.max_to_generate` ascending occurrences of `rule`
/// after `from_date`.
///
/// The reference instant is first moved up to the rule start, and every
/// occurrence is strictly after it. As a consequence the start instant
/// itself is never generated here, which is why a `ONCE` rule always yields
/// an empty list; [`next_occurrence`](super::next_occurrence) is the lookup
/// that returns a `ONCE` rule's single instant.
///
/// For `AFTER_OCCURRENCES` rules the call never returns more than
/// `max_occurrences - already_generated_count` occurrences. Generation also
/// stops early at the rule's natural end.
pub fn generate_occurrences(
    rule: &RecurrenceRule,
    from_date: DateTime<Utc>,
    options: GenerateOptions,
) -> Vec<DateTime<Utc>> {
    if rule.frequency == RecurrenceFrequency::None {
        return Vec::new();
    }

    let remaining_by_rule = match (rule.end_type, rule.max_occurrences) {
        (RecurrenceEndType::AfterOccurrences, Some(max)) if max > 0 => {
            let remaining = i64::from(max) - i64::from(options.already_generated_count);
            if remaining <= 0 {
                tracing::debug!(
                    max_occurrences = max,
                    already_generated = options.already_generated_count,
                    "occurrence budget exhausted"
                );
                return Vec::new();
            }
            Some(remaining as usize)
        }
        _ => None,
    };

    let limit = remaining_by_rule.map_or(options.max_to_generate, |remaining| {
        remaining.min(options.max_to_generate)
    });

    let floor = from_date.max(rule.start_date_time);
    let occurrences: Vec<_> = Occurrences::new(rule, floor)
        .take(limit)
        .inspect(|occurrence| {
            tracing::trace!(frequency = %rule.frequency, occurrence = %occurrence, "occurrence generated")
        })
        .collect();

    tracing::trace!(
        frequency = %rule.frequency,
        requested = limit,
        generated = occurrences.len(),
        "generated occurrences"
    );
    occurrences
}
