//! Time-bounded occurrence planning.
//!
//! [`generate_occurrences`] bounds its output by count. The planner puts a
//! time window over it, answering "what falls in the next N days", which is
//! what a scheduler needs when a task is created or its last pending
//! occurrence is completed.

use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};

use crate::models::RecurrenceRule;
use crate::recurrence::{generate_occurrences, GenerateOptions};

/// Planner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Window, in days from the reference instant, used by
    /// [`OccurrencePlanner::plan_after_completion`].
    pub horizon_days: u32,
    /// Count cap handed to the generator before the time filter applies.
    pub max_to_generate: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            horizon_days: 1,
            max_to_generate: 1000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OccurrencePlanner {
    config: PlannerConfig,
}

impl OccurrencePlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PlannerConfig::default())
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn update_config(&mut self, config: PlannerConfig) {
        self.config = config;
    }

    /// Occurrences of `rule` after `from_date` and no later than
    /// `from_date + horizon_days` days, in ascending order.
    pub fn generate_initial_occurrences(
        &self,
        rule: &RecurrenceRule,
        from_date: DateTime<Utc>,
        horizon_days: u32,
    ) -> Vec<DateTime<Utc>> {
        let to_date = from_date
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut occurrences = generate_occurrences(
            rule,
            from_date,
            GenerateOptions {
                max_to_generate: self.config.max_to_generate,
                already_generated_count: 0,
            },
        );
        occurrences.retain(|occurrence| *occurrence <= to_date);

        tracing::debug!(
            from = %from_date,
            to = %to_date,
            planned = occurrences.len(),
            "planned occurrences"
        );
        occurrences
    }

    /// First occurrence inside the window, the one to schedule when a task
    /// is created.
    pub fn next_pending_occurrence(
        &self,
        rule: &RecurrenceRule,
        from_date: DateTime<Utc>,
        horizon_days: u32,
    ) -> Option<DateTime<Utc>> {
        self.generate_initial_occurrences(rule, from_date, horizon_days)
            .into_iter()
            .next()
    }

    /// Decides what to schedule once an occurrence has been completed.
    ///
    /// Nothing is planned while any of `pending` is still ahead of `now`.
    /// Otherwise this is the first occurrence within the configured horizon.
    pub fn plan_after_completion(
        &self,
        rule: &RecurrenceRule,
        pending: &[DateTime<Utc>],
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        if pending.iter().any(|occurrence| *occurrence > now) {
            tracing::trace!(pending = pending.len(), "future occurrence still pending");
            return None;
        }
        self.next_pending_occurrence(rule, now, self.config.horizon_days)
    }
}
