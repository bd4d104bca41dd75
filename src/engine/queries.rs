use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::model::*;
use crate::observability::*;

use super::collaboration::{collaboration_totals, CollaborationTotals};
use super::{now, Engine, EngineError};

impl Engine {
    /// Every stored assignment, oldest first.
    pub async fn assignments(&self) -> Result<Vec<Interval>, EngineError> {
        self.repo.fetch_all_intervals().await
    }

    pub async fn collaboration_totals(&self) -> Result<CollaborationTotals, EngineError> {
        self.collaboration_totals_at(now()).await
    }

    /// Overlap days for every pair, with open-ended assignments clamped to `now`.
    pub async fn collaboration_totals_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<CollaborationTotals, EngineError> {
        let intervals = self.repo.fetch_all_intervals().await?;
        Ok(collaboration_totals(&intervals, now, self.config.self_pairs))
    }

    pub async fn longest_collaboration(&self) -> Result<Option<CollaborationResult>, EngineError> {
        self.longest_collaboration_at(now()).await
    }

    /// Pair of employees with the most days worked together across shared
    /// projects. `Ok(None)` when no assignments ever overlapped.
    pub async fn longest_collaboration_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<CollaborationResult>, EngineError> {
        let started = Instant::now();
        let intervals = self.repo.fetch_all_intervals().await?;
        let result = collaboration_totals(&intervals, now, self.config.self_pairs).longest();

        metrics::histogram!(COLLABORATION_QUERY_INTERVALS).record(intervals.len() as f64);
        metrics::histogram!(COLLABORATION_QUERY_SECONDS).record(started.elapsed().as_secs_f64());
        match &result {
            Some(r) => tracing::debug!(
                "longest collaboration: {} and {} for {} days",
                r.employee_id1,
                r.employee_id2,
                r.days_worked_together
            ),
            None => tracing::debug!("no overlapping work periods found"),
        }
        Ok(result)
    }
}
