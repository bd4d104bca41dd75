use crate::model::*;
use crate::observability::*;

use super::conflict::check_no_overlap;
use super::{Engine, EngineError};

impl Engine {
    /// Check one candidate against what the repository holds for its employee and project.
    pub async fn check_assignment(&self, candidate: &Interval) -> Result<(), EngineError> {
        let existing = self
            .repo
            .fetch_intervals(candidate.employee_id, candidate.project_id)
            .await?;
        check_no_overlap(candidate, &existing)?;
        Ok(())
    }

    /// Save typed intervals as one batch. All-or-nothing: rows are checked in
    /// order, the first conflict rejects the whole batch and nothing is stored.
    /// Returns the number of intervals stored.
    pub async fn save_batch(&self, candidates: Vec<Interval>) -> Result<usize, EngineError> {
        let len = candidates.len();
        let result = self.admit_batch(candidates.into_iter().map(Ok), len).await;
        record_batch(&result);
        result
    }

    /// Same as [`Engine::save_batch`] for rows still in text form. Parse
    /// failures are reported in row order alongside conflicts, so a malformed
    /// row after a conflicting one reports the conflict.
    pub async fn save_raw_batch(&self, rows: &[RawAssignment]) -> Result<usize, EngineError> {
        let candidates = rows.iter().enumerate().map(|(row, raw)| {
            raw.parse().map_err(|e| EngineError::InvalidRecord {
                row,
                field: e.field,
                value: e.value,
            })
        });
        let result = self.admit_batch(candidates, rows.len()).await;
        record_batch(&result);
        result
    }

    async fn admit_batch(
        &self,
        candidates: impl Iterator<Item = Result<Interval, EngineError>>,
        len: usize,
    ) -> Result<usize, EngineError> {
        if len > self.config.max_batch_size {
            return Err(EngineError::LimitExceeded("batch too large"));
        }

        // Lock every (employee, project) the batch touches, in sorted order to
        // prevent deadlocks. Malformed rows hold no lock; they fail in phase 1.
        let candidates: Vec<Result<Interval, EngineError>> = candidates.collect();
        let mut keys: Vec<(EmployeeId, ProjectId)> = candidates
            .iter()
            .flatten()
            .map(|iv| (iv.employee_id, iv.project_id))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.assignee_lock(key).lock_owned().await);
        }

        // Phase 1: validate every row against stored state (+ earlier rows).
        let mut admitted: Vec<Interval> = Vec::with_capacity(len);
        for candidate in candidates {
            let candidate = candidate?;
            self.check_assignment(&candidate).await?;
            if self.config.check_within_batch {
                let earlier = admitted.iter().filter(|iv| iv.same_assignee(&candidate));
                check_no_overlap(&candidate, earlier)?;
            }
            admitted.push(candidate);
        }

        // Phase 2: commit.
        let count = admitted.len();
        if count > 0 {
            self.repo.save_all(admitted).await?;
        }
        Ok(count)
    }
}

fn record_batch(result: &Result<usize, EngineError>) {
    match result {
        Ok(count) => {
            metrics::counter!(BATCHES_TOTAL, "status" => "committed").increment(1);
            metrics::counter!(INTERVALS_SAVED_TOTAL).increment(*count as u64);
            tracing::info!("batch committed: {count} intervals");
        }
        Err(e) => {
            metrics::counter!(BATCHES_TOTAL, "status" => error_label(e)).increment(1);
            if matches!(e, EngineError::Conflict(_)) {
                metrics::counter!(CONFLICTS_TOTAL).increment(1);
            }
            tracing::warn!("batch rejected: {e}");
        }
    }
}
