use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::limits::MAX_INTERVALS;
use crate::model::*;

use super::EngineError;

/// Where admitted intervals live. The engine only talks to storage through this.
#[async_trait]
pub trait IntervalRepository: Send + Sync {
    /// Intervals held by `employee_id` on `project_id`.
    async fn fetch_intervals(
        &self,
        employee_id: EmployeeId,
        project_id: ProjectId,
    ) -> Result<Vec<Interval>, EngineError>;

    /// Every stored interval, oldest first.
    async fn fetch_all_intervals(&self) -> Result<Vec<Interval>, EngineError>;

    /// Store a validated batch. Either every interval is stored or none is.
    async fn save_all(&self, intervals: Vec<Interval>) -> Result<(), EngineError>;
}

pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    /// All intervals in insertion order.
    intervals: Vec<Interval>,
    /// (employee, project) → positions in `intervals`.
    by_assignee: HashMap<(EmployeeId, ProjectId), Vec<usize>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.intervals.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.intervals.is_empty()
    }
}

#[async_trait]
impl IntervalRepository for InMemoryStore {
    async fn fetch_intervals(
        &self,
        employee_id: EmployeeId,
        project_id: ProjectId,
    ) -> Result<Vec<Interval>, EngineError> {
        let guard = self.inner.read().await;
        let hits = guard
            .by_assignee
            .get(&(employee_id, project_id))
            .map(|positions| positions.iter().map(|&pos| guard.intervals[pos].clone()).collect())
            .unwrap_or_default();
        Ok(hits)
    }

    async fn fetch_all_intervals(&self) -> Result<Vec<Interval>, EngineError> {
        Ok(self.inner.read().await.intervals.clone())
    }

    async fn save_all(&self, intervals: Vec<Interval>) -> Result<(), EngineError> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        if inner.intervals.len() + intervals.len() > MAX_INTERVALS {
            return Err(EngineError::LimitExceeded("too many intervals in store"));
        }
        for interval in intervals {
            inner
                .by_assignee
                .entry((interval.employee_id, interval.project_id))
                .or_default()
                .push(inner.intervals.len());
            inner.intervals.push(interval);
        }
        Ok(())
    }
}
