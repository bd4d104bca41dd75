mod collaboration;
mod conflict;
mod error;
mod mutations;
mod queries;
mod store;

pub use collaboration::{collaboration_totals, find_longest_collaboration, overlap_days, CollaborationTotals};
pub use conflict::{check_no_overlap, Conflict};
pub use error::EngineError;
pub use store::{InMemoryStore, IntervalRepository};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::model::{EmployeeId, ProjectId};

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Runs batch saves and collaboration queries against an interval repository.
///
/// Intervals live in the repository. The engine only keeps one lock per
/// (employee, project), held by a batch from validation through commit so two
/// concurrent batches for the same assignee cannot both pass the overlap check.
pub struct Engine {
    repo: Arc<dyn IntervalRepository>,
    config: Config,
    locks: DashMap<(EmployeeId, ProjectId), Arc<Mutex<()>>>,
}

impl Engine {
    pub fn new(repo: Arc<dyn IntervalRepository>, config: Config) -> Self {
        Self {
            repo,
            config,
            locks: DashMap::new(),
        }
    }

    /// Engine over a fresh in-memory store with default settings.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()), Config::default())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn assignee_lock(&self, key: (EmployeeId, ProjectId)) -> Arc<Mutex<()>> {
        self.locks.entry(key).or_default().clone()
    }
}
