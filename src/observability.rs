// Metric names emitted through the `metrics` facade. Installing a recorder is
// left to the embedding application.

use crate::engine::EngineError;

/// Counter: batch saves. Labels: status (`committed`, `conflict`, `invalid`, `limit`, `error`).
pub const BATCHES_TOTAL: &str = "pairwork_batches_total";

/// Counter: intervals committed to the store.
pub const INTERVALS_SAVED_TOTAL: &str = "pairwork_intervals_saved_total";

/// Counter: candidates rejected for overlapping an existing assignment.
pub const CONFLICTS_TOTAL: &str = "pairwork_conflicts_total";

/// Histogram: longest-collaboration query latency in seconds.
pub const COLLABORATION_QUERY_SECONDS: &str = "pairwork_collaboration_query_seconds";

/// Histogram: intervals scanned per collaboration query.
pub const COLLABORATION_QUERY_INTERVALS: &str = "pairwork_collaboration_query_intervals";

/// Map a failed batch to its `status` label.
pub fn error_label(err: &EngineError) -> &'static str {
    match err {
        EngineError::Conflict(_) => "conflict",
        EngineError::InvalidRecord { .. } => "invalid",
        EngineError::LimitExceeded(_) => "limit",
        EngineError::Source(_) => "error",
    }
}
