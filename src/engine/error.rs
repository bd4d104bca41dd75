use super::conflict::Conflict;

#[derive(Debug)]
pub enum EngineError {
    /// A candidate overlaps an assignment the same employee already holds on the project.
    Conflict(Box<Conflict>),
    /// Row `row` of a batch has a field that could not be parsed.
    InvalidRecord {
        row: usize,
        field: &'static str,
        value: String,
    },
    LimitExceeded(&'static str),
    /// The interval source failed; the message is passed through unchanged.
    Source(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Conflict(conflict) => write!(f, "{conflict}"),
            EngineError::InvalidRecord { row, field, value } => {
                write!(f, "row {row}: invalid {field}: {value:?}")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Source(e) => write!(f, "interval source error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<Conflict> for EngineError {
    fn from(conflict: Conflict) -> Self {
        EngineError::Conflict(Box::new(conflict))
    }
}
