use crate::limits::MAX_BATCH_SIZE;

/// How two records of the same employee on one project are treated when pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfPairs {
    /// Pair them like any other two records; the overlap lands on key `(e, e)`.
    #[default]
    Include,
    /// Skip them.
    Exclude,
}

impl SelfPairs {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "include" => Some(SelfPairs::Include),
            "exclude" => Some(SelfPairs::Exclude),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub max_batch_size: usize,
    pub self_pairs: SelfPairs,
    /// Earlier rows of a batch count as existing assignments for later rows.
    /// Off by default, so one upload may carry rows for the same employee and
    /// project that overlap each other; each row is checked against stored
    /// assignments only.
    pub check_within_batch: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_batch_size: MAX_BATCH_SIZE,
            self_pairs: SelfPairs::Include,
            check_within_batch: false,
        }
    }
}

impl Config {
    /// Read overrides from `PAIRWORK_*` environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let max_batch_size = lookup("PAIRWORK_MAX_BATCH_SIZE")
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.max_batch_size);
        let self_pairs = lookup("PAIRWORK_SELF_PAIRS")
            .and_then(|s| SelfPairs::parse(&s))
            .unwrap_or(defaults.self_pairs);
        let check_within_batch = lookup("PAIRWORK_CHECK_WITHIN_BATCH")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.check_within_batch);
        Self {
            max_batch_size,
            self_pairs,
            check_within_batch,
        }
    }
}
