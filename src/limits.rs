/// Most rows accepted in one batch save.
pub const MAX_BATCH_SIZE: usize = 10_000;

/// Most intervals an in-memory store holds.
pub const MAX_INTERVALS: usize = 1_000_000;
