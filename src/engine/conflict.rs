use std::fmt;

use crate::model::*;

/// A rejected candidate together with the assignment it collides with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub candidate: Interval,
    pub existing: Interval,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Employee {} is already assigned to project {} from {}. The new assignment period ({}) overlaps.",
            self.candidate.employee_id, self.candidate.project_id, self.existing.period, self.candidate.period,
        )
    }
}

/// Check `candidate` against intervals already held for the same employee and
/// project. The caller narrows `existing` to that pair; nothing is filtered here.
/// Returns the first overlapping interval in iteration order.
pub fn check_no_overlap<'a>(
    candidate: &Interval,
    existing: impl IntoIterator<Item = &'a Interval>,
) -> Result<(), Conflict> {
    match existing
        .into_iter()
        .find(|iv| iv.period.overlaps(&candidate.period))
    {
        Some(hit) => Err(Conflict {
            candidate: candidate.clone(),
            existing: hit.clone(),
        }),
        None => Ok(()),
    }
}
