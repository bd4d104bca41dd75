use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub type EmployeeId = i64;
pub type ProjectId = i64;

pub const MS_PER_DAY: i64 = 86_400_000;

/// Token the ingestion adapter uses for an assignment with no end date.
pub const OPEN_END_TOKEN: &str = "undefined";

/// Calendar dates are treated as midnight UTC instants.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// End of an assignment period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum End {
    /// Last day of the assignment.
    Until(NaiveDate),
    /// No end date: still active today and open into the future.
    Ongoing,
}

impl End {
    /// True if this end lies strictly after `day`. An open end is after every day.
    pub fn is_after(&self, day: NaiveDate) -> bool {
        match self {
            End::Until(d) => *d > day,
            End::Ongoing => true,
        }
    }

    /// Instant this end stands for when counting days. Open ends clamp to `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            End::Until(d) => start_of_day(*d),
            End::Ongoing => now,
        }
    }
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            End::Until(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            End::Ongoing => f.write_str("ongoing"),
        }
    }
}

/// Closed day range `[from, to]`, possibly open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodFields")]
pub struct Period {
    pub from: NaiveDate,
    pub to: End,
}

/// Unchecked shape of a serialized [`Period`].
#[derive(Deserialize)]
struct PeriodFields {
    from: NaiveDate,
    to: End,
}

impl TryFrom<PeriodFields> for Period {
    type Error = &'static str;

    fn try_from(fields: PeriodFields) -> Result<Self, Self::Error> {
        if let End::Until(end) = fields.to
            && end < fields.from
        {
            return Err("period ends before it starts");
        }
        Ok(Self {
            from: fields.from,
            to: fields.to,
        })
    }
}

impl Period {
    pub fn new(from: NaiveDate, to: End) -> Self {
        if let End::Until(d) = to {
            debug_assert!(from <= d, "Period start must not be after its end");
        }
        Self { from, to }
    }

    pub fn ongoing(from: NaiveDate) -> Self {
        Self {
            from,
            to: End::Ongoing,
        }
    }

    pub fn is_ongoing(&self) -> bool {
        matches!(self.to, End::Ongoing)
    }

    /// Two periods overlap when they share a day other than the single day where
    /// one ends and the other starts. Periods starting on the same day always overlap.
    pub fn overlaps(&self, other: &Period) -> bool {
        if self.from == other.from {
            return true;
        }
        let (earlier, later) = if self.from < other.from {
            (self, other)
        } else {
            (other, self)
        };
        earlier.to.is_after(later.from)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from.format("%Y-%m-%d"), self.to)
    }
}

/// One employee's assignment to one project over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub employee_id: EmployeeId,
    pub project_id: ProjectId,
    pub period: Period,
}

impl Interval {
    pub fn new(employee_id: EmployeeId, project_id: ProjectId, from: NaiveDate, to: End) -> Self {
        Self {
            employee_id,
            project_id,
            period: Period::new(from, to),
        }
    }

    pub fn same_assignee(&self, other: &Interval) -> bool {
        self.employee_id == other.employee_id && self.project_id == other.project_id
    }
}

/// Unordered pair of employees, stored smaller id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    low: EmployeeId,
    high: EmployeeId,
}

impl PairKey {
    pub fn new(a: EmployeeId, b: EmployeeId) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn low(&self) -> EmployeeId {
        self.low
    }

    pub fn high(&self) -> EmployeeId {
        self.high
    }

    pub fn is_self_pair(&self) -> bool {
        self.low == self.high
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationResult {
    pub employee_id1: EmployeeId,
    pub employee_id2: EmployeeId,
    pub days_worked_together: u64,
}

impl CollaborationResult {
    pub fn new(pair: PairKey, days: u64) -> Self {
        Self {
            employee_id1: pair.low(),
            employee_id2: pair.high(),
            days_worked_together: days,
        }
    }
}

// ── Ingestion records ────────────────────────────────────────────

/// Assignment row as handed over by the ingestion adapter, all fields still text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAssignment {
    pub employee_id: String,
    pub project_id: String,
    pub date_from: String,
    pub date_to: String,
}

/// A raw field that could not be turned into its typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    pub field: &'static str,
    pub value: String,
}

impl RawAssignment {
    pub fn new(employee_id: &str, project_id: &str, date_from: &str, date_to: &str) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            project_id: project_id.to_string(),
            date_from: date_from.to_string(),
            date_to: date_to.to_string(),
        }
    }

    pub fn parse(&self) -> Result<Interval, InvalidField> {
        let employee_id = parse_id("employeeId", &self.employee_id)?;
        let project_id = parse_id("projectId", &self.project_id)?;
        let from = parse_date("dateFrom", &self.date_from)?;
        let to = parse_end(&self.date_to)?;
        if let End::Until(end) = to
            && end < from {
                return Err(InvalidField {
                    field: "dateTo",
                    value: self.date_to.clone(),
                });
            }
        Ok(Interval::new(employee_id, project_id, from, to))
    }
}

fn parse_id(field: &'static str, raw: &str) -> Result<i64, InvalidField> {
    raw.trim().parse().map_err(|_| InvalidField {
        field,
        value: raw.to_string(),
    })
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, InvalidField> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| InvalidField {
        field,
        value: raw.to_string(),
    })
}

fn parse_end(raw: &str) -> Result<End, InvalidField> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == OPEN_END_TOKEN || trimmed.eq_ignore_ascii_case("null") {
        return Ok(End::Ongoing);
    }
    parse_date("dateTo", raw).map(End::Until)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn period(from: &str, to: &str) -> Period {
        Period::new(d(from), End::Until(d(to)))
    }

    #[test]
    fn period_overlap() {
        let a = period("2025-01-01", "2025-02-15");
        let b = period("2025-02-01", "2025-03-01");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn back_to_back_not_overlapping() {
        let a = period("2025-01-01", "2025-02-01");
        let b = period("2025-02-01", "2025-03-01");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn gap_not_overlapping() {
        let a = period("2025-01-01", "2025-02-01");
        let b = period("2025-03-01", "2025-04-01");
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn containment_overlaps_both_ways() {
        let outer = period("2025-01-01", "2025-03-01");
        let inner = period("2025-01-15", "2025-02-15");
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn single_day_inside_range_overlaps() {
        let range = period("2025-01-01", "2025-03-01");
        let day = period("2025-02-01", "2025-02-01");
        assert!(range.overlaps(&day));
        assert!(day.overlaps(&range));
    }

    #[test]
    fn same_start_always_overlaps() {
        let a = period("2025-02-01", "2025-02-01");
        let b = period("2025-02-01", "2025-02-01");
        assert!(a.overlaps(&b));
    }

    #[test]
    fn ongoing_overlaps_everything_later() {
        let open = Period::ongoing(d("2025-01-01"));
        assert!(open.overlaps(&period("2030-01-01", "2030-02-01")));
        assert!(open.overlaps(&Period::ongoing(d("2020-01-01"))));
        // Ends exactly where the open period starts
        assert!(!open.overlaps(&period("2024-12-01", "2025-01-01")));
    }

    #[test]
    fn pair_key_is_unordered() {
        assert_eq!(PairKey::new(7, 3), PairKey::new(3, 7));
        let key = PairKey::new(9, 2);
        assert_eq!(key.low(), 2);
        assert_eq!(key.high(), 9);
        assert_eq!(key.to_string(), "2-9");
        assert!(PairKey::new(4, 4).is_self_pair());
    }

    #[test]
    fn end_display() {
        assert_eq!(End::Until(d("2025-03-09")).to_string(), "2025-03-09");
        assert_eq!(End::Ongoing.to_string(), "ongoing");
        assert_eq!(period("2025-01-01", "2025-02-01").to_string(), "2025-01-01 to 2025-02-01");
    }

    #[test]
    fn end_resolves_open_to_now() {
        let now = start_of_day(d("2026-01-01"));
        assert_eq!(End::Ongoing.resolve(now), now);
        assert_eq!(End::Until(d("2025-01-01")).resolve(now), start_of_day(d("2025-01-01")));
    }

    #[test]
    fn raw_assignment_parses() {
        let iv = RawAssignment::new(" 143", "12 ", "2013-11-01", "2014-01-05").parse().unwrap();
        assert_eq!(iv.employee_id, 143);
        assert_eq!(iv.project_id, 12);
        assert_eq!(iv.period, period("2013-11-01", "2014-01-05"));
    }

    #[test]
    fn raw_assignment_open_end_tokens() {
        for token in ["undefined", "", "NULL", "null"] {
            let iv = RawAssignment::new("1", "1", "2025-01-01", token).parse().unwrap();
            assert!(iv.period.is_ongoing(), "token {token:?}");
        }
    }

    #[test]
    fn raw_assignment_rejects_bad_fields() {
        let err = RawAssignment::new("x1", "1", "2025-01-01", "undefined").parse().unwrap_err();
        assert_eq!(err.field, "employeeId");

        let err = RawAssignment::new("1", "1", "01/02/2025", "undefined").parse().unwrap_err();
        assert_eq!(err.field, "dateFrom");
        assert_eq!(err.value, "01/02/2025");

        let err = RawAssignment::new("1", "1", "2025-02-01", "2025-01-01").parse().unwrap_err();
        assert_eq!(err.field, "dateTo");
    }

    #[test]
    fn deserialized_period_keeps_start_before_end() {
        let iv: Interval = serde_json::from_value(serde_json::json!({
            "employee_id": 1,
            "project_id": 2,
            "period": {"from": "2025-01-01", "to": {"Until": "2025-02-01"}}
        }))
        .unwrap();
        assert_eq!(iv.period, period("2025-01-01", "2025-02-01"));

        let open: Period =
            serde_json::from_value(serde_json::json!({"from": "2025-01-01", "to": "Ongoing"})).unwrap();
        assert!(open.is_ongoing());

        let inverted = serde_json::from_value::<Interval>(serde_json::json!({
            "employee_id": 1,
            "project_id": 2,
            "period": {"from": "2025-02-01", "to": {"Until": "2025-01-01"}}
        }));
        let err = inverted.unwrap_err();
        assert!(err.to_string().contains("period ends before it starts"), "{err}");
    }

    #[test]
    fn collaboration_result_wire_shape() {
        let result = CollaborationResult::new(PairKey::new(2, 1), 17);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"employeeId1": 1, "employeeId2": 2, "daysWorkedTogether": 17})
        );
    }
}
