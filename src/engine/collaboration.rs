use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::config::SelfPairs;
use crate::model::*;

/// Overlap days per employee pair, kept in the order pairs were first seen.
#[derive(Debug, Clone, Default)]
pub struct CollaborationTotals {
    entries: Vec<(PairKey, u64)>,
    index: HashMap<PairKey, usize>,
}

impl CollaborationTotals {
    pub fn add(&mut self, pair: PairKey, days: u64) {
        match self.index.get(&pair) {
            Some(&pos) => self.entries[pos].1 += days,
            None => {
                self.index.insert(pair, self.entries.len());
                self.entries.push((pair, days));
            }
        }
    }

    pub fn get(&self, pair: &PairKey) -> Option<u64> {
        self.index.get(pair).map(|&pos| self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PairKey, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// Pair with the highest total. On a tie the pair seen first wins.
    /// `None` when no pair has a positive total.
    pub fn longest(&self) -> Option<CollaborationResult> {
        let mut best: Option<(PairKey, u64)> = None;
        for &(pair, days) in &self.entries {
            if best.is_none_or(|(_, max)| days > max) {
                best = Some((pair, days));
            }
        }
        best.filter(|&(_, days)| days > 0)
            .map(|(pair, days)| CollaborationResult::new(pair, days))
    }
}

/// Days two periods ran together, open ends clamped to `now`. The millisecond
/// distance between the shared start and end is rounded up to whole days, so a
/// shared single instant counts as 0. `None` when the periods never meet.
pub fn overlap_days(a: &Period, b: &Period, now: DateTime<Utc>) -> Option<u64> {
    let start = start_of_day(a.from.max(b.from));
    let end = a.to.resolve(now).min(b.to.resolve(now));
    if start > end {
        return None;
    }
    let ms = (end - start).num_milliseconds();
    Some(((ms + MS_PER_DAY - 1) / MS_PER_DAY) as u64)
}

/// Sum overlap days for every pair of records sharing a project.
///
/// Projects are visited in ascending id; records inside a project keep input order.
/// That order decides which pair wins a tie in [`CollaborationTotals::longest`].
pub fn collaboration_totals(
    intervals: &[Interval],
    now: DateTime<Utc>,
    self_pairs: SelfPairs,
) -> CollaborationTotals {
    let mut by_project: BTreeMap<ProjectId, Vec<&Interval>> = BTreeMap::new();
    for interval in intervals {
        by_project.entry(interval.project_id).or_default().push(interval);
    }

    let mut totals = CollaborationTotals::default();
    for group in by_project.values() {
        for i in 0..group.len() {
            for j in (i + 1)..group.len() {
                let (a, b) = (group[i], group[j]);
                let pair = PairKey::new(a.employee_id, b.employee_id);
                if self_pairs == SelfPairs::Exclude && pair.is_self_pair() {
                    continue;
                }
                if let Some(days) = overlap_days(&a.period, &b.period, now) {
                    totals.add(pair, days);
                }
            }
        }
    }
    totals
}

pub fn find_longest_collaboration(
    intervals: &[Interval],
    now: DateTime<Utc>,
    self_pairs: SelfPairs,
) -> Option<CollaborationResult> {
    collaboration_totals(intervals, now, self_pairs).longest()
}
