//! A Pareto front of `(metric, arrival)` candidates, sorted ascending by
//! arrival, used by the shortest-path and fastest-path algorithms (§4.9) to
//! maintain, per node, the maximal set of non-dominated candidates.
//!
//! The two algorithms share this structure but disagree on which direction
//! of `metric` is "better": fewer hops is better for shortest path, a later
//! start time is better for fastest path. Callers supply that direction as
//! a `better_or_eq(a, b)` predicate ("is candidate `a`'s metric at least as
//! good as `b`'s") rather than the front picking a fixed comparison.

use crate::interval::{total_cmp, Bound};
use std::cmp::Ordering;

pub(crate) struct ParetoFront<M, B> {
    // sorted ascending by arrival (second element); invariant maintained by
    // `insert` alone.
    entries: Vec<(M, B)>,
}

impl<M: Copy, B: Bound> ParetoFront<M, B> {
    pub(crate) fn new() -> Self {
        ParetoFront { entries: Vec::new() }
    }

    /// Index of the entry with the largest arrival `<= t`, if any.
    fn rightmost_at_or_before(&self, t: B) -> Option<usize> {
        let mut lo = 0usize;
        let mut hi = self.entries.len();
        let mut found = None;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if total_cmp(&self.entries[mid].1, &t) != Ordering::Greater {
                found = Some(mid);
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        found
    }

    /// The candidate with the largest arrival `<= t`, if any. Also discards
    /// every candidate with a smaller arrival: once a query has passed them
    /// by, they can never again be the best choice for a later query (scans
    /// only move forward in time), so keeping them around is pure waste.
    pub(crate) fn best_at_or_before(&mut self, t: B) -> Option<(M, B)> {
        let idx = self.rightmost_at_or_before(t)?;
        if idx > 0 {
            self.entries.drain(0..idx);
        }
        Some(self.entries[0])
    }

    /// Insert `(metric, arrival)`, preserving Pareto optimality: skip it if
    /// an existing candidate with no later arrival is at least as good
    /// (`better_or_eq`), otherwise insert it and drop every later candidate
    /// it now dominates.
    pub(crate) fn insert(&mut self, metric: M, arrival: B, better_or_eq: impl Fn(M, M) -> bool) {
        if let Some(idx) = self.rightmost_at_or_before(arrival) {
            let (existing_metric, existing_arrival) = self.entries[idx];
            if better_or_eq(existing_metric, metric) {
                return;
            }
            if total_cmp(&existing_arrival, &arrival) == Ordering::Equal {
                self.entries.remove(idx);
            }
        }
        let insert_at = self.rightmost_at_or_before(arrival).map(|i| i + 1).unwrap_or(0);
        self.entries.insert(insert_at, (metric, arrival));
        let mut cut = insert_at + 1;
        while cut < self.entries.len() && better_or_eq(metric, self.entries[cut].0) {
            cut += 1;
        }
        self.entries.drain(insert_at + 1..cut);
    }
}
