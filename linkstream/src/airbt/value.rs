//! The payload abstraction shared by the plain tree (C2) and the
//! link-tagged tree (C3).
//!
//! The two tree flavours differ only in what merge-on-insert considers
//! equivalent and in what rides along with the interval; [`TreeValue`]
//! is the customisation point the single [`super::tree::Tree`]
//! implementation is generic over.

use crate::error::IntervalResult;
use crate::interval::{Bound, Interval};
use std::cmp::Ordering;

/// A value that can live in an augmented interval red-black tree.
pub trait TreeValue<B: Bound>: Clone {
    /// The interval this value occupies (used for BST ordering, overlap
    /// search, and the `full_interval`/`time_instants` aggregates).
    fn interval(&self) -> &Interval<B>;

    /// Rebuild this value with a new (merged) interval, keeping whatever
    /// non-interval payload it carries.
    fn with_interval(&self, merged: Interval<B>) -> Self;

    /// Whether `self` and `other` should be fused into one node by
    /// merge-on-insert. For the plain tree this is plain interval overlap;
    /// the link-tagged tree additionally requires equal endpoints.
    fn merge_equivalent(&self, other: &Self) -> bool;

    /// Break ties between values whose intervals compare equal under
    /// [`Interval::order_cmp`]. The default breaks no ties (values with
    /// equal intervals are considered equal for ordering purposes).
    fn tie_break(&self, other: &Self) -> Ordering {
        let _ = other;
        Ordering::Equal
    }

    /// Total order used to place a value in the tree.
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.interval()
            .order_cmp(other.interval())
            .then_with(|| self.tie_break(other))
    }

    /// Merge two merge-equivalent values into one, failing only if their
    /// intervals turn out not to overlap or touch (should not happen for
    /// values merge-on-insert has already judged equivalent).
    fn merge(&self, other: &Self) -> IntervalResult<Self> {
        let merged = self.interval().merge(other.interval())?;
        Ok(self.with_interval(merged))
    }
}

impl<B: Bound> TreeValue<B> for Interval<B> {
    fn interval(&self) -> &Interval<B> {
        self
    }

    fn with_interval(&self, merged: Interval<B>) -> Self {
        merged
    }

    fn merge_equivalent(&self, other: &Self) -> bool {
        self.overlaps(other)
    }
}
