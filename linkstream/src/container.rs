//! Per-node and per-edge interval containers (C4).
//!
//! Both containers are thin facades over a plain [`Tree`]: they check a
//! link's endpoints against a fixed condition and, if it matches, forward
//! the link's interval to the tree. The two node identifiers' equality and
//! canonical-order discipline are handled one level up in [`crate::link`]:
//! a container just compares whatever endpoints it is given against the
//! endpoints it was built with.

use crate::airbt::Tree;
use crate::error::StreamResult;
use crate::interval::{Bound, Interval};

/// The interval container for a single node: tracks the union of every
/// link interval touching that node.
pub struct NodeContainer<N, B> {
    node: N,
    tree: Tree<Interval<B>, B>,
}

impl<N: PartialEq, B: Bound> NodeContainer<N, B> {
    pub fn new(node: N, instant_duration: B) -> Self {
        NodeContainer {
            node,
            tree: Tree::new(instant_duration),
        }
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    /// Accepts the link's interval iff `u` or `v` is this container's node.
    /// Returns whether it was accepted.
    pub fn add(&mut self, interval: &Interval<B>, u: &N, v: &N) -> StreamResult<bool> {
        if *u == self.node || *v == self.node {
            self.tree.add(*interval)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn length(&self) -> B {
        self.tree.length()
    }

    pub fn full_interval(&self) -> Option<Interval<B>> {
        self.tree.full_interval()
    }

    /// Disjoint intervals of presence, in time order.
    pub fn iter(&self) -> impl Iterator<Item = &Interval<B>> {
        self.tree.iter()
    }

    /// Whether this node's presence overlaps `interval` (in particular, a
    /// doubly-closed zero-length interval tests presence at a single
    /// instant; see `LinkStream::nodes_present_at`).
    pub fn overlaps(&self, interval: &Interval<B>) -> bool {
        self.tree.overlaps_any(interval)
    }
}

/// The interval container for a single edge `(u, v)`: tracks the union of
/// every link interval between those two endpoints.
///
/// `directed` controls only the match discipline: an undirected container
/// is constructed with its endpoints already canonically ordered (by the
/// caller, see [`crate::link::Link::new`]) and matches incoming links
/// exactly as given (they arrive pre-canonicalised too); a directed
/// container matches `u`/`v` as source/target, with no reordering.
pub struct EdgeContainer<N, B> {
    u: N,
    v: N,
    tree: Tree<Interval<B>, B>,
}

impl<N: PartialEq + Clone, B: Bound> EdgeContainer<N, B> {
    pub fn new(u: N, v: N, instant_duration: B) -> Self {
        EdgeContainer {
            u,
            v,
            tree: Tree::new(instant_duration),
        }
    }

    pub fn u(&self) -> &N {
        &self.u
    }

    pub fn v(&self) -> &N {
        &self.v
    }

    pub fn add(&mut self, interval: &Interval<B>, u: &N, v: &N) -> StreamResult<bool> {
        if *u == self.u && *v == self.v {
            self.tree.add(*interval)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn length(&self) -> B {
        self.tree.length()
    }

    pub fn full_interval(&self) -> Option<Interval<B>> {
        self.tree.full_interval()
    }

    /// `(interval, u, v)` triples in time order; the caller wraps these
    /// back into a `Link` or `DiLink` once it knows the stream's
    /// directedness (see `stream.rs`).
    pub fn iter(&self) -> impl Iterator<Item = (Interval<B>, N, N)> + '_ {
        let u = self.u.clone();
        let v = self.v.clone();
        self.tree.iter().map(move |i| (*i, u.clone(), v.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn node_container_accepts_either_endpoint() {
        let mut c = NodeContainer::new("a", 1.0);
        let i = Interval::right_open(0.0, 1.0).unwrap();
        assert!(c.add(&i, &"a", &"b").unwrap());
        assert!(c.add(&i, &"b", &"a").unwrap());
        assert!(!c.add(&i, &"b", &"c").unwrap());
        assert_eq!(c.length(), 1.0);
    }

    #[test]
    fn node_container_overlaps_tests_presence_at_an_instant() {
        let mut c = NodeContainer::new("a", 1.0);
        c.add(&Interval::right_open(0.0, 2.0).unwrap(), &"a", &"b").unwrap();
        let instant = Interval::closed(1.0, 1.0).unwrap();
        assert!(c.overlaps(&instant));
        let miss = Interval::closed(5.0, 5.0).unwrap();
        assert!(!c.overlaps(&miss));
    }

    #[test]
    fn edge_container_requires_exact_match() {
        let mut c = EdgeContainer::new("a", "b", 1.0);
        let i = Interval::right_open(0.0, 1.0).unwrap();
        assert!(c.add(&i, &"a", &"b").unwrap());
        assert!(!c.add(&i, &"b", &"a").unwrap());
        assert_eq!(c.length(), 1.0);
    }
}
