//! Node representation for the augmented interval red-black tree

use crate::interval::{Bound, Interval};

/// Red-black colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// An index into a [`super::tree::Tree`]'s arena.
///
/// Stable across rotations and deletions of *other* nodes; a `NodeId` whose
/// slot has been freed must never be dereferenced again (the tree never
/// hands one back out once the node behind it is deleted).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(super) usize);

/// One arena-resident tree node.
///
/// `parent`/`left`/`right` are plain `Option<NodeId>` rather than owning
/// pointers: the arena is the sole owner of every node, per the "no
/// `Rc<RefCell<_>>` cycle" design (see crate-level design notes).
pub(crate) struct Node<V, B> {
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) full_interval: Interval<B>,
    pub(crate) time_instants: B,
}

impl<V, B: Bound> Node<V, B> {
    pub(crate) fn new_leaf(value: V, interval: Interval<B>, time_instants: B) -> Self {
        Node {
            value,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
            full_interval: interval,
            time_instants,
        }
    }
}
