//! The augmented interval red-black tree (C2/C3).
//!
//! A single generic implementation serves both tree flavours: the plain
//! tree (payload = bare [`crate::interval::Interval`]) and the link-tagged
//! tree (payload = interval + endpoints, see [`crate::link`]). The two
//! differ only through [`TreeValue`]. Nodes live in a `Vec`-backed arena
//! addressed by [`NodeId`] rather than `Rc<RefCell<_>>`, so parent/child
//! links are plain indices and there is no reference-counting cycle to
//! break on drop.

use super::node::{Color, Node};
pub use super::node::NodeId;
use super::value::TreeValue;
use crate::error::AirbtResult;
use crate::interval::{Bound, Interval};

enum Slot<V, B> {
    Occupied(Node<V, B>),
    Free(Option<usize>),
}

/// An augmented interval red-black tree over values `V` whose bounds are
/// drawn from domain `B`.
pub struct Tree<V, B> {
    slots: Vec<Slot<V, B>>,
    free_head: Option<usize>,
    root: Option<NodeId>,
    instant_duration: B,
}

impl<V: TreeValue<B>, B: Bound> Tree<V, B> {
    /// A new, empty tree. `instant_duration` is the minimum contribution a
    /// zero-length (or very short) interval makes to `time_instants`.
    pub fn new(instant_duration: B) -> Self {
        Tree {
            slots: Vec::new(),
            free_head: None,
            root: None,
            instant_duration,
        }
    }

    /// `time_instants` of the root, or the identity element for an empty
    /// tree.
    pub fn length(&self) -> B {
        match self.root {
            Some(r) => self.node(r).time_instants,
            None => self.instant_duration_zero(),
        }
    }

    fn instant_duration_zero(&self) -> B {
        // the additive identity for B; B::default() is required to behave
        // as such by the Bound contract (see crate::interval).
        B::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The bounding interval of the whole tree, if non-empty.
    pub fn full_interval(&self) -> Option<Interval<B>> {
        self.root.map(|r| self.node(r).full_interval)
    }

    /// Insert `value`, fusing it with every node merge-on-insert considers
    /// equivalent to it.
    pub fn add(&mut self, value: V) -> AirbtResult<()> {
        let mut current = value;
        while let Some(overlap) = self.find_overlap(&current) {
            let removed = self.delete(overlap);
            current = current.merge(&removed)?;
        }
        let interval = *current.interval();
        let time_instants = self.length_of(&interval);
        let new_id = self.alloc(Node::new_leaf(current, interval, time_instants));

        match self.root {
            None => self.root = Some(new_id),
            Some(root) => self.insert_bst(root, new_id),
        }

        self.propagate_time_instants_add(new_id, time_instants);
        self.propagate_full_interval(new_id);
        self.insert_fixup(new_id);
        Ok(())
    }

    /// Every value whose interval overlaps `interval`, in ascending order.
    pub fn overlaps(&self, interval: &Interval<B>) -> Vec<&V> {
        let mut out = Vec::new();
        self.collect_overlaps(self.root, interval, &mut out);
        out
    }

    /// Whether any value's interval overlaps `interval`; short-circuits on
    /// the first match rather than collecting every hit (used by
    /// `TimeFilter::accepts`, which only needs a boolean).
    pub fn overlaps_any(&self, interval: &Interval<B>) -> bool {
        self.find_any_overlap(self.root, interval)
    }

    fn find_any_overlap(&self, subtree: Option<NodeId>, interval: &Interval<B>) -> bool {
        let Some(id) = subtree else { return false };
        let node = self.node(id);
        if !node.full_interval.overlaps(interval) {
            return false;
        }
        if node.value.interval().overlaps(interval) {
            return true;
        }
        self.find_any_overlap(node.left, interval) || self.find_any_overlap(node.right, interval)
    }

    /// Lazy in-order iteration over the tree's values.
    pub fn iter(&self) -> InOrder<'_, V, B> {
        InOrder {
            tree: self,
            stack: Vec::new(),
            current: self.root,
        }
    }

    /// Lazy in-order iteration, pruning any subtree whose `full_interval`
    /// does not satisfy `accept`, and skipping (without pruning its
    /// children) any visited value that itself does not satisfy `accept`.
    /// This is the traversal [`crate::filter::TimeFilter`]-driven slicing
    /// uses: the same `accept` predicate decides both which subtrees are
    /// worth descending into and which values are kept.
    pub fn time_filtered<F>(&self, accept: F) -> PrunedInOrder<'_, V, B, F>
    where
        F: Fn(&Interval<B>) -> bool,
    {
        PrunedInOrder {
            tree: self,
            accept,
            stack: self.root.map(|r| vec![PrunedFrame::Enter(r)]).unwrap_or_default(),
        }
    }

    // ---- arena ----------------------------------------------------

    fn alloc(&mut self, node: Node<V, B>) -> NodeId {
        match self.free_head {
            Some(idx) => {
                self.free_head = match &self.slots[idx] {
                    Slot::Free(next) => *next,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                };
                self.slots[idx] = Slot::Occupied(node);
                NodeId(idx)
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    fn dealloc(&mut self, id: NodeId) -> Node<V, B> {
        let slot = std::mem::replace(&mut self.slots[id.0], Slot::Free(self.free_head));
        self.free_head = Some(id.0);
        match slot {
            Slot::Occupied(node) => node,
            Slot::Free(_) => unreachable!("double free of an arena slot"),
        }
    }

    fn node(&self, id: NodeId) -> &Node<V, B> {
        match &self.slots[id.0] {
            Slot::Occupied(n) => n,
            Slot::Free(_) => unreachable!("dangling NodeId into a free slot"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<V, B> {
        match &mut self.slots[id.0] {
            Slot::Occupied(n) => n,
            Slot::Free(_) => unreachable!("dangling NodeId into a free slot"),
        }
    }

    // ---- aggregate bookkeeping -------------------------------------

    fn length_of(&self, interval: &Interval<B>) -> B {
        let len = interval.length();
        if len.is_gt(self.instant_duration) {
            len
        } else {
            self.instant_duration
        }
    }

    fn own_length(&self, id: NodeId) -> B {
        self.length_of(self.node(id).value.interval())
    }

    fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map(|i| self.node(i).color).unwrap_or(Color::Black)
    }

    fn is_left_child(&self, id: NodeId) -> bool {
        match self.node(id).parent {
            Some(pid) => self.node(pid).left == Some(id),
            None => false,
        }
    }

    fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let pid = self.node(id).parent?;
        if self.is_left_child(id) {
            self.node(pid).right
        } else {
            self.node(pid).left
        }
    }

    /// Add `delta` to `time_instants` of every ancestor of `id` (not `id`
    /// itself).
    fn propagate_time_instants_add(&mut self, id: NodeId, delta: B) {
        let mut cur = self.node(id).parent;
        while let Some(pid) = cur {
            let updated = self.node(pid).time_instants + delta;
            self.node_mut(pid).time_instants = updated;
            cur = self.node(pid).parent;
        }
    }

    fn propagate_time_instants_sub(&mut self, id: NodeId, delta: B) {
        let mut cur = self.node(id).parent;
        while let Some(pid) = cur {
            let updated = self.node(pid).time_instants - delta;
            self.node_mut(pid).time_instants = updated;
            cur = self.node(pid).parent;
        }
    }

    /// Recompute `full_interval` of every ancestor of `id` from its
    /// current children, bottom-up (not `id` itself).
    fn propagate_full_interval(&mut self, id: NodeId) {
        let mut cur = self.node(id).parent;
        while let Some(pid) = cur {
            self.recompute_full_interval(pid);
            cur = self.node(pid).parent;
        }
    }

    fn recompute_full_interval(&mut self, id: NodeId) {
        let mut acc = *self.node(id).value.interval();
        if let Some(l) = self.node(id).left {
            acc = Interval::envelope(&acc, &self.node(l).full_interval);
        }
        if let Some(r) = self.node(id).right {
            acc = Interval::envelope(&acc, &self.node(r).full_interval);
        }
        self.node_mut(id).full_interval = acc;
    }

    fn recompute_time_instants(&mut self, id: NodeId) {
        let mut total = self.own_length(id);
        if let Some(l) = self.node(id).left {
            total = total + self.node(l).time_instants;
        }
        if let Some(r) = self.node(id).right {
            total = total + self.node(r).time_instants;
        }
        self.node_mut(id).time_instants = total;
    }

    /// Full recompute of both aggregates from `id`'s current children; used
    /// after rotations and after a successor takes over a deleted node's
    /// position, where the children set changed all at once.
    fn recompute_data(&mut self, id: NodeId) {
        self.recompute_full_interval(id);
        self.recompute_time_instants(id);
    }

    // ---- search -----------------------------------------------------

    fn find_overlap(&self, value: &V) -> Option<NodeId> {
        self.find_overlap_in_subtree(self.root, value)
    }

    fn find_overlap_in_subtree(&self, subtree: Option<NodeId>, value: &V) -> Option<NodeId> {
        let id = subtree?;
        let node = self.node(id);
        if !node.full_interval.overlaps(value.interval()) {
            return None;
        }
        if node.value.merge_equivalent(value) {
            return Some(id);
        }
        self.find_overlap_in_subtree(node.left, value)
            .or_else(|| self.find_overlap_in_subtree(node.right, value))
    }

    fn collect_overlaps<'a>(&'a self, subtree: Option<NodeId>, interval: &Interval<B>, out: &mut Vec<&'a V>) {
        let Some(id) = subtree else { return };
        let node = self.node(id);
        if !node.full_interval.overlaps(interval) {
            return;
        }
        self.collect_overlaps(node.left, interval, out);
        if node.value.interval().overlaps(interval) {
            out.push(&node.value);
        }
        self.collect_overlaps(node.right, interval, out);
    }

    // ---- BST insertion -----------------------------------------------

    fn insert_bst(&mut self, subtree: NodeId, new_id: NodeId) {
        let cmp = self.node(new_id).value.cmp_key(&self.node(subtree).value);
        if cmp != std::cmp::Ordering::Greater {
            match self.node(subtree).left {
                Some(l) => self.insert_bst(l, new_id),
                None => {
                    self.node_mut(new_id).parent = Some(subtree);
                    self.node_mut(subtree).left = Some(new_id);
                }
            }
        } else {
            match self.node(subtree).right {
                Some(r) => self.insert_bst(r, new_id),
                None => {
                    self.node_mut(new_id).parent = Some(subtree);
                    self.node_mut(subtree).right = Some(new_id);
                }
            }
        }
    }

    // ---- rotations ----------------------------------------------------

    fn left_rotate(&mut self, id: NodeId) {
        let pivot = self.node(id).right.expect("left rotation requires a right child");
        let pivot_left = self.node(pivot).left;
        self.node_mut(id).right = pivot_left;
        if let Some(pl) = pivot_left {
            self.node_mut(pl).parent = Some(id);
        }
        let parent = self.node(id).parent;
        self.node_mut(pivot).parent = parent;
        match parent {
            None => self.root = Some(pivot),
            Some(pid) => {
                if self.is_left_child(id) {
                    self.node_mut(pid).left = Some(pivot);
                } else {
                    self.node_mut(pid).right = Some(pivot);
                }
            }
        }
        self.node_mut(pivot).left = Some(id);
        self.node_mut(id).parent = Some(pivot);

        self.recompute_data(id);
        self.recompute_data(pivot);
    }

    fn right_rotate(&mut self, id: NodeId) {
        let pivot = self.node(id).left.expect("right rotation requires a left child");
        let pivot_right = self.node(pivot).right;
        self.node_mut(id).left = pivot_right;
        if let Some(pr) = pivot_right {
            self.node_mut(pr).parent = Some(id);
        }
        let parent = self.node(id).parent;
        self.node_mut(pivot).parent = parent;
        match parent {
            None => self.root = Some(pivot),
            Some(pid) => {
                if self.is_left_child(id) {
                    self.node_mut(pid).left = Some(pivot);
                } else {
                    self.node_mut(pid).right = Some(pivot);
                }
            }
        }
        self.node_mut(pivot).right = Some(id);
        self.node_mut(id).parent = Some(pivot);

        self.recompute_data(id);
        self.recompute_data(pivot);
    }

    // ---- insertion fix-up ----------------------------------------------

    fn insert_fixup(&mut self, mut node: NodeId) {
        loop {
            let parent = match self.node(node).parent {
                Some(p) => p,
                None => break,
            };
            if self.node(parent).color != Color::Red {
                break;
            }
            let grandparent = self
                .node(parent)
                .parent
                .expect("a red node is never the root, so it always has a grandparent here");

            if self.is_left_child(parent) {
                let uncle = self.node(grandparent).right;
                if self.color_of(uncle) == Color::Red {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle.unwrap()).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    node = grandparent;
                } else {
                    let mut pivot = node;
                    if !self.is_left_child(pivot) {
                        pivot = parent;
                        self.left_rotate(pivot);
                    }
                    let p = self.node(pivot).parent.unwrap();
                    let g = self.node(p).parent.unwrap();
                    self.node_mut(p).color = Color::Black;
                    self.node_mut(g).color = Color::Red;
                    self.right_rotate(g);
                    node = pivot;
                }
            } else {
                let uncle = self.node(grandparent).left;
                if self.color_of(uncle) == Color::Red {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle.unwrap()).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    node = grandparent;
                } else {
                    let mut pivot = node;
                    if self.is_left_child(pivot) {
                        pivot = parent;
                        self.right_rotate(pivot);
                    }
                    let p = self.node(pivot).parent.unwrap();
                    let g = self.node(p).parent.unwrap();
                    self.node_mut(p).color = Color::Black;
                    self.node_mut(g).color = Color::Red;
                    self.left_rotate(g);
                    node = pivot;
                }
            }
        }
        if let Some(root) = self.root {
            self.node_mut(root).color = Color::Black;
        }
    }

    // ---- deletion -------------------------------------------------------

    fn minimum_with_parent(&self, start: NodeId) -> (NodeId, Option<NodeId>) {
        let mut cur = start;
        while let Some(l) = self.node(cur).left {
            cur = l;
        }
        (cur, self.node(cur).parent)
    }

    fn transplant(&mut self, to_substitute: NodeId, substitute: Option<NodeId>) {
        let parent = self.node(to_substitute).parent;
        match parent {
            None => self.root = substitute,
            Some(pid) => {
                if self.is_left_child(to_substitute) {
                    self.node_mut(pid).left = substitute;
                } else {
                    self.node_mut(pid).right = substitute;
                }
            }
        }
        if let Some(sid) = substitute {
            self.node_mut(sid).parent = parent;
        }
    }

    /// Remove `id`'s own length contribution from the `time_instants` of
    /// every current ancestor, and recompute the `full_interval` of its
    /// parent (from its sibling and `id`'s own still-attached children)
    /// before any structural change happens.
    fn update_data_delete(&mut self, id: NodeId) {
        let len = self.own_length(id);
        self.propagate_time_instants_sub(id, len);

        if let Some(pid) = self.node(id).parent {
            let sibling = self.sibling(id);
            let mut acc = *self.node(pid).value.interval();
            if let Some(sib) = sibling {
                acc = Interval::envelope(&acc, &self.node(sib).full_interval);
            }
            if let Some(l) = self.node(id).left {
                acc = Interval::envelope(&acc, &self.node(l).full_interval);
            }
            if let Some(r) = self.node(id).right {
                acc = Interval::envelope(&acc, &self.node(r).full_interval);
            }
            self.node_mut(pid).full_interval = acc;
            self.propagate_full_interval(pid);
        }
    }

    fn delete_no_children(&mut self, id: NodeId) -> (Option<NodeId>, bool) {
        let is_left = self.is_left_child(id);
        let parent = self.node(id).parent;
        self.transplant(id, None);
        (parent, is_left)
    }

    fn delete_no_left(&mut self, id: NodeId) -> (Option<NodeId>, bool) {
        let child = self.node(id).right.expect("delete_no_left requires a right child");
        self.transplant(id, Some(child));
        (self.node(child).parent, self.is_left_child(child))
    }

    fn delete_no_right(&mut self, id: NodeId) -> (Option<NodeId>, bool) {
        let child = self.node(id).left.expect("delete_no_right requires a left child");
        self.transplant(id, Some(child));
        (self.node(child).parent, self.is_left_child(child))
    }

    fn delete_two_children(&mut self, node_id: NodeId) -> (Option<NodeId>, bool, Color) {
        let right = self.node(node_id).right.expect("delete_two_children requires a right child");
        let (y, y_parent) = self.minimum_with_parent(right);
        let y_original_color = self.node(y).color;
        self.update_data_delete(y);

        let (parent, is_left) = if y_parent == Some(node_id) {
            self.transplant(node_id, Some(y));
            let node_left = self.node(node_id).left;
            self.node_mut(y).left = node_left;
            if let Some(l) = node_left {
                self.node_mut(l).parent = Some(y);
            }
            (y, false)
        } else {
            let is_left = self.is_left_child(y);
            let y_right = self.node(y).right;
            self.transplant(y, y_right);
            let node_right = self.node(node_id).right;
            self.node_mut(y).right = node_right;
            if let Some(r) = node_right {
                self.node_mut(r).parent = Some(y);
            }
            self.transplant(node_id, Some(y));
            let node_left = self.node(node_id).left;
            self.node_mut(y).left = node_left;
            if let Some(l) = node_left {
                self.node_mut(l).parent = Some(y);
            }
            (y_parent.expect("non-root successor has a parent"), is_left)
        };

        self.node_mut(y).color = self.node(node_id).color;
        self.recompute_data(y);
        let y_len = self.own_length(y);
        self.propagate_time_instants_add(y, y_len);
        self.propagate_full_interval(y);

        (Some(parent), is_left, y_original_color)
    }

    /// Remove `id` from the tree and return its value.
    fn delete(&mut self, id: NodeId) -> V {
        self.update_data_delete(id);

        let has_left = self.node(id).left.is_some();
        let has_right = self.node(id).right.is_some();
        let (parent, is_left, original_color) = if !has_left && !has_right {
            let color = self.node(id).color;
            let (p, il) = self.delete_no_children(id);
            (p, il, color)
        } else if !has_left {
            let color = self.node(id).color;
            let (p, il) = self.delete_no_left(id);
            (p, il, color)
        } else if !has_right {
            let color = self.node(id).color;
            let (p, il) = self.delete_no_right(id);
            (p, il, color)
        } else {
            self.delete_two_children(id)
        };

        let value = self.dealloc(id).value;
        if original_color == Color::Black {
            self.delete_fixup(parent, is_left);
        }
        value
    }

    fn delete_fixup(&mut self, parent: Option<NodeId>, is_left: bool) {
        let node = match parent {
            Some(pid) => {
                if is_left {
                    self.node(pid).left
                } else {
                    self.node(pid).right
                }
            }
            None => self.root,
        };

        if parent.is_none() || self.color_of(node) == Color::Red {
            if let Some(nid) = node {
                self.node_mut(nid).color = Color::Black;
            }
            return;
        }

        let pid = parent.unwrap();
        let sibling = if is_left { self.node(pid).right } else { self.node(pid).left };

        if self.color_of(sibling) == Color::Red {
            self.delete_fixup_case1(pid, is_left);
            return;
        }

        let sib = sibling.expect("a black node's sibling is never nil during delete fix-up");
        let sib_left_black = self.color_of(self.node(sib).left) == Color::Black;
        let sib_right_black = self.color_of(self.node(sib).right) == Color::Black;

        if sib_left_black && sib_right_black {
            self.delete_fixup_case2(pid, is_left);
        } else if is_left && sib_right_black {
            self.delete_fixup_case3(pid, is_left);
        } else if !is_left && sib_left_black {
            self.delete_fixup_case3(pid, is_left);
        } else {
            self.delete_fixup_case4(pid, is_left);
        }
    }

    fn delete_fixup_case1(&mut self, parent: NodeId, is_left: bool) {
        let sibling = (if is_left { self.node(parent).right } else { self.node(parent).left })
            .expect("red sibling is never nil");
        self.node_mut(sibling).color = Color::Black;
        self.node_mut(parent).color = Color::Red;
        if is_left {
            self.left_rotate(parent);
        } else {
            self.right_rotate(parent);
        }
        self.delete_fixup(Some(parent), is_left);
    }

    fn delete_fixup_case2(&mut self, parent: NodeId, is_left: bool) {
        let sibling = (if is_left { self.node(parent).right } else { self.node(parent).left })
            .expect("black sibling with black children is never nil");
        self.node_mut(sibling).color = Color::Red;
        let grandparent = self.node(parent).parent;
        let parent_is_left = self.is_left_child(parent);
        self.delete_fixup(grandparent, parent_is_left);
    }

    fn delete_fixup_case3(&mut self, parent: NodeId, is_left: bool) {
        let sibling = (if is_left { self.node(parent).right } else { self.node(parent).left })
            .expect("sibling is never nil in case 3");
        self.node_mut(sibling).color = Color::Red;
        if is_left {
            let sib_left = self.node(sibling).left.expect("near red child is never nil");
            self.node_mut(sib_left).color = Color::Black;
            self.right_rotate(sibling);
        } else {
            let sib_right = self.node(sibling).right.expect("near red child is never nil");
            self.node_mut(sib_right).color = Color::Black;
            self.left_rotate(sibling);
        }
        self.delete_fixup(Some(parent), is_left);
    }

    fn delete_fixup_case4(&mut self, parent: NodeId, is_left: bool) {
        let sibling = (if is_left { self.node(parent).right } else { self.node(parent).left })
            .expect("sibling is never nil in case 4");
        let parent_color = self.node(parent).color;
        self.node_mut(sibling).color = parent_color;
        self.node_mut(parent).color = Color::Black;
        if is_left {
            if let Some(sr) = self.node(sibling).right {
                self.node_mut(sr).color = Color::Black;
            }
            self.left_rotate(parent);
        } else {
            if let Some(sl) = self.node(sibling).left {
                self.node_mut(sl).color = Color::Black;
            }
            self.right_rotate(parent);
        }
        self.delete_fixup(None, true);
    }
}

/// Lazy in-order iterator, implemented with an explicit stack rather than
/// recursion so it is pull-driven one node at a time.
pub struct InOrder<'a, V, B> {
    tree: &'a Tree<V, B>,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
}

impl<'a, V: TreeValue<B>, B: Bound> Iterator for InOrder<'a, V, B> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = self.tree.node(id).left;
        }
        let id = self.stack.pop()?;
        self.current = self.tree.node(id).right;
        Some(&self.tree.node(id).value)
    }
}

enum PrunedFrame {
    Enter(NodeId),
    AfterLeft(NodeId),
}

/// The pruned, filtered in-order iterator returned by [`Tree::time_filtered`].
pub struct PrunedInOrder<'a, V, B, F> {
    tree: &'a Tree<V, B>,
    accept: F,
    stack: Vec<PrunedFrame>,
}

impl<'a, V: TreeValue<B>, B: Bound, F: Fn(&Interval<B>) -> bool> Iterator for PrunedInOrder<'a, V, B, F> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                PrunedFrame::Enter(id) => {
                    let node = self.tree.node(id);
                    if !(self.accept)(&node.full_interval) {
                        continue;
                    }
                    self.stack.push(PrunedFrame::AfterLeft(id));
                    if let Some(l) = node.left {
                        self.stack.push(PrunedFrame::Enter(l));
                    }
                }
                PrunedFrame::AfterLeft(id) => {
                    let node = self.tree.node(id);
                    if let Some(r) = node.right {
                        self.stack.push(PrunedFrame::Enter(r));
                    }
                    if (self.accept)(node.value.interval()) {
                        return Some(&node.value);
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn iv(lo: f64, hi: f64) -> Interval<f64> {
        Interval::right_open(lo, hi).unwrap()
    }

    fn black_height<V: TreeValue<f64>>(tree: &Tree<V, f64>, id: Option<NodeId>) -> usize {
        match id {
            None => 1,
            Some(id) => {
                let node = tree.node(id);
                let left = black_height(tree, node.left);
                let right = black_height(tree, node.right);
                assert_eq!(left, right, "black heights diverge");
                left + if node.color == Color::Black { 1 } else { 0 }
            }
        }
    }

    fn no_red_red<V: TreeValue<f64>>(tree: &Tree<V, f64>, id: Option<NodeId>) {
        if let Some(id) = id {
            let node = tree.node(id);
            if node.color == Color::Red {
                for child in [node.left, node.right].into_iter().flatten() {
                    assert_eq!(tree.node(child).color, Color::Black, "red-red violation");
                }
            }
            no_red_red(tree, node.left);
            no_red_red(tree, node.right);
        }
    }

    fn assert_rb_invariants<V: TreeValue<f64>>(tree: &Tree<V, f64>) {
        if let Some(root) = tree.root {
            assert_eq!(tree.node(root).color, Color::Black, "root must be black");
        }
        no_red_red(tree, tree.root);
        black_height(tree, tree.root);
    }

    #[test]
    fn merge_on_insert_fuses_overlapping_intervals() {
        let mut tree: Tree<Interval<f64>, f64> = Tree::new(1.0);
        tree.add(iv(1.0, 3.0)).unwrap();
        tree.add(iv(2.0, 5.0)).unwrap();
        tree.add(iv(7.0, 8.0)).unwrap();
        let values: Vec<_> = tree.iter().copied().collect();
        assert_eq!(values, vec![iv(1.0, 5.0), iv(7.0, 8.0)]);
        assert_eq!(tree.length(), 5.0);
        assert_rb_invariants(&tree);
    }

    #[test]
    fn insertion_is_idempotent() {
        let mut tree: Tree<Interval<f64>, f64> = Tree::new(1.0);
        tree.add(iv(0.0, 10.0)).unwrap();
        tree.add(iv(0.0, 10.0)).unwrap();
        let values: Vec<_> = tree.iter().copied().collect();
        assert_eq!(values, vec![iv(0.0, 10.0)]);
        assert_eq!(tree.length(), 10.0);
    }

    #[test]
    fn in_order_iteration_stays_sorted_after_many_inserts() {
        let mut tree: Tree<Interval<f64>, f64> = Tree::new(1.0);
        for i in 0..50 {
            let lo = (i * 2) as f64;
            tree.add(iv(lo, lo + 1.0)).unwrap();
        }
        let values: Vec<_> = tree.iter().collect();
        for window in values.windows(2) {
            assert_eq!(window[0].order_cmp(window[1]), std::cmp::Ordering::Less);
        }
        assert_rb_invariants(&tree);
    }

    #[test]
    fn deleting_via_merge_preserves_balance() {
        let mut tree: Tree<Interval<f64>, f64> = Tree::new(1.0);
        let bounds: [(f64, f64); 12] = [
            (0.0, 1.0),
            (2.0, 3.0),
            (4.0, 5.0),
            (6.0, 7.0),
            (8.0, 9.0),
            (10.0, 11.0),
            (12.0, 13.0),
            (1.0, 2.0),
            (3.0, 4.0),
            (5.0, 6.0),
            (7.0, 8.0),
            (9.0, 10.0),
        ];
        for (lo, hi) in bounds {
            tree.add(iv(lo, hi)).unwrap();
        }
        assert_rb_invariants(&tree);
        let values: Vec<_> = tree.iter().copied().collect();
        assert_eq!(values, vec![iv(0.0, 13.0)]);
        assert_eq!(tree.length(), 13.0);
    }

    #[test]
    fn zero_length_instant_uses_instant_duration_floor() {
        let mut tree: Tree<Interval<f64>, f64> = Tree::new(1.0);
        tree.add(Interval::closed(5.0, 5.0).unwrap()).unwrap();
        assert_eq!(tree.length(), 1.0);
    }

    #[test]
    fn overlaps_returns_all_matching_nodes() {
        let mut tree: Tree<Interval<f64>, f64> = Tree::new(1.0);
        tree.add(iv(0.0, 2.0)).unwrap();
        tree.add(iv(5.0, 6.0)).unwrap();
        tree.add(iv(10.0, 12.0)).unwrap();
        let hits = tree.overlaps(&iv(1.0, 11.0));
        assert_eq!(hits, vec![&iv(0.0, 2.0), &iv(5.0, 6.0), &iv(10.0, 12.0)]);
    }

    #[test]
    fn overlaps_any_short_circuits() {
        let mut tree: Tree<Interval<f64>, f64> = Tree::new(1.0);
        tree.add(iv(0.0, 2.0)).unwrap();
        tree.add(iv(10.0, 12.0)).unwrap();
        assert!(tree.overlaps_any(&iv(1.0, 1.5)));
        assert!(!tree.overlaps_any(&iv(3.0, 4.0)));
    }

    #[test]
    fn time_filtered_prunes_and_matches_overlaps() {
        let mut tree: Tree<Interval<f64>, f64> = Tree::new(1.0);
        for i in 0..20 {
            let lo = (i * 3) as f64;
            tree.add(iv(lo, lo + 1.0)).unwrap();
        }
        let window = iv(10.0, 20.0);
        let pruned: Vec<_> = tree.time_filtered(|i: &Interval<f64>| i.overlaps(&window)).copied().collect();
        let expected = tree.overlaps(&window).into_iter().copied().collect::<Vec<_>>();
        assert_eq!(pruned, expected);
    }
}
