//! The stream dictionary (C5): node and adjacency maps of interval
//! containers, directedness-agnostic — the caller passes endpoints already
//! in whatever order its stream variant requires.

use crate::container::{EdgeContainer, NodeContainer};
use crate::error::{StreamError, StreamResult};
use crate::interval::{Bound, Interval};
use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

/// `nodes`, `edges`, `reverse_edges`. `reverse_edges[v][u]` is the *same*
/// container object as `edges[u][v]`: the one place in the crate where
/// interior mutability is unavoidable, since the arena-per-container
/// design doesn't extend across the two owning maps (see crate design
/// notes on reverse-edge aliasing).
pub struct StreamDict<N, B> {
    nodes: HashMap<N, NodeContainer<N, B>>,
    edges: HashMap<N, HashMap<N, Rc<RefCell<EdgeContainer<N, B>>>>>,
    reverse_edges: HashMap<N, HashMap<N, Rc<RefCell<EdgeContainer<N, B>>>>>,
    instant_duration: B,
}

impl<N, B> StreamDict<N, B>
where
    N: Eq + Hash + Ord + Clone,
    B: Bound,
{
    pub fn new(instant_duration: B) -> Self {
        StreamDict {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            reverse_edges: HashMap::new(),
            instant_duration,
        }
    }

    pub fn contains_node(&self, n: &N) -> bool {
        self.nodes.contains_key(n)
    }

    /// Admit a link: create any missing node/edge containers (aliasing the
    /// new edge container into `reverse_edges`), then forward the interval
    /// to the two node containers and the edge container.
    pub fn add(&mut self, interval: &Interval<B>, u: &N, v: &N) -> StreamResult<()> {
        let instant_duration = self.instant_duration;

        self.nodes
            .entry(u.clone())
            .or_insert_with(|| NodeContainer::new(u.clone(), instant_duration))
            .add(interval, u, v)?;
        self.nodes
            .entry(v.clone())
            .or_insert_with(|| NodeContainer::new(v.clone(), instant_duration))
            .add(interval, u, v)?;

        let container = self
            .edges
            .entry(u.clone())
            .or_default()
            .entry(v.clone())
            .or_insert_with(|| Rc::new(RefCell::new(EdgeContainer::new(u.clone(), v.clone(), instant_duration))))
            .clone();

        self.reverse_edges
            .entry(v.clone())
            .or_default()
            .entry(u.clone())
            .or_insert_with(|| container.clone());

        container.borrow_mut().add(interval, u, v)?;
        Ok(())
    }

    pub fn node_presence(&self, n: &N) -> StreamResult<&NodeContainer<N, B>> {
        self.nodes.get(n).ok_or(StreamError::UnknownNode)
    }

    /// The canonical edge container for `(u, v)`, or `None` if the two
    /// nodes exist but share no link (not an error).
    pub fn edge_presence(&self, u: &N, v: &N) -> StreamResult<Option<Rc<RefCell<EdgeContainer<N, B>>>>> {
        if !self.nodes.contains_key(u) || !self.nodes.contains_key(v) {
            return Err(StreamError::UnknownNode);
        }
        Ok(self.edges.get(u).and_then(|adj| adj.get(v)).cloned())
    }

    /// All links touching `n`, time-ordered: a merge across `n`'s forward
    /// and reverse adjacency.
    pub fn links_of(&self, n: &N) -> StreamResult<Vec<(Interval<B>, N, N)>> {
        if !self.nodes.contains_key(n) {
            return Err(StreamError::UnknownNode);
        }
        let mut merged: Vec<(Interval<B>, N, N)> = Vec::new();
        if let Some(adj) = self.edges.get(n) {
            for container in adj.values() {
                merged.extend(container.borrow().iter());
            }
        }
        if let Some(radj) = self.reverse_edges.get(n) {
            for container in radj.values() {
                merged.extend(container.borrow().iter());
            }
        }
        merged.sort_by(|a, b| a.0.order_cmp(&b.0));
        Ok(merged)
    }

    /// Links between `u` and `v`, time-ordered; empty (not an error) if
    /// both nodes exist but share no edge container.
    pub fn links_between(&self, u: &N, v: &N) -> StreamResult<Vec<(Interval<B>, N, N)>> {
        if !self.nodes.contains_key(u) || !self.nodes.contains_key(v) {
            return Err(StreamError::UnknownNode);
        }
        match self.edges.get(u).and_then(|adj| adj.get(v)) {
            Some(container) => Ok(container.borrow().iter().collect()),
            None => Ok(Vec::new()),
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.keys()
    }

    pub fn edges(&self) -> &HashMap<N, HashMap<N, Rc<RefCell<EdgeContainer<N, B>>>>> {
        &self.edges
    }

    pub fn reverse_edges(&self) -> &HashMap<N, HashMap<N, Rc<RefCell<EdgeContainer<N, B>>>>> {
        &self.reverse_edges
    }
}
