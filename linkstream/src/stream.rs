//! The link stream façade (C6): one node/edge dictionary, one link-tagged
//! AIRBT for time-ordered iteration, and one plain AIRBT tracking overall
//! presence, kept in lock-step by the single mutator [`LinkStream::add`].

use crate::airbt::Tree;
use crate::container::NodeContainer;
use crate::error::{StreamError, StreamResult};
use crate::filter::{NoFilter, NodeFilter, TimeFilter};
use crate::interval::{Bound, Interval};
use crate::link::{AnyLink, DiLink, Link};
use crate::streamdict::StreamDict;
use std::hash::Hash;
use std::marker::PhantomData;

mod private {
    pub trait Sealed {}
    impl Sealed for super::Undirected {}
    impl Sealed for super::Directed {}
}

/// Marker for an undirected stream: endpoints are canonically ordered and
/// `(u, v)` is indistinguishable from `(v, u)`.
pub enum Undirected {}

/// Marker for a directed stream: endpoints keep their source/target order.
pub enum Directed {}

/// The directedness of a [`LinkStream`], fixing its link representation and
/// its adjacency-key convention. Sealed: `Undirected` and `Directed` are the
/// only two implementors.
pub trait Directedness<N, B>: private::Sealed
where
    N: Ord + Clone,
    B: Bound,
{
    /// `Link<N, B>` for undirected streams, `DiLink<N, B>` for directed ones.
    type Link: crate::airbt::TreeValue<B> + Clone;

    /// The key order under which `(u, v)` is stored in the adjacency dict.
    fn dict_pair(u: N, v: N) -> (N, N);

    fn wrap(interval: Interval<B>, u: N, v: N) -> StreamResult<Self::Link>;

    /// The type check of §4.6 step 1: unwrap `link` iff it is the variant
    /// this directedness expects, else [`StreamError::WrongLinkVariant`].
    fn from_any(link: AnyLink<N, B>) -> StreamResult<Self::Link>;

    fn endpoints(link: &Self::Link) -> (N, N);

    fn link_interval(link: &Self::Link) -> Interval<B>;

    /// The orientation(s) a single link contributes to the ordered contact
    /// stream (§4.8): a directed link contributes only its (source, target)
    /// pair; an undirected link contributes both orientations, since either
    /// endpoint can observe the contact.
    fn contact_endpoints(link: &Self::Link) -> Vec<(N, N)>;
}

impl<N: Ord + Clone, B: Bound> Directedness<N, B> for Undirected {
    type Link = Link<N, B>;

    fn dict_pair(u: N, v: N) -> (N, N) {
        if u <= v {
            (u, v)
        } else {
            (v, u)
        }
    }

    fn wrap(interval: Interval<B>, u: N, v: N) -> StreamResult<Self::Link> {
        Link::new(interval, u, v)
    }

    fn from_any(link: AnyLink<N, B>) -> StreamResult<Self::Link> {
        match link {
            AnyLink::Undirected(link) => Ok(link),
            AnyLink::Directed(_) => Err(StreamError::WrongLinkVariant),
        }
    }

    fn endpoints(link: &Self::Link) -> (N, N) {
        (link.u().clone(), link.v().clone())
    }

    fn link_interval(link: &Self::Link) -> Interval<B> {
        *link.interval()
    }

    fn contact_endpoints(link: &Self::Link) -> Vec<(N, N)> {
        let u = link.u().clone();
        let v = link.v().clone();
        vec![(u.clone(), v.clone()), (v, u)]
    }
}

impl<N: Ord + Clone, B: Bound> Directedness<N, B> for Directed {
    type Link = DiLink<N, B>;

    fn dict_pair(u: N, v: N) -> (N, N) {
        (u, v)
    }

    fn wrap(interval: Interval<B>, u: N, v: N) -> StreamResult<Self::Link> {
        DiLink::new(interval, u, v)
    }

    fn from_any(link: AnyLink<N, B>) -> StreamResult<Self::Link> {
        match link {
            AnyLink::Directed(link) => Ok(link),
            AnyLink::Undirected(_) => Err(StreamError::WrongLinkVariant),
        }
    }

    fn endpoints(link: &Self::Link) -> (N, N) {
        (link.u().clone(), link.v().clone())
    }

    fn link_interval(link: &Self::Link) -> Interval<B> {
        *link.interval()
    }

    fn contact_endpoints(link: &Self::Link) -> Vec<(N, N)> {
        vec![(link.u().clone(), link.v().clone())]
    }
}

/// A temporal graph: `Undirected` gives a [`Stream`], `Directed` gives a
/// [`DiStream`].
pub struct LinkStream<N, B, D: Directedness<N, B>>
where
    N: Eq + Hash + Ord + Clone,
    B: Bound,
{
    dict: StreamDict<N, B>,
    tree: Tree<D::Link, B>,
    presence: Tree<Interval<B>, B>,
    instant_duration: B,
    _directedness: PhantomData<D>,
}

/// An undirected link stream.
pub type Stream<N, B> = LinkStream<N, B, Undirected>;
/// A directed link stream.
pub type DiStream<N, B> = LinkStream<N, B, Directed>;

impl<N, B, D> LinkStream<N, B, D>
where
    N: Eq + Hash + Ord + Clone,
    B: Bound,
    D: Directedness<N, B>,
{
    pub fn new(instant_duration: B) -> Self {
        LinkStream {
            dict: StreamDict::new(instant_duration),
            tree: Tree::new(instant_duration),
            presence: Tree::new(instant_duration),
            instant_duration,
            _directedness: PhantomData,
        }
    }

    pub fn instant_duration(&self) -> B {
        self.instant_duration
    }

    /// Admits an already-constructed link (§4.6): delegates the same link
    /// to the node/edge dictionary (C5) and the link-tagged tree (C3), and
    /// its interval to the plain presence tree (C2). Nothing is left
    /// partially updated if any of the three fails.
    pub fn add(&mut self, link: D::Link) -> StreamResult<()> {
        let interval = D::link_interval(&link);
        let (u, v) = D::endpoints(&link);
        let (du, dv) = D::dict_pair(u, v);
        self.dict.add(&interval, &du, &dv)?;
        self.tree.add(link)?;
        self.presence.add(interval)?;
        Ok(())
    }

    /// Type-checks `link` against this stream's directedness (§4.6 step 1)
    /// before admitting it: the entry point for a caller that built a link
    /// without knowing in advance which flavour of stream would consume it
    /// (e.g. an external adapter, §6). Directed links offered to an
    /// undirected stream, or vice versa, are rejected with
    /// [`StreamError::WrongLinkVariant`] rather than silently coerced.
    pub fn add_any(&mut self, link: AnyLink<N, B>) -> StreamResult<()> {
        self.add(D::from_any(link)?)
    }

    pub fn contains_node(&self, n: &N) -> bool {
        self.dict.contains_node(n)
    }

    pub fn stream_presence_len(&self) -> B {
        self.presence.length()
    }

    pub fn node_presence(&self, n: &N) -> StreamResult<&NodeContainer<N, B>> {
        self.dict.node_presence(n)
    }

    pub fn node_presence_len(&self, n: &N) -> StreamResult<B> {
        Ok(self.node_presence(n)?.length())
    }

    pub fn link_presence(&self, u: &N, v: &N) -> StreamResult<Vec<(Interval<B>, N, N)>> {
        let (du, dv) = D::dict_pair(u.clone(), v.clone());
        self.dict.links_between(&du, &dv)
    }

    pub fn link_presence_len(&self, u: &N, v: &N) -> StreamResult<B> {
        let links = self.link_presence(u, v)?;
        Ok(links
            .iter()
            .fold(self.zero(), |acc, (i, _, _)| acc + i.length()))
    }

    /// Links in time order, as stored by the link-tagged tree.
    pub fn iter(&self) -> impl Iterator<Item = &D::Link> {
        self.tree.iter()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.dict.nodes()
    }

    /// A fresh stream containing every link touching `u`.
    pub fn neighborhood(&self, u: &N) -> StreamResult<Self> {
        let mut out = Self::new(self.instant_duration);
        for (interval, a, b) in self.dict.links_of(u)? {
            out.add(D::wrap(interval, a, b)?)?;
        }
        Ok(out)
    }

    /// Every node whose presence covers the instant `t`.
    pub fn nodes_present_at(&self, t: B) -> StreamResult<Vec<N>> {
        let instant = Interval::closed(t, t)?;
        let mut out = Vec::new();
        for n in self.dict.nodes() {
            if self.dict.node_presence(n)?.overlaps(&instant) {
                out.push(n.clone());
            }
        }
        Ok(out)
    }

    /// Every link whose interval covers the instant `t`.
    pub fn links_present_at(&self, t: B) -> StreamResult<Vec<D::Link>> {
        let instant = Interval::closed(t, t)?;
        Ok(self.tree.overlaps(&instant).into_iter().cloned().collect())
    }

    /// A fresh stream built from the links that survive `slice(node_filter,
    /// time_filter, first)` (§4.7); `first` selects the traversal strategy
    /// ("time" or "node") and is otherwise an [`crate::error::FilterError`].
    pub fn slice(
        &self,
        node_filter: &dyn NodeFilter<N>,
        time_filter: &dyn TimeFilter<B>,
        first: &str,
    ) -> StreamResult<Self> {
        let links: Vec<D::Link> = crate::filter::slice(self, node_filter, time_filter, first)?.collect();
        let mut out = Self::new(self.instant_duration);
        for link in links {
            out.add(link)?;
        }
        Ok(out)
    }

    /// A fresh stream restricted to links whose endpoints both pass
    /// `node_filter`, time unrestricted.
    pub fn node_slice(&self, node_filter: &dyn NodeFilter<N>) -> StreamResult<Self> {
        self.slice(node_filter, &NoFilter, "node")
    }

    /// A fresh stream restricted (and cut) to the instants `time_filter`
    /// accepts, nodes unrestricted.
    pub fn time_slice(&self, time_filter: &dyn TimeFilter<B>) -> StreamResult<Self> {
        self.slice(&NoFilter, time_filter, "time")
    }

    pub(crate) fn tree(&self) -> &Tree<D::Link, B> {
        &self.tree
    }

    pub(crate) fn dict(&self) -> &StreamDict<N, B> {
        &self.dict
    }

    /// The bounding interval of every link ever inserted, if any; the
    /// default time window for the minimum-temporal-path algorithms
    /// (§4.9) when no explicit `time_bound` is given.
    pub(crate) fn presence_full_interval(&self) -> Option<Interval<B>> {
        self.presence.full_interval()
    }

    fn zero(&self) -> B {
        self.presence
            .full_interval()
            .map(|i| i.length() - i.length())
            .unwrap_or(self.instant_duration - self.instant_duration)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn iv(lo: f64, hi: f64) -> Interval<f64> {
        Interval::right_open(lo, hi).unwrap()
    }

    #[test]
    fn undirected_add_is_symmetric_in_the_dictionary() {
        let mut s: Stream<&str, f64> = Stream::new(1.0);
        s.add(Link::new(iv(0.0, 1.0), "a", "b").unwrap()).unwrap();
        assert_eq!(s.link_presence(&"a", &"b").unwrap().len(), 1);
        assert_eq!(s.link_presence(&"b", &"a").unwrap().len(), 1);
    }

    #[test]
    fn directed_add_distinguishes_orientation() {
        let mut s: DiStream<&str, f64> = DiStream::new(1.0);
        s.add(DiLink::new(iv(0.0, 1.0), "a", "b").unwrap()).unwrap();
        assert_eq!(s.link_presence(&"a", &"b").unwrap().len(), 1);
        assert!(s.link_presence(&"b", &"a").unwrap().is_empty());
    }

    #[test]
    fn add_any_accepts_the_matching_variant() {
        let mut s: Stream<&str, f64> = Stream::new(1.0);
        let link = AnyLink::Undirected(Link::new(iv(0.0, 1.0), "a", "b").unwrap());
        s.add_any(link).unwrap();
        assert_eq!(s.link_presence(&"a", &"b").unwrap().len(), 1);
    }

    #[test]
    fn add_any_rejects_the_mismatched_variant() {
        let mut s: Stream<&str, f64> = Stream::new(1.0);
        let link = AnyLink::Directed(DiLink::new(iv(0.0, 1.0), "a", "b").unwrap());
        assert_eq!(s.add_any(link).unwrap_err(), StreamError::WrongLinkVariant);

        let mut d: DiStream<&str, f64> = DiStream::new(1.0);
        let link = AnyLink::Undirected(Link::new(iv(0.0, 1.0), "a", "b").unwrap());
        assert_eq!(d.add_any(link).unwrap_err(), StreamError::WrongLinkVariant);
    }

    #[test]
    fn neighborhood_collects_every_touching_link() {
        let mut s: Stream<&str, f64> = Stream::new(1.0);
        s.add(Link::new(iv(0.0, 1.0), "a", "b").unwrap()).unwrap();
        s.add(Link::new(iv(2.0, 3.0), "c", "a").unwrap()).unwrap();
        let nb = s.neighborhood(&"a").unwrap();
        assert_eq!(nb.iter().count(), 2);
    }

    #[test]
    fn stream_presence_len_tracks_union_of_intervals() {
        let mut s: Stream<&str, f64> = Stream::new(1.0);
        s.add(Link::new(iv(0.0, 1.0), "a", "b").unwrap()).unwrap();
        s.add(Link::new(iv(1.0, 2.0), "c", "d").unwrap()).unwrap();
        assert_eq!(s.stream_presence_len(), 2.0);
    }

    #[test]
    fn nodes_present_at_an_instant() {
        let mut s: Stream<&str, f64> = Stream::new(1.0);
        s.add(Link::new(iv(0.0, 2.0), "a", "b").unwrap()).unwrap();
        s.add(Link::new(iv(5.0, 6.0), "c", "d").unwrap()).unwrap();
        let mut present = s.nodes_present_at(1.0).unwrap();
        present.sort();
        assert_eq!(present, vec!["a", "b"]);
        assert!(s.nodes_present_at(3.0).unwrap().is_empty());
    }

    #[test]
    fn links_present_at_an_instant() {
        let mut s: Stream<&str, f64> = Stream::new(1.0);
        s.add(Link::new(iv(0.0, 2.0), "a", "b").unwrap()).unwrap();
        s.add(Link::new(iv(5.0, 6.0), "c", "d").unwrap()).unwrap();
        assert_eq!(s.links_present_at(1.0).unwrap().len(), 1);
        assert!(s.links_present_at(3.0).unwrap().is_empty());
    }

    #[test]
    fn node_slice_keeps_only_accepted_endpoints() {
        let mut s: Stream<&str, f64> = Stream::new(1.0);
        s.add(Link::new(iv(0.0, 1.0), "a", "b").unwrap()).unwrap();
        s.add(Link::new(iv(0.0, 1.0), "b", "c").unwrap()).unwrap();
        let filter = crate::filter::PredicateNodeFilter::new(|n: &&str| *n != "c");
        let sliced = s.node_slice(&filter).unwrap();
        assert!(sliced.contains_node(&"a"));
        assert!(sliced.contains_node(&"b"));
        assert!(!sliced.contains_node(&"c"));
    }

    #[test]
    fn time_slice_cuts_intervals_to_the_filter() {
        let mut s: Stream<&str, f64> = Stream::new(1.0);
        s.add(Link::new(iv(0.0, 10.0), "a", "b").unwrap()).unwrap();
        let time_filter = crate::filter::IntervalTimeFilter::new([iv(2.0, 4.0)]).unwrap();
        let sliced = s.time_slice(&time_filter).unwrap();
        assert_eq!(sliced.link_presence_len(&"a", &"b").unwrap(), 2.0);
    }

    #[test]
    fn slice_rejects_an_unknown_strategy() {
        let mut s: Stream<&str, f64> = Stream::new(1.0);
        s.add(Link::new(iv(0.0, 1.0), "a", "b").unwrap()).unwrap();
        assert!(s.slice(&NoFilter, &NoFilter, "bogus").is_err());
    }
}
