//! The ordered contact stream (C8).
//!
//! Expands every link whose interval overlaps a time window into its
//! per-instant contact events `(t, u, v)`, then merges all of them into one
//! strictly time-ordered sequence (ascending or descending), lazily: the
//! sequence consumed by the minimum-temporal-path algorithms in
//! [`crate::paths`].

use crate::airbt::TreeValue;
use crate::error::IntervalResult;
use crate::interval::{split_in_instants, total_cmp, Bound, Interval};
use crate::merge::KWayMerge;
use crate::stream::{Directedness, LinkStream};
use std::hash::Hash;

/// The direction in which [`ordered_contacts`] walks instants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// One instantaneous contact: at time `t`, `u` and `v` are in contact. For a
/// directed stream, `u` is the source and `v` the target of the underlying
/// link; for an undirected stream both orientations of a link are enumerated
/// as separate events (§4.8).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contact<N, B> {
    pub t: B,
    pub u: N,
    pub v: N,
}

/// The lazy, strictly time-ordered sequence of contact events for every link
/// overlapping `window`, in `order`. `window` restricts which links are
/// candidates (via the link-tagged tree's overlap search); it does not cut
/// their intervals, so a contact's `t` may fall outside `window` for a link
/// that merely overlaps it — callers (the path algorithms) are responsible
/// for bounding the scan themselves (§4.9's early-termination rule).
pub fn ordered_contacts<'a, N, B, D>(
    stream: &'a LinkStream<N, B, D>,
    window: &Interval<B>,
    order: Order,
) -> impl Iterator<Item = Contact<N, B>> + 'a
where
    N: Eq + Hash + Ord + Clone + 'a,
    B: Bound + 'a,
    D: Directedness<N, B>,
    D::Link: 'a,
{
    let instant_duration = stream.instant_duration();
    let links = stream.tree().overlaps(window);

    let sources = links.into_iter().flat_map(move |link| {
        let interval = *link.interval();
        D::contact_endpoints(link).into_iter().map(move |(u, v)| {
            let instants = split_in_instants(&interval, instant_duration)
                .expect("link intervals are validated at insertion; instant_duration is always positive");
            let ordered: Box<dyn Iterator<Item = B>> = match order {
                Order::Ascending => Box::new(instants),
                Order::Descending => Box::new(instants.collect::<Vec<B>>().into_iter().rev()),
            };
            ordered.map(move |t| Contact {
                t,
                u: u.clone(),
                v: v.clone(),
            })
        })
    });

    let cmp = move |a: &Contact<N, B>, b: &Contact<N, B>| match order {
        Order::Ascending => total_cmp(&a.t, &b.t),
        Order::Descending => total_cmp(&b.t, &a.t),
    };

    KWayMerge::new(sources, cmp)
}

/// `start, end` as defined in §4.9: the first and last instants of
/// `split_in_instants(window, instant_duration)`.
pub fn scan_bounds<B: Bound>(window: &Interval<B>, instant_duration: B) -> IntervalResult<(B, B)> {
    crate::interval::instant_bounds(window, instant_duration)
}
