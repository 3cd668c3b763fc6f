//! Shortest path distance (§4.9): the minimum number of hops of a strictly
//! time-respecting walk from a source to every reachable node, scanning the
//! ordered contact stream once and keeping, per node, a Pareto front of
//! `(hop count, arrival)` candidates (fewer hops is better).

use crate::contacts::{ordered_contacts, Order};
use crate::error::PathResult;
use crate::interval::{total_cmp, Bound, Interval};
use crate::paths::pareto::ParetoFront;
use crate::paths::window::{require_known, scan_window};
use crate::stream::{Directedness, LinkStream};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

fn fewer_hops_is_better(a: u64, b: u64) -> bool {
    a <= b
}

/// Minimum hop count from `source` to every node reachable by a strictly
/// time-respecting walk starting no earlier than `start`, scanning
/// `time_bound` (defaulting to the stream's full presence interval).
/// `source` itself maps to `0`.
pub fn shortest_path_distance<N, B, D>(
    stream: &LinkStream<N, B, D>,
    source: &N,
    start: B,
    time_bound: Option<Interval<B>>,
) -> PathResult<HashMap<N, u64>>
where
    N: Eq + Hash + Ord + Clone,
    B: Bound,
    D: Directedness<N, B>,
{
    require_known(stream, source)?;
    let (window, _scan_start, scan_end) = scan_window(stream, time_bound)?;
    let delta = stream.instant_duration();

    let mut distance: HashMap<N, u64> = HashMap::new();
    let mut fronts: HashMap<N, ParetoFront<u64, B>> = HashMap::new();
    distance.insert(source.clone(), 0);
    let mut source_front = ParetoFront::new();
    source_front.insert(0, start, fewer_hops_is_better);
    fronts.insert(source.clone(), source_front);

    for contact in ordered_contacts(stream, &window, Order::Ascending) {
        if total_cmp(&contact.t, &scan_end) == Ordering::Greater {
            break;
        }
        let Some(front_u) = fronts.get_mut(&contact.u) else {
            continue;
        };
        let Some((hops_u, _)) = front_u.best_at_or_before(contact.t) else {
            continue;
        };
        let new_hops = hops_u + 1;
        let new_arrival = contact.t + delta;
        if total_cmp(&new_arrival, &scan_end) == Ordering::Greater {
            continue;
        }

        match distance.get(&contact.v) {
            Some(&existing) if existing <= new_hops => {}
            _ => {
                distance.insert(contact.v.clone(), new_hops);
            }
        }
        fronts
            .entry(contact.v.clone())
            .or_insert_with(ParetoFront::new)
            .insert(new_hops, new_arrival, fewer_hops_is_better);
    }

    Ok(distance)
}
