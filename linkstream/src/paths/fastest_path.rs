//! Fastest path duration (§4.9): the minimum duration (arrival minus start)
//! of a strictly time-respecting walk from a source to every reachable node.
//!
//! [`fastest_path_duration`] is the one-pass algorithm: a single ascending
//! scan of the ordered contact stream, keeping per node a Pareto front of
//! `(start time, arrival)` candidates where a *later* start is the better
//! metric (for a fixed arrival, starting later can only shrink the
//! duration). [`fastest_path_duration_multipass`] is a slower, independently
//! grounded check: it reruns earliest-arrival once per distinct instant the
//! source is observed departing, and keeps it only to cross-check the
//! one-pass result in tests — new code should call `fastest_path_duration`.

use crate::contacts::{ordered_contacts, Order};
use crate::error::PathResult;
use crate::interval::{total_cmp, Bound, Interval};
use crate::paths::pareto::ParetoFront;
use crate::paths::window::{require_known, scan_window};
use crate::stream::{Directedness, LinkStream};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

fn later_start_is_better<B: Bound>(a: B, b: B) -> bool {
    total_cmp(&a, &b) != Ordering::Less
}

/// Minimum duration of a strictly time-respecting walk from `source`,
/// starting no earlier than `start`, to every node it can reach within
/// `time_bound` (defaulting to the stream's full presence interval).
/// `source` itself maps to a duration of zero.
pub fn fastest_path_duration<N, B, D>(
    stream: &LinkStream<N, B, D>,
    source: &N,
    start: B,
    time_bound: Option<Interval<B>>,
) -> PathResult<HashMap<N, B>>
where
    N: Eq + Hash + Ord + Clone,
    B: Bound,
    D: Directedness<N, B>,
{
    require_known(stream, source)?;
    let (window, _scan_start, scan_end) = scan_window(stream, time_bound)?;
    let delta = stream.instant_duration();
    let zero = delta - delta;

    let mut duration: HashMap<N, B> = HashMap::new();
    let mut fronts: HashMap<N, ParetoFront<B, B>> = HashMap::new();
    duration.insert(source.clone(), zero);

    for contact in ordered_contacts(stream, &window, Order::Ascending) {
        if total_cmp(&contact.t, &scan_end) == Ordering::Greater {
            break;
        }
        // the source can depart at any instant `>= start`: waiting there is
        // free, so the best start it offers for a hop at `contact.t` is
        // `contact.t` itself, not a fixed point fed through its front.
        let start_u = if contact.u == *source {
            if total_cmp(&contact.t, &start) == Ordering::Less {
                continue;
            }
            contact.t
        } else {
            let Some(front_u) = fronts.get_mut(&contact.u) else {
                continue;
            };
            let Some((start_u, _)) = front_u.best_at_or_before(contact.t) else {
                continue;
            };
            start_u
        };
        let new_arrival = contact.t + delta;
        if total_cmp(&new_arrival, &scan_end) == Ordering::Greater {
            continue;
        }
        let candidate_duration = new_arrival - start_u;

        match duration.get(&contact.v) {
            Some(&existing) if total_cmp(&existing, &candidate_duration) != Ordering::Greater => {}
            _ => {
                duration.insert(contact.v.clone(), candidate_duration);
            }
        }
        fronts
            .entry(contact.v.clone())
            .or_insert_with(ParetoFront::new)
            .insert(start_u, new_arrival, later_start_is_better);
    }

    Ok(duration)
}

/// Earliest arrival from `source`, seeded at `seed` rather than at the
/// window's start, scanning only contacts at or after `seed`. A building
/// block for [`fastest_path_duration_multipass`].
fn earliest_arrival_from<N, B, D>(
    stream: &LinkStream<N, B, D>,
    window: &Interval<B>,
    end: B,
    source: &N,
    seed: B,
    delta: B,
) -> HashMap<N, B>
where
    N: Eq + Hash + Ord + Clone,
    B: Bound,
    D: Directedness<N, B>,
{
    let mut arrival: HashMap<N, B> = HashMap::new();
    arrival.insert(source.clone(), seed);

    for contact in ordered_contacts(stream, window, Order::Ascending) {
        if total_cmp(&contact.t, &seed) == Ordering::Less {
            continue;
        }
        if total_cmp(&contact.t, &end) == Ordering::Greater {
            break;
        }
        let Some(&au) = arrival.get(&contact.u) else {
            continue;
        };
        if total_cmp(&au, &contact.t) == Ordering::Greater {
            continue;
        }
        let candidate = contact.t + delta;
        if total_cmp(&candidate, &end) == Ordering::Greater {
            continue;
        }
        match arrival.get(&contact.v) {
            Some(&existing) if total_cmp(&existing, &candidate) != Ordering::Greater => {}
            _ => {
                arrival.insert(contact.v.clone(), candidate);
            }
        }
    }

    arrival
}

/// Deprecated reference implementation of [`fastest_path_duration`]: reruns
/// earliest-arrival once per distinct instant `source` is observed
/// departing within the window, and keeps the minimum `arrival - seed` seen
/// at each node across every rerun. Quadratic in the number of source
/// departures; kept only so tests can confirm it agrees with the one-pass
/// algorithm (property 8, §8).
#[deprecated(note = "use fastest_path_duration; kept for cross-checking in tests")]
pub fn fastest_path_duration_multipass<N, B, D>(
    stream: &LinkStream<N, B, D>,
    source: &N,
    start: B,
    time_bound: Option<Interval<B>>,
) -> PathResult<HashMap<N, B>>
where
    N: Eq + Hash + Ord + Clone,
    B: Bound,
    D: Directedness<N, B>,
{
    require_known(stream, source)?;
    let (window, _scan_start, scan_end) = scan_window(stream, time_bound)?;
    let delta = stream.instant_duration();
    let zero = delta - delta;

    let mut seeds: Vec<B> = vec![start];
    for contact in ordered_contacts(stream, &window, Order::Ascending) {
        if total_cmp(&contact.t, &scan_end) == Ordering::Greater {
            break;
        }
        if total_cmp(&contact.t, &start) == Ordering::Less {
            continue;
        }
        if contact.u != *source {
            continue;
        }
        if !seeds.iter().any(|s| total_cmp(s, &contact.t) == Ordering::Equal) {
            seeds.push(contact.t);
        }
    }

    let mut duration: HashMap<N, B> = HashMap::new();
    duration.insert(source.clone(), zero);
    for seed in seeds {
        let arrival = earliest_arrival_from(stream, &window, scan_end, source, seed, delta);
        for (node, t) in arrival {
            let candidate_duration = t - seed;
            match duration.get(&node) {
                Some(&existing) if total_cmp(&existing, &candidate_duration) != Ordering::Greater => {}
                _ => {
                    duration.insert(node, candidate_duration);
                }
            }
        }
    }

    Ok(duration)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::link::DiLink;
    use crate::stream::DiStream;

    fn iv(lo: f64, hi: f64) -> Interval<f64> {
        Interval::new(lo, hi, false, true).unwrap()
    }

    #[test]
    fn departing_at_the_contact_itself_beats_the_fixed_lower_bound() {
        // waiting is free at the source: a hop at (0,1] taken from a source
        // allowed to depart no earlier than 0 has duration 1 (delta), not
        // `arrival - 0`; that's what makes "fastest" differ from "earliest
        // arrival minus a fixed start".
        let mut s: DiStream<&str, f64> = DiStream::new(1.0);
        s.add(DiLink::new(iv(0.0, 1.0), "a", "b").unwrap()).unwrap();
        s.add(DiLink::new(iv(0.0, 1.0), "a", "c").unwrap()).unwrap();
        s.add(DiLink::new(iv(1.0, 2.0), "b", "c").unwrap()).unwrap();
        let duration = fastest_path_duration(&s, &"a", 0.0, Some(iv(0.0, 10.0))).unwrap();
        assert_eq!(duration.get("b"), Some(&1.0));
        assert_eq!(duration.get("c"), Some(&1.0));
    }

    #[test]
    fn one_pass_and_multipass_agree() {
        let mut s: DiStream<&str, f64> = DiStream::new(1.0);
        s.add(DiLink::new(iv(0.0, 1.0), "a", "b").unwrap()).unwrap();
        s.add(DiLink::new(iv(0.0, 1.0), "a", "c").unwrap()).unwrap();
        s.add(DiLink::new(iv(1.0, 2.0), "b", "c").unwrap()).unwrap();
        s.add(DiLink::new(iv(1.0, 2.0), "b", "d").unwrap()).unwrap();

        let one_pass = fastest_path_duration(&s, &"a", 0.0, Some(iv(0.0, 10.0))).unwrap();
        #[allow(deprecated)]
        let multipass = fastest_path_duration_multipass(&s, &"a", 0.0, Some(iv(0.0, 10.0))).unwrap();

        let mut nodes: Vec<&str> = one_pass.keys().cloned().collect();
        nodes.sort();
        let mut multipass_nodes: Vec<&str> = multipass.keys().cloned().collect();
        multipass_nodes.sort();
        assert_eq!(nodes, multipass_nodes);
        for node in nodes {
            assert_eq!(one_pass.get(node), multipass.get(node));
        }
        assert_eq!(one_pass.get("d"), Some(&2.0));
    }

    #[test]
    fn unreachable_node_is_absent() {
        let mut s: DiStream<&str, f64> = DiStream::new(1.0);
        s.add(DiLink::new(iv(0.0, 1.0), "a", "b").unwrap()).unwrap();
        s.add(DiLink::new(iv(0.0, 1.0), "c", "d").unwrap()).unwrap();
        let duration = fastest_path_duration(&s, &"a", 0.0, None).unwrap();
        assert!(!duration.contains_key("c"));
    }

    #[test]
    fn worked_example_from_the_specification() {
        // links (0,2]:0->1, (10,12]:1->2, (0,2]:2->0, delta=1; from 0 to 2,
        // duration = 10 (depart 0 at t=2, arrive 2 at t=12).
        let mut s: DiStream<&str, f64> = DiStream::new(1.0);
        s.add(DiLink::new(iv(0.0, 2.0), "0", "1").unwrap()).unwrap();
        s.add(DiLink::new(iv(10.0, 12.0), "1", "2").unwrap()).unwrap();
        s.add(DiLink::new(iv(0.0, 2.0), "2", "0").unwrap()).unwrap();
        let duration = fastest_path_duration(&s, &"0", 0.0, Some(iv(0.0, 12.0))).unwrap();
        assert_eq!(duration.get("2"), Some(&10.0));
    }
}
