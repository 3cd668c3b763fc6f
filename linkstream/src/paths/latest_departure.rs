//! Latest departure time (§4.9): the time-reversed dual of earliest arrival
//! — for a fixed target and deadline, the latest instant each other node can
//! depart from and still reach the target by that deadline.

use crate::contacts::{ordered_contacts, Order};
use crate::error::PathResult;
use crate::interval::{total_cmp, Bound, Interval};
use crate::paths::window::{require_known, scan_window};
use crate::stream::{Directedness, LinkStream};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Latest departure time from every node that can still reach `target` by
/// `deadline`, scanning `time_bound` (defaulting to the stream's full
/// presence interval) backwards in time. `target` itself maps to `deadline`;
/// nodes that cannot reach it within the window are absent from the result.
pub fn latest_departure<N, B, D>(
    stream: &LinkStream<N, B, D>,
    target: &N,
    deadline: B,
    time_bound: Option<Interval<B>>,
) -> PathResult<HashMap<N, B>>
where
    N: Eq + Hash + Ord + Clone,
    B: Bound,
    D: Directedness<N, B>,
{
    require_known(stream, target)?;
    let (window, scan_start, _scan_end) = scan_window(stream, time_bound)?;
    let delta = stream.instant_duration();

    let mut departure: HashMap<N, B> = HashMap::new();
    departure.insert(target.clone(), deadline);

    for contact in ordered_contacts(stream, &window, Order::Descending) {
        if total_cmp(&contact.t, &scan_start) == Ordering::Less {
            break;
        }
        // link u -> v traversed at instant `contact.t`: this is a candidate
        // departure from u iff the walk can still reach v's known departure
        // window, i.e. the hop lands no later than v's departure bound.
        let Some(&dv) = departure.get(&contact.v) else {
            continue;
        };
        let arrival = contact.t + delta;
        if total_cmp(&arrival, &dv) == Ordering::Greater {
            continue;
        }
        match departure.get(&contact.u) {
            Some(&existing) if total_cmp(&existing, &contact.t) != Ordering::Less => {}
            _ => {
                departure.insert(contact.u.clone(), contact.t);
            }
        }
    }

    Ok(departure)
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
    fn chain_of_links_propagates_latest_departure() {
        let mut s: DiStream<&str, f64> = DiStream::new(1.0);
        s.add(DiLink::new(iv(0.0, 1.0), "a", "b").unwrap()).unwrap();
        s.add(DiLink::new(iv(1.0, 2.0), "b", "c").unwrap()).unwrap();
        s.add(DiLink::new(iv(3.0, 4.0), "c", "d").unwrap()).unwrap();
        let departure = latest_departure(&s, &"d", 5.0, Some(iv(0.0, 10.0))).unwrap();
        assert_eq!(departure.get("d"), Some(&5.0));
        assert_eq!(departure.get("c"), Some(&4.0));
        assert_eq!(departure.get("b"), Some(&2.0));
        assert_eq!(departure.get("a"), Some(&1.0));
    }

    #[test]
    fn a_hop_that_misses_the_deadline_is_not_a_valid_departure() {
        let mut s: DiStream<&str, f64> = DiStream::new(1.0);
        s.add(DiLink::new(iv(0.0, 1.0), "a", "b").unwrap()).unwrap();
        // b->c lands at 4.0, past a deadline of 3.0 at c: a cannot use it.
        s.add(DiLink::new(iv(3.0, 4.0), "b", "c").unwrap()).unwrap();
        let departure = latest_departure(&s, &"c", 3.0, Some(iv(0.0, 10.0))).unwrap();
        assert!(!departure.contains_key("b"));
        assert!(!departure.contains_key("a"));
    }

    #[test]
    fn unknown_target_is_rejected() {
        let s: DiStream<&str, f64> = DiStream::new(1.0);
        assert!(latest_departure(&s, &"z", 0.0, None).is_err());
    }

    #[test]
    fn worked_example_from_the_specification() {
        // links (0,9]:0->2, (0,5]:1->2, (3,11]:0->1, delta=1; to target 2,
        // departure[0] = 9.
        let mut s: DiStream<&str, f64> = DiStream::new(1.0);
        s.add(DiLink::new(iv(0.0, 9.0), "0", "2").unwrap()).unwrap();
        s.add(DiLink::new(iv(0.0, 5.0), "1", "2").unwrap()).unwrap();
        s.add(DiLink::new(iv(3.0, 11.0), "0", "1").unwrap()).unwrap();
        let departure = latest_departure(&s, &"2", 11.0, Some(iv(0.0, 11.0))).unwrap();
        assert_eq!(departure.get("0"), Some(&9.0));
    }
}
