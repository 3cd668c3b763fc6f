//! Shared preconditions for the minimum-temporal-path algorithms (§4.9):
//! resolving the scan window and its first/last instants, and checking that
//! the node the algorithm walks from (or to) is actually in the stream.

use crate::error::{PathError, PathResult};
use crate::interval::{Bound, Interval};
use crate::stream::{Directedness, LinkStream};
use std::hash::Hash;

/// `time_bound`, defaulted per §4.9 to the stream's full presence interval
/// (or a degenerate zero-length window if the stream is empty), together
/// with `start, end`: the first and last instants of
/// `split_in_instants(window, instant_duration)`.
pub(crate) fn scan_window<N, B, D>(
    stream: &LinkStream<N, B, D>,
    time_bound: Option<Interval<B>>,
) -> PathResult<(Interval<B>, B, B)>
where
    N: Eq + Hash + Ord + Clone,
    B: Bound,
    D: Directedness<N, B>,
{
    let window = match time_bound {
        Some(w) => w,
        None => stream
            .presence_full_interval()
            .unwrap_or(Interval::closed(B::default(), B::default()).expect("a doubly-closed zero-length interval is always valid")),
    };
    let (start, end) = crate::contacts::scan_bounds(&window, stream.instant_duration())?;
    Ok((window, start, end))
}

/// The common precondition of every algorithm in §4.9: the walked-from (or
/// walked-to) node must be present in the stream.
pub(crate) fn require_known<N, B, D>(stream: &LinkStream<N, B, D>, node: &N) -> PathResult<()>
where
    N: Eq + Hash + Ord + Clone,
    B: Bound,
    D: Directedness<N, B>,
{
    if stream.contains_node(node) {
        Ok(())
    } else {
        Err(PathError::UnknownSource)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::link::Link;
    use crate::stream::Stream;

    #[test]
    fn scan_window_defaults_to_stream_presence() {
        let mut s: Stream<&str, f64> = Stream::new(1.0);
        s.add(Link::new(Interval::new(0.0, 3.0, false, true).unwrap(), "a", "b").unwrap()).unwrap();
        let (window, start, end) = scan_window(&s, None).unwrap();
        assert_eq!(window, Interval::new(0.0, 3.0, false, true).unwrap());
        assert_eq!(start, 1.0);
        assert_eq!(end, 3.0);
    }

    #[test]
    fn scan_window_honors_an_explicit_bound() {
        let mut s: Stream<&str, f64> = Stream::new(1.0);
        s.add(Link::new(Interval::new(0.0, 3.0, false, true).unwrap(), "a", "b").unwrap()).unwrap();
        let explicit = Interval::new(0.0, 10.0, false, true).unwrap();
        let (window, start, end) = scan_window(&s, Some(explicit)).unwrap();
        assert_eq!(window, explicit);
        assert_eq!(start, 1.0);
        assert_eq!(end, 10.0);
    }

    #[test]
    fn scan_window_on_an_empty_stream_is_degenerate() {
        let s: Stream<&str, f64> = Stream::new(1.0);
        let (_, start, end) = scan_window(&s, None).unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn require_known_rejects_an_absent_node() {
        let s: Stream<&str, f64> = Stream::new(1.0);
        assert!(require_known(&s, &"a").is_err());
    }
}
