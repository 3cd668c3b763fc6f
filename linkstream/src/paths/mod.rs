//! Minimum-temporal-path algorithms (C9, §4.9): earliest arrival, latest
//! departure, shortest path (hop count), and fastest path (duration), each
//! driven by a single scan of the ordered contact stream (§4.8).

mod earliest_arrival;
mod fastest_path;
mod latest_departure;
mod pareto;
mod shortest_path;
mod window;

pub use earliest_arrival::earliest_arrival;
pub use fastest_path::{fastest_path_duration, fastest_path_duration_multipass};
pub use latest_departure::latest_departure;
pub use shortest_path::shortest_path_distance;
