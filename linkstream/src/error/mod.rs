//! Error types for `linkstream`
//!
//! Each failure-prone subsystem gets its own enum with a hand-written
//! `Display` and `std::error::Error` impl; there is no central "god" error
//! type, mirroring how the subsystems themselves are composed.

mod airbt;
mod filter;
mod interval;
mod path;
mod stream;

pub use airbt::*;
pub use filter::*;
pub use interval::*;
pub use path::*;
pub use stream::*;
