//! Errors for the stream dictionary and link stream façade (C5, C6)

use super::FilterError;
use crate::error::{AirbtError, IntervalError};

/// Link-stream result type
pub type StreamResult<T> = std::result::Result<T, StreamError>;

/// Errors raised while mutating or querying a [`crate::stream::LinkStream`]
/// or its underlying [`crate::streamdict::StreamDict`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// A query referenced a node absent from the stream
    UnknownNode,

    /// A directed link was offered to an undirected stream or vice versa
    WrongLinkVariant,

    /// A link was constructed with `u == v`
    SameEndpoints,

    /// A link's interval failed to validate
    Interval(IntervalError),

    /// The underlying tree (C2/C3) rejected an insert
    Airbt(AirbtError),

    /// A composite slice (`LinkStream::slice` and friends) was given an
    /// unknown strategy selector
    Filter(FilterError),
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("stream error: ")?;
        match self {
            StreamError::UnknownNode => f.write_str("node is not present in the stream"),
            StreamError::WrongLinkVariant => {
                f.write_str("link directedness does not match the stream's directedness")
            }
            StreamError::SameEndpoints => f.write_str("a link's two endpoints must differ"),
            StreamError::Interval(err) => f.write_fmt(format_args!("{}", err)),
            StreamError::Airbt(err) => f.write_fmt(format_args!("{}", err)),
            StreamError::Filter(err) => f.write_fmt(format_args!("{}", err)),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Interval(err) => Some(err),
            StreamError::Airbt(err) => Some(err),
            StreamError::Filter(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IntervalError> for StreamError {
    fn from(value: IntervalError) -> Self {
        StreamError::Interval(value)
    }
}

impl From<AirbtError> for StreamError {
    fn from(value: AirbtError) -> Self {
        StreamError::Airbt(value)
    }
}

impl From<FilterError> for StreamError {
    fn from(value: FilterError) -> Self {
        StreamError::Filter(value)
    }
}
