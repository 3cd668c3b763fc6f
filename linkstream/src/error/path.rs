//! Errors for minimum-temporal-path algorithms (C9)

use crate::error::{IntervalError, StreamError};

/// Path-algorithm result type
pub type PathResult<T> = std::result::Result<T, PathError>;

/// Errors raised by the minimum-temporal-path algorithms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The source (or target, for latest departure) node is absent from the stream
    UnknownSource,

    /// Propagated stream-level error (e.g. while building the time window)
    Stream(StreamError),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("path error: ")?;
        match self {
            PathError::UnknownSource => {
                f.write_str("source node must be present in the stream")
            }
            PathError::Stream(err) => f.write_fmt(format_args!("{}", err)),
        }
    }
}

impl std::error::Error for PathError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PathError::Stream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StreamError> for PathError {
    fn from(value: StreamError) -> Self {
        PathError::Stream(value)
    }
}

impl From<IntervalError> for PathError {
    fn from(value: IntervalError) -> Self {
        PathError::Stream(value.into())
    }
}
