//! Errors for the augmented interval red-black tree (C2, C3)

use crate::error::IntervalError;

/// AIRBT result type
pub type AirbtResult<T> = std::result::Result<T, AirbtError>;

/// Errors raised while building or querying an [`crate::airbt::Tree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirbtError {
    /// The value handed to `add` failed to construct (e.g. an empty interval)
    Interval(IntervalError),
}

impl std::fmt::Display for AirbtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("airbt error: ")?;
        match self {
            AirbtError::Interval(err) => f.write_fmt(format_args!("{}", err)),
        }
    }
}

impl std::error::Error for AirbtError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AirbtError::Interval(err) => Some(err),
        }
    }
}

impl From<IntervalError> for AirbtError {
    fn from(value: IntervalError) -> Self {
        AirbtError::Interval(value)
    }
}
