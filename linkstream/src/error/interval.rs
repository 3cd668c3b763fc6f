//! Errors for the interval algebra (C1)

/// Interval result type
pub type IntervalResult<T> = std::result::Result<T, IntervalError>;

/// Errors raised by the interval algebra
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// Construction attempted on a reversed or improperly closed interval
    EmptyInterval { lo_dbg: String, hi_dbg: String },

    /// `merge` was called on intervals that neither overlap nor are adjacent
    /// with matching closures
    NonOverlapping,

    /// `cut` was called on intervals whose intersection is empty
    Disjoint,

    /// `split_in_instants` was called with a non-positive step
    NonPositiveStep,
}

impl std::fmt::Display for IntervalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("interval error: ")?;
        match self {
            IntervalError::EmptyInterval { lo_dbg, hi_dbg } => f.write_fmt(format_args!(
                "invalid interval [{}; {}): lo must be <= hi, and a zero-length interval must be closed on both sides",
                lo_dbg, hi_dbg
            )),
            IntervalError::NonOverlapping => {
                f.write_str("cannot merge intervals that neither overlap nor are adjacent")
            }
            IntervalError::Disjoint => f.write_str("cannot cut disjoint intervals"),
            IntervalError::NonPositiveStep => {
                f.write_str("split_in_instants requires a strictly positive step")
            }
        }
    }
}

impl std::error::Error for IntervalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
