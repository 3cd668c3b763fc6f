//! Errors for filters and composite slicing (C7)

/// Filter result type
pub type FilterResult<T> = std::result::Result<T, FilterError>;

/// Errors raised while slicing a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// An unknown `first` strategy selector was passed to composite slicing
    UnknownStrategy(String),
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("filter error: ")?;
        match self {
            FilterError::UnknownStrategy(s) => f.write_fmt(format_args!(
                "unknown slicing strategy {:?}, expected \"node\" or \"time\"",
                s
            )),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
