//! Timeline assembly errors.

/// Errors raised while parsing annotations and computing wall-clock times.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    /// A bracketed range token in a file name could not be parsed.
    #[error("Malformed segment spec '{token}' in '{file}': {reason}")]
    MalformedSegmentSpec {
        file: String,
        token: String,
        reason: String,
    },

    /// The date-adjustment directive is neither a delta list nor a date.
    #[error("Ambiguous timestamp adjustment '{directive}': {reason}")]
    AmbiguousAdjustmentDirective { directive: String, reason: String },

    /// Calendar arithmetic left the representable date range.
    #[error("Date out of range while {what}")]
    DateOutOfRange { what: String },
}

impl TimelineError {
    /// Create a malformed segment spec error.
    pub fn malformed(
        file: impl Into<String>,
        token: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedSegmentSpec {
            file: file.into(),
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Create an ambiguous directive error.
    pub fn ambiguous(directive: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AmbiguousAdjustmentDirective {
            directive: directive.into(),
            reason: reason.into(),
        }
    }

    /// Create an out-of-range error.
    pub fn out_of_range(what: impl Into<String>) -> Self {
        Self::DateOutOfRange { what: what.into() }
    }
}

/// Result type for timeline operations.
pub type TimelineResult<T> = Result<T, TimelineError>;
