use thiserror::Error;

/// Failures raised by the pattern engines, before a descriptor adds context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid pattern: {reason}")]
    InvalidPattern { reason: String },

    #[error("{reason}")]
    Unparseable { offset: usize, reason: String },

    #[error("unknown time zone '{zone}'")]
    UnknownZone { zone: String },
}

impl FormatError {
    pub(crate) fn unparseable(offset: usize, reason: impl Into<String>) -> Self {
        FormatError::Unparseable {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        FormatError::InvalidPattern {
            reason: reason.into(),
        }
    }
}

pub type FormatResult<T> = Result<T, FormatError>;
