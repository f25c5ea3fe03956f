use thiserror::Error;

/// Error raised by a caller-supplied filter callback.
pub type FilterError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ReplaceError {
    /// Malformed needle, replacement, root or options.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("There must be an equal number of needles and replacements (got {needles} needles and {replacements} replacements)")]
    LengthMismatch { needles: usize, replacements: usize },

    /// A filter callback failed; nodes mutated before the failure stay mutated.
    #[error("filter callback failed: {0}")]
    Filter(#[source] FilterError),
}

impl ReplaceError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ReplaceError::InvalidArgument {
            message: message.into(),
        }
    }

    /// True for errors raised while validating arguments, before the tree is
    /// touched.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            ReplaceError::InvalidArgument { .. } | ReplaceError::LengthMismatch { .. }
        )
    }
}
