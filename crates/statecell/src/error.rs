#![forbid(unsafe_code)]

//! Errors surfaced by a notification pass.

use std::fmt;

/// Error type returned by fallible subscribers.
pub type UpdateError = Box<dyn std::error::Error + 'static>;

/// Result alias for subscriber callbacks and handlers.
pub type UpdateResult = Result<(), UpdateError>;

/// Errors from [`ObservableRecord::change`](crate::ObservableRecord::change).
#[derive(Debug)]
pub enum ChangeError {
    /// A subscriber failed. Subscribers after `position` were not notified.
    Subscriber {
        /// Index of the failing subscriber in the list at the time it ran.
        position: usize,
        /// The error the subscriber returned.
        source: UpdateError,
    },
}

impl ChangeError {
    /// Index of the subscriber that stopped the pass.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            Self::Subscriber { position, .. } => *position,
        }
    }
}

impl fmt::Display for ChangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subscriber { position, source } => {
                write!(f, "subscriber #{position} failed: {source}")
            }
        }
    }
}

impl std::error::Error for ChangeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Subscriber { source, .. } => Some(source.as_ref()),
        }
    }
}
