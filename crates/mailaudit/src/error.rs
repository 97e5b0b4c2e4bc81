//! Error types for mail monitor operations.

/// Boxed error returned by a [`Transport`](crate::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for mail monitor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Mail monitor error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Encoding the request or decoding the response failed.
    #[error("Feed error: {0}")]
    Feed(#[from] mailaudit_feed::Error),

    /// The transport could not complete the request.
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The service answered with a status outside the 2xx range.
    ///
    /// The body is passed through as-is.
    #[error("{body}")]
    RemoteRejection {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

impl Error {
    /// Wraps a transport failure.
    #[must_use]
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }

    /// Returns the HTTP status for a rejected request.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRejection { status, .. } => Some(*status),
            _ => None,
        }
    }
}
