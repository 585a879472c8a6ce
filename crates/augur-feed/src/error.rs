//! Error types for upstream API access and document parsing.

use augur_core::CoreError;

/// Errors that can occur while talking to the API or reading its documents.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The request timed out or the connection failed. Worth retrying on
    /// the next poll.
    #[error("transient network error: {message}")]
    Transient {
        /// Description of the failure.
        message: String,
    },

    /// The API answered with a non-success status.
    #[error("API returned {status} for {endpoint}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Which endpoint was queried.
        endpoint: String,
    },

    /// A document was missing, empty, or malformed.
    #[error("data error: {reason}")]
    Data {
        /// What was wrong with the document.
        reason: String,
    },

    /// The regions dump could not be read from disk.
    #[error("failed to read regions dump: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The regions dump parsed but did not form a valid catalog.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: CoreError,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {message}")]
    Client {
        /// Description of the failure.
        message: String,
    },
}

impl FeedError {
    /// Shorthand for a [`FeedError::Data`] error.
    pub fn data(reason: impl Into<String>) -> Self {
        Self::Data {
            reason: reason.into(),
        }
    }

    /// Whether the next poll may succeed without any change on our side.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transient { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Data { .. } | Self::Io { .. } | Self::Catalog { .. } | Self::Client { .. } => {
                false
            }
        }
    }
}

impl From<quick_xml::DeError> for FeedError {
    fn from(source: quick_xml::DeError) -> Self {
        Self::data(format!("malformed XML document: {source}"))
    }
}
