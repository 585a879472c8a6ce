//! Error types for the Augur session.
//!
//! [`EngineError`] wraps the failures of the crates below it so that the
//! session surface can return one type while keeping each kind distinct.

use augur_core::CoreError;
use augur_feed::FeedError;

/// Top-level error for session operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A model or catalog operation failed (unknown region, bad mode, bad
    /// input, malformed data, or arithmetic overflow).
    #[error(transparent)]
    Core {
        /// The underlying model error.
        #[from]
        source: CoreError,
    },

    /// Loading the regions dump or querying the API failed.
    #[error(transparent)]
    Feed {
        /// The underlying feed error.
        #[from]
        source: FeedError,
    },

    /// A manual pull was requested while the tracker owns calibration.
    #[error("the tracker is running; stop it before pulling manually")]
    TrackerRunning,

    /// A blocking task panicked or was cancelled.
    #[error("background task failed: {message}")]
    Task {
        /// Description of the failure.
        message: String,
    },
}

impl EngineError {
    /// The model error behind this failure, if there is one.
    pub const fn core(&self) -> Option<&CoreError> {
        match self {
            Self::Core { source } => Some(source),
            Self::Feed { .. } | Self::TrackerRunning | Self::Task { .. } => None,
        }
    }
}
