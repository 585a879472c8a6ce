//! Error types for the prediction core.
//!
//! Each failure kind is its own variant so callers can give a distinct
//! diagnostic for an unknown region, a bad mode, a malformed argument, or a
//! broken snapshot.

/// Errors that can occur while building the catalog or running the model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// No region with this name exists in the catalog.
    #[error("no such region: {name}")]
    NotFound {
        /// The name that was looked up, as given by the caller.
        name: String,
    },

    /// The update mode is not `major` or `minor`.
    #[error("no such update: {mode}")]
    InvalidMode {
        /// The rejected mode string.
        mode: String,
    },

    /// A numeric argument was malformed or out of range.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// The regions snapshot was empty, malformed, or inconsistent.
    #[error("data error: {reason}")]
    Data {
        /// What was wrong with the snapshot.
        reason: String,
    },

    /// A checked decimal or integer operation overflowed.
    #[error("arithmetic overflow while computing {context}")]
    Overflow {
        /// The computation that overflowed.
        context: &'static str,
    },
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] carrying the given name.
    pub fn not_found(name: &str) -> Self {
        Self::NotFound {
            name: name.to_owned(),
        }
    }

    /// Shorthand for a [`CoreError::Data`] error.
    pub fn data(reason: impl Into<String>) -> Self {
        Self::Data {
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`CoreError::InvalidInput`] error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
