//! Contract error types for beta settings
//!
//! Transport details stay with the backend; only human-readable messages
//! cross into these types.

use thiserror::Error;

/// Failure of a save attempt. The local draft is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The mutation call failed (network, auth, server)
    #[error("{message}")]
    Transport {
        /// Message surfaced to the user
        message: String,
    },
}

/// Failures of non-submit controller operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Remote settings have not been received yet
    #[error("Settings are still loading")]
    NotLoaded,

    /// Field is not part of the declared flag catalog
    #[error("Unknown feature flag: {name}")]
    UnknownField {
        /// Flag name from the patch
        name: String,
    },

    /// Flag is declared but the administrator has not enabled it
    #[error("Feature flag is not available for editing: {name}")]
    Hidden {
        /// Flag name from the patch
        name: String,
    },

    /// Value does not match the flag's declared kind
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// Flag name
        field: String,
        /// Validator message
        message: String,
    },

    /// Fetching remote settings or permissions failed
    #[error("Failed to fetch beta feature settings: {message}")]
    Fetch {
        /// Backend message
        message: String,
    },
}
