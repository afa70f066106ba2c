//! Query error types.
//!
//! Every provider surfaces hard failures through [`QueryError`]. Provider
//! reported errors that have a clear one-line rendering never reach this type;
//! they are formatted into the status line instead.

/// Unified error type for Querybot providers.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// A required credential or ID is missing from the configuration.
    #[error("{provider} requires `{setting}` to be set")]
    Config {
        provider: &'static str,
        setting: &'static str,
    },

    /// The HTTP request itself failed (connect, TLS, timeout, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not parse as the expected format.
    #[error("failed to decode {provider} response: {reason}")]
    Decode {
        provider: &'static str,
        reason: String,
    },

    /// The provider flagged an application error with no status-line form.
    #[error("{provider} reported an error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// Geocoding found no match for the query.
    #[error("Unable to find {0}")]
    PlaceNotFound(String),

    /// The caller passed something no provider can use.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl QueryError {
    /// Build a [`QueryError::Decode`] from any displayable parse error.
    pub fn decode(provider: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            provider,
            reason: err.to_string(),
        }
    }
}

/// Convenience alias used throughout Querybot.
pub type Result<T> = std::result::Result<T, QueryError>;
