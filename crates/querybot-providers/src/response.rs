//! The outcome of a single provider call, before formatting.

/// What a provider said, once transport and decoding have succeeded.
///
/// Transport and decode failures never appear here; they travel as
/// [`querybot_core::QueryError`] straight to the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderResponse<T> {
    /// Well-formed payload with at least one usable item.
    Success(T),
    /// Well-formed payload with nothing to show.
    Empty,
    /// The provider flagged an application error (bad query, quota, …).
    ProviderError { code: String, message: String },
    /// Non-success HTTP status with no error payload to explain it.
    HttpStatus(u16),
}

impl<T> ProviderResponse<T> {
    /// `Success(value)` when `has_items` holds, `Empty` otherwise.
    pub fn from_payload(value: T, has_items: impl FnOnce(&T) -> bool) -> Self {
        if has_items(&value) {
            Self::Success(value)
        } else {
            Self::Empty
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
