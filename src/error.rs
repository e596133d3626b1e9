//! Router error definitions.

use thiserror::Error;

pub use crate::location::DecodingError;

/// Error type returned by listeners and fallible matchers.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the router.
///
/// Nothing is retried or swallowed: a failing listener or matcher aborts the
/// rest of the current dispatch pass and the error reaches the caller of
/// `set`, `navigate`, `dispatch` or `subscribe`.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A pathname could not be percent-decoded.
    #[error(transparent)]
    Decoding(#[from] DecodingError),

    /// A subscription was built without a matcher or listener.
    #[error("Invalid subscriber: {0}")]
    InvalidSubscriber(String),

    /// A listener returned an error.
    #[error("Listener failed: {0}")]
    Listener(#[source] ListenerError),

    /// A matcher returned an error.
    #[error("Matcher failed for {pathname:?}: {source}")]
    Matcher {
        pathname: String,
        #[source]
        source: ListenerError,
    },

    /// A `location` attribute could not be read as a location.
    #[error("Invalid location attribute: {0}")]
    InvalidLocation(#[source] serde_json::Error),

    /// Nested dispatch passes exceeded the configured limit.
    #[error("Dispatch nesting exceeded limit of {limit}")]
    DispatchDepthExceeded { limit: usize },
}

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoding_message_is_preserved() {
        let err: RouterError = DecodingError::new("/test%").into();
        assert_eq!(err.to_string(), "Pathname \"/test%\" could not be decoded.");
        assert!(matches!(err, RouterError::Decoding(_)));
    }

    #[test]
    fn test_listener_source() {
        let err = RouterError::Listener("boom".into());
        assert_eq!(err.to_string(), "Listener failed: boom");
        assert!(std::error::Error::source(&err).is_some());
    }
}
