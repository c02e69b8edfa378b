//! Responder error type.
//!
//! The responder is the external component that generates assistant content
//! for a message history. Its failures never cross the exchange boundary as
//! transport errors -- the coordinator absorbs them into the log as `Failed`
//! placeholder messages -- but the taxonomy is kept precise for logging and
//! for provider-level handling (rate limits, auth).

use thiserror::Error;

/// Errors from responder invocations.
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("responder timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responder_error_display() {
        let err = ResponderError::Provider {
            message: "HTTP 500".to_string(),
        };
        assert_eq!(err.to_string(), "provider error: HTTP 500");

        let err = ResponderError::Timeout { elapsed_ms: 60_000 };
        assert_eq!(err.to_string(), "responder timed out after 60000ms");
    }
}
