use thiserror::Error;

/// Errors from session store operations (used by trait definitions in devtalk-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by `submit` before or instead of touching the log.
///
/// Responder failures are deliberately absent here: once the user message is
/// appended, a responder failure is absorbed into the log as a `Failed`
/// placeholder message rather than returned as an error.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Content was empty or whitespace-only. Nothing was appended; the
    /// client may resubmit corrected input.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The session is missing or not in `Ok` status. Nothing was appended;
    /// the client must create a new session.
    #[error("session unavailable")]
    SessionUnavailable,

    /// The store failed after preconditions passed (append or update).
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
