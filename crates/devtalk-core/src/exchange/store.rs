//! SessionStore trait definition.
//!
//! Provides persistence for sessions and their append-only message logs.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use devtalk_types::error::StoreError;
use devtalk_types::message::Message;
use devtalk_types::session::Session;
use uuid::Uuid;

/// Repository trait for session and message persistence.
///
/// Implementations live in devtalk-infra (e.g., `SqliteSessionStore`).
/// The store exclusively owns the set of live sessions, keyed by id, and
/// each session's message log. Logs are append-only: no method reorders,
/// edits, or removes messages.
pub trait SessionStore: Send + Sync {
    /// Persist a new session record.
    fn create_session(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Get a session by its unique ID.
    fn get_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Session>, StoreError>> + Send;

    /// Update an existing session (status changes).
    fn update_session(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// List sessions, newest first.
    fn list_sessions(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Session>, StoreError>> + Send;

    /// Append a message to its session's log, atomically incrementing the
    /// session's message_count.
    fn save_message(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Get messages for a session in conversation order.
    fn get_messages(
        &self,
        session_id: &Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Get the total number of messages in a session.
    fn message_count(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u32, StoreError>> + Send;

    /// Count total sessions.
    fn count_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;

    /// Count total messages across all sessions.
    fn count_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
