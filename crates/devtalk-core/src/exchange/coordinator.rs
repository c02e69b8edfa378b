//! Exchange coordinator: the session + message state machine.
//!
//! One `submit` call drives one exchange through its phases:
//! `submitted -> dispatched -> {completed, failed}`. The user message is
//! appended before the responder is invoked and is never rolled back; a
//! responder failure is absorbed into the log as a `Failed` placeholder
//! reply instead of surfacing as an error.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use devtalk_types::error::{ExchangeError, StoreError};
use devtalk_types::message::{Message, MessageRole, MessageStatus};
use devtalk_types::session::{Session, SessionStatus};

use crate::clock::Clock;
use crate::exchange::responder::Responder;
use crate::exchange::store::SessionStore;

/// Fixed reply content recorded when the responder fails or times out.
/// Signals the client to retry; the failure itself is carried by the
/// message's `failed` status.
pub const FALLBACK_CONTENT: &str =
    "I couldn't generate a response. Please try sending your message again.";

/// Phase of a single exchange attempt, for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExchangePhase {
    Submitted,
    Dispatched,
    Completed,
    Failed,
}

impl std::fmt::Display for ExchangePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExchangePhase::Submitted => write!(f, "submitted"),
            ExchangePhase::Dispatched => write!(f, "dispatched"),
            ExchangePhase::Completed => write!(f, "completed"),
            ExchangePhase::Failed => write!(f, "failed"),
        }
    }
}

/// Coordinates session lifecycle and message exchanges.
///
/// Generic over `SessionStore`, `Responder`, and `Clock` to maintain clean
/// architecture (devtalk-core never depends on devtalk-infra).
///
/// Submits for the same session are strictly serialized through a
/// per-session mutex: the log gains each user message and its reply as an
/// adjacent pair, in arrival order. Submits for different sessions share no
/// state and run concurrently.
pub struct ExchangeCoordinator<S: SessionStore, R: Responder, C: Clock> {
    store: S,
    responder: R,
    clock: C,
    responder_timeout: Duration,
    /// Per-session locks, keyed by session id. tokio's Mutex queues waiters
    /// in FIFO order, which is what gives arrival-order processing.
    session_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl<S: SessionStore, R: Responder, C: Clock> ExchangeCoordinator<S, R, C> {
    pub fn new(store: S, responder: R, clock: C, responder_timeout: Duration) -> Self {
        Self {
            store,
            responder,
            clock,
            responder_timeout,
            session_locks: DashMap::new(),
        }
    }

    /// Access the underlying store (for read-side boundary queries).
    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Session lifecycle ---

    /// Create a new session.
    ///
    /// Returns the session with status `Ok` when the record was persisted,
    /// or status `Failed` when the store could not create it. A `Failed`
    /// session is not usable; there is no retry-in-place -- the client must
    /// request a new session.
    pub async fn create_session(&self) -> Session {
        let mut session = Session {
            id: Uuid::now_v7(),
            status: SessionStatus::Creating,
            created_at: self.clock.now(),
            message_count: 0,
        };

        session.status = SessionStatus::Ok;
        match self.store.create_session(&session).await {
            Ok(()) => {
                info!(session_id = %session.id, "Session created");
                session
            }
            Err(e) => {
                warn!(session_id = %session.id, error = %e, "Session creation failed");
                session.status = SessionStatus::Failed;
                session
            }
        }
    }

    /// Get a session by ID.
    pub async fn get_session(&self, session_id: &Uuid) -> Result<Option<Session>, StoreError> {
        self.store.get_session(session_id).await
    }

    /// Get a session's messages in conversation order.
    pub async fn get_messages(
        &self,
        session_id: &Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Message>, StoreError> {
        self.store.get_messages(session_id, limit, offset).await
    }

    // --- The exchange state machine ---

    /// Submit a user message and return the assistant reply.
    ///
    /// The returned message carries the outcome in its `status` field: `Ok`
    /// with the responder's content, or `Failed` with [`FALLBACK_CONTENT`]
    /// when the responder errored or timed out. Only precondition violations
    /// (empty content, unavailable session) and store append failures are
    /// returned as errors, and none of those leave a partial append behind.
    pub async fn submit(
        &self,
        session_id: Uuid,
        content: &str,
        client_message_id: Option<Uuid>,
    ) -> Result<Message, ExchangeError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ExchangeError::InvalidRequest(
                "content must not be empty".to_string(),
            ));
        }

        // Serialize submits per session. The guard spans both appends so no
        // reader or later submit observes a user message without its reply.
        let lock = self.lock_for(session_id);
        let _guard = lock.lock().await;

        debug!(session_id = %session_id, phase = %ExchangePhase::Submitted, "Exchange accepted");

        let session = self
            .store
            .get_session(&session_id)
            .await
            .map_err(|e| {
                warn!(session_id = %session_id, error = %e, "Session lookup failed");
                ExchangeError::SessionUnavailable
            })?
            .ok_or(ExchangeError::SessionUnavailable)?;

        if session.status != SessionStatus::Ok {
            return Err(ExchangeError::SessionUnavailable);
        }

        let user_message = Message {
            id: client_message_id.unwrap_or_else(Uuid::now_v7),
            session_id,
            role: MessageRole::User,
            content: content.to_string(),
            status: MessageStatus::Ok,
            created_at: self.clock.now(),
        };
        self.store.save_message(&user_message).await?;

        debug!(
            session_id = %session_id,
            message_id = %user_message.id,
            phase = %ExchangePhase::Dispatched,
            responder = self.responder.name(),
            "User message appended, invoking responder"
        );

        // The user message is durable from here on. A history read failure
        // degrades to answering from the new message alone rather than
        // erroring out of the exchange.
        let history = match self.store.get_messages(&session_id, None, None).await {
            Ok(history) => history,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "History read failed");
                vec![user_message.clone()]
            }
        };

        let reply =
            match tokio::time::timeout(self.responder_timeout, self.responder.respond(&history))
                .await
            {
                Ok(Ok(reply_content)) => Message {
                    id: Uuid::now_v7(),
                    session_id,
                    role: MessageRole::Ai,
                    content: reply_content,
                    status: MessageStatus::Ok,
                    created_at: self.clock.now(),
                },
                Ok(Err(e)) => {
                    warn!(
                        session_id = %session_id,
                        phase = %ExchangePhase::Failed,
                        responder = self.responder.name(),
                        error = %e,
                        "Responder failed, recording placeholder reply"
                    );
                    self.failed_reply(session_id)
                }
                Err(_) => {
                    warn!(
                        session_id = %session_id,
                        phase = %ExchangePhase::Failed,
                        responder = self.responder.name(),
                        timeout_ms = self.responder_timeout.as_millis() as u64,
                        "Responder timed out, recording placeholder reply"
                    );
                    self.failed_reply(session_id)
                }
            };

        if let Err(e) = self.store.save_message(&reply).await {
            error!(session_id = %session_id, error = %e, "Reply append failed");
            return Err(ExchangeError::Store(e));
        }

        if reply.status == MessageStatus::Ok {
            debug!(
                session_id = %session_id,
                message_id = %reply.id,
                phase = %ExchangePhase::Completed,
                "Exchange completed"
            );
        }

        Ok(reply)
    }

    /// Build the fixed placeholder reply for a failed or timed-out exchange.
    fn failed_reply(&self, session_id: Uuid) -> Message {
        Message {
            id: Uuid::now_v7(),
            session_id,
            role: MessageRole::Ai,
            content: FALLBACK_CONTENT.to_string(),
            status: MessageStatus::Failed,
            created_at: self.clock.now(),
        }
    }

    fn lock_for(&self, session_id: Uuid) -> Arc<Mutex<()>> {
        self.session_locks
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
