//! SQLite session store implementation.
//!
//! Implements `SessionStore` from `devtalk-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reads on the reader
//! pool, writes on the single-connection writer pool.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use devtalk_core::exchange::store::SessionStore;
use devtalk_types::error::StoreError;
use devtalk_types::message::{Message, MessageRole, MessageStatus};
use devtalk_types::session::{Session, SessionStatus};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionStore`.
pub struct SqliteSessionStore {
    pool: DatabasePool,
}

impl SqliteSessionStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain Session.
struct SessionRow {
    id: String,
    status: String,
    created_at: String,
    message_count: i64,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            message_count: row.try_get("message_count")?,
        })
    }

    fn into_session(self) -> Result<Session, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Query(format!("invalid session id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;
        let status: SessionStatus = self
            .status
            .parse()
            .map_err(|e: String| StoreError::Query(e))?;

        Ok(Session {
            id,
            status,
            created_at,
            message_count: self.message_count as u32,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain Message.
struct MessageRow {
    id: String,
    session_id: String,
    role: String,
    content: String,
    status: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<Message, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Query(format!("invalid message id: {e}")))?;
        let session_id = Uuid::parse_str(&self.session_id)
            .map_err(|e| StoreError::Query(format!("invalid session_id: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| StoreError::Query(e))?;
        let status: MessageStatus = self
            .status
            .parse()
            .map_err(|e: String| StoreError::Query(e))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Message {
            id,
            session_id,
            role,
            content: self.content,
            status,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// SessionStore implementation
// ---------------------------------------------------------------------------

impl SessionStore for SqliteSessionStore {
    async fn create_session(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO sessions (id, status, created_at, message_count)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(session.id.to_string())
        .bind(session.status.to_string())
        .bind(format_datetime(&session.created_at))
        .bind(session.message_count as i64)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_session(&self, session_id: &Uuid) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let session_row =
                    SessionRow::from_row(&row).map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn update_session(&self, session: &Session) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"UPDATE sessions
               SET status = ?, message_count = ?
               WHERE id = ?"#,
        )
        .bind(session.status.to_string())
        .bind(session.message_count as i64)
        .bind(session.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn list_sessions(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Session>, StoreError> {
        let mut sql = String::from("SELECT * FROM sessions ORDER BY created_at DESC, id DESC");

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in &rows {
            let session_row =
                SessionRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            sessions.push(session_row.into_session()?);
        }

        Ok(sessions)
    }

    async fn save_message(&self, message: &Message) -> Result<(), StoreError> {
        // Message insert and count increment commit together so readers
        // never see them disagree.
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO messages (id, session_id, role, content, status, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.session_id.to_string())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(message.status.to_string())
        .bind(format_datetime(&message.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let result =
            sqlx::query("UPDATE sessions SET message_count = message_count + 1 WHERE id = ?")
                .bind(message.session_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_messages(
        &self,
        session_id: &Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Message>, StoreError> {
        let mut sql = String::from(
            "SELECT * FROM messages WHERE session_id = ? ORDER BY created_at ASC, id ASC",
        );

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        let rows = sqlx::query(&sql)
            .bind(session_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }

    async fn message_count(&self, session_id: &Uuid) -> Result<u32, StoreError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages WHERE session_id = ?")
            .bind(session_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(row.0 as u32)
    }

    async fn count_sessions(&self) -> Result<u64, StoreError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(row.0 as u64)
    }

    async fn count_messages(&self) -> Result<u64, StoreError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(row.0 as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> (tempfile::TempDir, SqliteSessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteSessionStore::new(pool))
    }

    fn session() -> Session {
        Session {
            id: Uuid::now_v7(),
            status: SessionStatus::Ok,
            created_at: Utc::now(),
            message_count: 0,
        }
    }

    fn message(session_id: Uuid, role: MessageRole, content: &str) -> Message {
        Message {
            id: Uuid::now_v7(),
            session_id,
            role,
            content: content.to_string(),
            status: MessageStatus::Ok,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let (_dir, store) = test_store().await;
        let session = session();

        store.create_session(&session).await.unwrap();
        let loaded = store.get_session(&session.id).await.unwrap().unwrap();

        assert_eq!(loaded.id, session.id);
        assert_eq!(loaded.status, SessionStatus::Ok);
        assert_eq!(loaded.message_count, 0);
    }

    #[tokio::test]
    async fn test_get_missing_session_is_none() {
        let (_dir, store) = test_store().await;
        assert!(store.get_session(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_session_status() {
        let (_dir, store) = test_store().await;
        let mut session = session();
        store.create_session(&session).await.unwrap();

        session.status = SessionStatus::Failed;
        store.update_session(&session).await.unwrap();

        let loaded = store.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, SessionStatus::Failed);
    }

    #[tokio::test]
    async fn test_update_missing_session_is_not_found() {
        let (_dir, store) = test_store().await;
        let err = store.update_session(&session()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_save_message_increments_count() {
        let (_dir, store) = test_store().await;
        let session = session();
        store.create_session(&session).await.unwrap();

        store
            .save_message(&message(session.id, MessageRole::User, "hello"))
            .await
            .unwrap();
        store
            .save_message(&message(session.id, MessageRole::Ai, "hi there"))
            .await
            .unwrap();

        let loaded = store.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.message_count, 2);
        assert_eq!(store.message_count(&session.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_save_message_without_session_fails() {
        let (_dir, store) = test_store().await;
        let err = store
            .save_message(&message(Uuid::now_v7(), MessageRole::User, "orphan"))
            .await
            .unwrap_err();
        // Foreign key rejects the insert before the count update runs.
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[tokio::test]
    async fn test_get_messages_preserves_order() {
        let (_dir, store) = test_store().await;
        let session = session();
        store.create_session(&session).await.unwrap();

        // Identical created_at values: the UUIDv7 id tiebreaker keeps
        // insertion order.
        let stamp = Utc::now();
        for content in ["one", "two", "three", "four"] {
            let mut m = message(session.id, MessageRole::User, content);
            m.created_at = stamp;
            store.save_message(&m).await.unwrap();
        }

        let messages = store.get_messages(&session.id, None, None).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three", "four"]);
    }

    #[tokio::test]
    async fn test_get_messages_limit_offset() {
        let (_dir, store) = test_store().await;
        let session = session();
        store.create_session(&session).await.unwrap();

        for content in ["a", "b", "c"] {
            store
                .save_message(&message(session.id, MessageRole::User, content))
                .await
                .unwrap();
        }

        let page = store
            .get_messages(&session.id, Some(2), Some(1))
            .await
            .unwrap();
        let contents: Vec<&str> = page.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_message_status_roundtrips_through_storage() {
        let (_dir, store) = test_store().await;
        let session = session();
        store.create_session(&session).await.unwrap();

        let mut failed = message(session.id, MessageRole::Ai, "");
        failed.status = MessageStatus::Failed;
        store.save_message(&failed).await.unwrap();

        let messages = store.get_messages(&session.id, None, None).await.unwrap();
        assert_eq!(messages[0].status, MessageStatus::Failed);
        assert_eq!(messages[0].role, MessageRole::Ai);
    }

    #[tokio::test]
    async fn test_list_sessions_newest_first() {
        let (_dir, store) = test_store().await;

        let mut first = session();
        first.created_at = Utc::now() - chrono::Duration::seconds(10);
        let second = session();
        store.create_session(&first).await.unwrap();
        store.create_session(&second).await.unwrap();

        let sessions = store.list_sessions(None, None).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, second.id);
        assert_eq!(sessions[1].id, first.id);
    }

    #[tokio::test]
    async fn test_counts() {
        let (_dir, store) = test_store().await;
        let session = session();
        store.create_session(&session).await.unwrap();
        store
            .save_message(&message(session.id, MessageRole::User, "hello"))
            .await
            .unwrap();

        assert_eq!(store.count_sessions().await.unwrap(), 1);
        assert_eq!(store.count_messages().await.unwrap(), 1);
    }
}
