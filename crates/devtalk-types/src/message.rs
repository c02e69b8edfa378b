//! Message types for DevTalk conversations.
//!
//! A message records one chat turn: who said it, what was said, and whether
//! the turn succeeded. Messages are immutable once constructed -- a failed
//! exchange is recorded as a *new* message with `Failed` status, never by
//! mutating an existing one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Who authored a message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'ai'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Ai,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Ai => write!(f, "ai"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "ai" => Ok(MessageRole::Ai),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// Outcome of the turn a message records.
///
/// `Pending` exists for turns whose outcome is not yet known; at rest the
/// log only contains `Ok` and `Failed` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Ok,
    Pending,
    Failed,
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStatus::Ok => write!(f, "ok"),
            MessageStatus::Pending => write!(f, "pending"),
            MessageStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for MessageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ok" => Ok(MessageStatus::Ok),
            "pending" => Ok(MessageStatus::Pending),
            "failed" => Ok(MessageStatus::Failed),
            other => Err(format!("invalid message status: '{other}'")),
        }
    }
}

/// A single message within a session.
///
/// Ordered by `created_at` (with `id` as tiebreaker -- UUIDv7 ids are
/// time-sortable) within a session. `content` is empty only in failure
/// placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Ai] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_case_insensitive() {
        assert_eq!("USER".parse::<MessageRole>().unwrap(), MessageRole::User);
        assert_eq!("AI".parse::<MessageRole>().unwrap(), MessageRole::Ai);
        assert!("assistant".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_message_status_roundtrip() {
        for status in [
            MessageStatus::Ok,
            MessageStatus::Pending,
            MessageStatus::Failed,
        ] {
            let s = status.to_string();
            let parsed: MessageStatus = s.parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_message_status_case_insensitive() {
        assert_eq!(
            "FAILED".parse::<MessageStatus>().unwrap(),
            MessageStatus::Failed
        );
        assert!("crashed".parse::<MessageStatus>().is_err());
    }

    #[test]
    fn test_message_status_serde() {
        let json = serde_json::to_string(&MessageStatus::Failed).unwrap();
        assert_eq!(json, "\"failed\"");
        let parsed: MessageStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageStatus::Failed);
    }

    #[test]
    fn test_message_serialize() {
        let message = Message {
            id: Uuid::now_v7(),
            session_id: Uuid::now_v7(),
            role: MessageRole::Ai,
            content: "hi there".to_string(),
            status: MessageStatus::Ok,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("\"role\":\"ai\""));
        assert!(json.contains("\"status\":\"ok\""));
    }
}
