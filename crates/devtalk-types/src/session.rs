//! Session types for DevTalk conversations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Establishment outcome of a session.
///
/// Reflects whether the session record itself could be created, not the
/// outcome of any message exchange. Maps to the CHECK constraint in the
/// SQLite schema: `CHECK (status IN ('creating', 'ok', 'failed'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Creating,
    Ok,
    Failed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Creating => write!(f, "creating"),
            SessionStatus::Ok => write!(f, "ok"),
            SessionStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "creating" => Ok(SessionStatus::Creating),
            "ok" => Ok(SessionStatus::Ok),
            "failed" => Ok(SessionStatus::Failed),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Creating
    }
}

/// A server-tracked conversation context.
///
/// The session owns its ordered message log (held by the store, keyed by
/// session id, append-only). `message_count` is maintained atomically with
/// each append. A session whose status is `Failed` has an empty log: no
/// exchange may occur before a session exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub message_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_roundtrip() {
        for status in [
            SessionStatus::Creating,
            SessionStatus::Ok,
            SessionStatus::Failed,
        ] {
            let s = status.to_string();
            let parsed: SessionStatus = s.parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_session_status_case_insensitive() {
        assert_eq!("OK".parse::<SessionStatus>().unwrap(), SessionStatus::Ok);
        assert_eq!(
            "Failed".parse::<SessionStatus>().unwrap(),
            SessionStatus::Failed
        );
        assert!("active".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_session_status_default() {
        assert_eq!(SessionStatus::default(), SessionStatus::Creating);
    }

    #[test]
    fn test_session_serialize() {
        let session = Session {
            id: Uuid::now_v7(),
            status: SessionStatus::Ok,
            created_at: Utc::now(),
            message_count: 4,
        };
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"message_count\":4"));
    }
}
