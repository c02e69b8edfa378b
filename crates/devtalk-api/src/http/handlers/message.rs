//! Message exchange HTTP handler.
//!
//! POST /api/v1/sessions/{id}/messages
//!
//! Triggers one exchange: appends the user message, invokes the responder,
//! and returns the assistant reply. The reply is returned on both the
//! success and recovered-failure paths -- its `status` field carries the
//! outcome. Transport-level errors occur only for precondition violations
//! and malformed input.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use devtalk_types::message::MessageRole;

use crate::http::error::AppError;
use crate::http::handlers::session::parse_uuid;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for message submission.
///
/// `role` and `status` are accepted for wire-shape compatibility and
/// validated case-insensitively, but the server fixes both on the stored
/// message: submitted messages are always `user`/`ok`.
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    /// Client-assigned message id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Must be "USER" (any casing) when present.
    #[serde(default)]
    pub role: Option<String>,
    pub content: String,
    /// Ignored beyond well-formedness; the server sets the stored status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Validate the request body, returning the parsed client message id.
fn validate(body: &PostMessageRequest) -> Result<Option<Uuid>, AppError> {
    if let Some(role) = &body.role {
        let parsed: MessageRole = role
            .parse()
            .map_err(|e: String| AppError::Validation(e))?;
        if parsed != MessageRole::User {
            return Err(AppError::Validation(format!(
                "submitted messages must have role 'user', got '{parsed}'"
            )));
        }
    }

    if let Some(status) = &body.status {
        status
            .parse::<devtalk_types::message::MessageStatus>()
            .map_err(|e: String| AppError::Validation(e))?;
    }

    body.id.as_deref().map(parse_uuid).transpose()
}

/// POST /api/v1/sessions/{id}/messages - Submit a user message.
pub async fn post_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<PostMessageRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;
    let client_message_id = validate(&body)?;

    let reply = state
        .coordinator
        .submit(sid, &body.content, client_message_id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let reply_json = serde_json::to_value(&reply)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let resp = ApiResponse::success(reply_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}/messages"))
        .with_link("session", &format!("/api/v1/sessions/{session_id}"));

    Ok(Json(resp))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: Option<&str>, role: Option<&str>, status: Option<&str>) -> PostMessageRequest {
        PostMessageRequest {
            id: id.map(str::to_string),
            role: role.map(str::to_string),
            content: "hello".to_string(),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_minimal_body() {
        assert_eq!(validate(&body(None, None, None)).unwrap(), None);
    }

    #[test]
    fn test_validate_role_case_insensitive() {
        assert!(validate(&body(None, Some("USER"), None)).is_ok());
        assert!(validate(&body(None, Some("user"), None)).is_ok());
    }

    #[test]
    fn test_validate_rejects_ai_role() {
        assert!(validate(&body(None, Some("AI"), None)).is_err());
        assert!(validate(&body(None, Some("assistant"), None)).is_err());
    }

    #[test]
    fn test_validate_status_normalized() {
        assert!(validate(&body(None, None, Some("OK"))).is_ok());
        assert!(validate(&body(None, None, Some("failed"))).is_ok());
        assert!(validate(&body(None, None, Some("bogus"))).is_err());
    }

    #[test]
    fn test_validate_parses_client_id() {
        let id = Uuid::now_v7();
        let parsed = validate(&body(Some(&id.to_string()), None, None)).unwrap();
        assert_eq!(parsed, Some(id));
        assert!(validate(&body(Some("nope"), None, None)).is_err());
    }
}
