//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/sessions               - Create a session
//! - GET  /api/v1/sessions               - List sessions
//! - GET  /api/v1/sessions/{id}          - Get a single session
//! - GET  /api/v1/sessions/{id}/messages - Get messages for a session

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use devtalk_core::exchange::store::SessionStore;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for session listing.
#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Query parameters for message listing.
#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    #[serde(default = "default_message_limit")]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

fn default_message_limit() -> Option<i64> {
    Some(100)
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// POST /api/v1/sessions - Create a session.
///
/// Always returns 200 with the session record; a store failure is carried
/// by the session's `failed` status, and such a session accepts no messages.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state.coordinator.create_session().await;

    let elapsed = start.elapsed().as_millis() as u64;

    let session_json = serde_json::to_value(&session)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let resp = ApiResponse::success(session_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{}", session.id))
        .with_link("messages", &format!("/api/v1/sessions/{}/messages", session.id));

    Ok(Json(resp))
}

/// GET /api/v1/sessions - List sessions, newest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sessions = state
        .coordinator
        .store()
        .list_sessions(Some(query.limit), Some(query.offset))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let elapsed = start.elapsed().as_millis() as u64;

    let sessions_json: Vec<serde_json::Value> = sessions
        .iter()
        .filter_map(|s| serde_json::to_value(s).ok())
        .collect();

    let resp = ApiResponse::success(sessions_json, request_id, elapsed)
        .with_link("self", "/api/v1/sessions");

    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id} - Get a session by ID.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;

    let session = state
        .coordinator
        .get_session(&sid)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    let elapsed = start.elapsed().as_millis() as u64;

    let session_json = serde_json::to_value(&session)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let resp = ApiResponse::success(session_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{}", session.id))
        .with_link("messages", &format!("/api/v1/sessions/{}/messages", session.id));

    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id}/messages - Get messages for a session.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;

    let messages = state
        .coordinator
        .get_messages(&sid, query.limit, query.offset)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let elapsed = start.elapsed().as_millis() as u64;

    let messages_json: Vec<serde_json::Value> = messages
        .iter()
        .filter_map(|m| serde_json::to_value(m).ok())
        .collect();

    let resp = ApiResponse::success(messages_json, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}/messages"))
        .with_link("session", &format!("/api/v1/sessions/{session_id}"));

    Ok(Json(resp))
}
