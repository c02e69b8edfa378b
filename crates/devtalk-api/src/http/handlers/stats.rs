//! Dashboard statistics endpoint.
//!
//! GET /api/v1/stats - Aggregate session and message counts.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use devtalk_core::exchange::store::SessionStore;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/stats - Aggregate totals.
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let total_sessions = state
        .coordinator
        .store()
        .count_sessions()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to count sessions: {e}")))?;

    let total_messages = state
        .coordinator
        .store()
        .count_messages()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to count messages: {e}")))?;

    let elapsed = start.elapsed().as_millis() as u64;

    let data = serde_json::json!({
        "total_sessions": total_sessions,
        "total_messages": total_messages,
    });

    Ok(Json(ApiResponse::success(data, request_id, elapsed)))
}
