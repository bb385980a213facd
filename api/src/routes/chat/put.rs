use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::chat_service::ChatService;

use crate::{
    auth::AuthUser,
    response::{ApiError, ApiResponse},
    routes::chat::common::UpdateStatusRequest,
    state::AppState,
};

/// PUT /api/chat/conversations/{conversation_id}/status
///
/// ### Request Body
/// ```json
/// { "status": "closed" }
/// ```
///
/// Accepts `open`/`closed` in any case. Staff only, in both directions. Setting
/// the current status again succeeds without touching `updated_at`.
///
/// ### Responses
/// - `200 OK` with the conversation
/// - `400 Bad Request` for any other status value
/// - `401 Unauthorized` when the token names no known user
/// - `403 Forbidden` for customers
/// - `404 Not Found`
pub async fn update_status(
    State(app_state): State<AppState>,
    Path(conversation_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation =
        ChatService::update_status(app_state.db(), conversation_id, user.actor(), &req.status)
            .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            conversation,
            "Conversation status updated",
        )),
    ))
}
