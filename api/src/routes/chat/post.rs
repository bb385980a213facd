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
    routes::chat::common::{CreateConversationRequest, SendMessageRequest, validate_request},
    state::AppState,
};

/// POST /api/chat/conversations
///
/// ### Request Body
/// ```json
/// { "title": "Order Issue" }
/// ```
///
/// ### Responses
/// - `201 Created` with the new open conversation
///
/// ```json
/// {
///   "success": true,
///   "data": { "id": 4, "user_id": 7, "title": "Order Issue", "status": "open", "...": "..." },
///   "message": "Conversation created successfully"
/// }
/// ```
/// - `400 Bad Request` when the title is blank or longer than 120 characters
///   once trimmed
/// - `401 Unauthorized` when the token names no known user
pub async fn create_conversation(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateConversationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_request(&req)?;

    let conversation =
        ChatService::create_conversation(app_state.db(), user.actor(), &req.title).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            conversation,
            "Conversation created successfully",
        )),
    ))
}

/// POST /api/chat/conversations/{conversation_id}/messages
///
/// ### Request Body
/// ```json
/// { "content": "My tagine arrived broken" }
/// ```
///
/// ### Responses
/// - `201 Created` with `{ message, unread }`
/// - `400 Bad Request` for blank content or more than 5000 characters once trimmed
/// - `401 Unauthorized` when the token names no known user
/// - `403 Forbidden` when the caller may not post (not the owner, or closed)
/// - `404 Not Found`
pub async fn send_message(
    State(app_state): State<AppState>,
    Path(conversation_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_request(&req)?;

    let sent =
        ChatService::send_message(app_state.db(), conversation_id, user.actor(), &req.content)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(sent, "Message sent successfully")),
    ))
}
