use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::chat_service::{ChatService, ConversationFilter};

use crate::{
    auth::AuthUser,
    response::{ApiError, ApiResponse},
    routes::chat::common::{ConversationQuery, UnreadQuery, UnreadResponse, parse_status_filter},
    state::AppState,
};

/// GET /api/chat/conversations?user_id=&status=
///
/// Staff see every conversation and may narrow by customer; customers only ever
/// see their own. Newest activity first, each with a last-message preview and
/// the caller's unread count.
///
/// ### Query Parameters
/// - `user_id` (optional): staff only, narrows to one customer's conversations
/// - `status` (optional): `open` or `closed`, any case; blank means all
///
/// ### Responses
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": [{
///     "id": 4, "user_id": 7, "title": "Damaged item", "status": "open",
///     "created_at": "...", "updated_at": "...",
///     "owner": { "id": 7, "name": "Amina", "image": null, "role": "customer" },
///     "last_message": { "id": 12, "content": "My tagine arrived broken", "...": "..." },
///     "unread_count": 1,
///     "has_unread": true
///   }],
///   "message": "Conversations retrieved successfully"
/// }
/// ```
/// - `400 Bad Request` for an unknown `status`
/// - `401 Unauthorized` when the token names no known user
pub async fn list_conversations(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ConversationQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = ConversationFilter {
        user_id: query.user_id,
        status: parse_status_filter(query.status.as_deref())?,
    };

    let conversations =
        ChatService::list_conversations(app_state.db(), user.actor(), filter).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            conversations,
            "Conversations retrieved successfully",
        )),
    ))
}

/// GET /api/chat/conversations/{conversation_id}/messages
///
/// Returns the thread oldest first, as it was before this call marked the
/// caller's incoming messages read, plus the caller's remaining unread total.
///
/// ### Responses
/// - `200 OK` with `{ conversation, messages, unread }`
/// - `401 Unauthorized` when the token names no known user
/// - `403 Forbidden` when a customer opens someone else's conversation
/// - `404 Not Found`
pub async fn list_messages(
    State(app_state): State<AppState>,
    Path(conversation_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let thread = ChatService::list_messages(app_state.db(), conversation_id, user.actor()).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(thread, "Messages retrieved successfully")),
    ))
}

/// GET /api/chat/unread?user_id=
///
/// The caller's unread total: staff replies for a customer, customer messages
/// for staff. `user_id` narrows the staff count to one customer and is ignored
/// for customers.
///
/// ### Responses
/// - `200 OK` with `{ "unread": 3 }`
/// - `401 Unauthorized` when the token names no known user
pub async fn get_unread_count(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<UnreadQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let unread = ChatService::unread_count(app_state.db(), user.actor(), query.user_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            UnreadResponse { unread },
            "Unread count retrieved successfully",
        )),
    ))
}
