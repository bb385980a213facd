//! Support chat routes.
//!
//! All routes require an authenticated user; per-conversation access is
//! decided by the chat policy inside the service layer.

use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

pub mod common;
pub mod get;
pub mod post;
pub mod put;

use get::{get_unread_count, list_conversations, list_messages};
use post::{create_conversation, send_message};
use put::update_status;

/// Builds the `/chat` route group.
///
/// Routes:
/// - `GET  /conversations`                  → List conversations visible to the caller
/// - `POST /conversations`                  → Open a new conversation
/// - `GET  /conversations/{id}/messages`    → Fetch a thread and mark it read
/// - `POST /conversations/{id}/messages`    → Post a message
/// - `PUT  /conversations/{id}/status`      → Open or close a conversation (staff only)
/// - `GET  /unread`                         → Caller's unread message count
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route(
            "/conversations/{conversation_id}/messages",
            get(list_messages).post(send_message),
        )
        .route("/conversations/{conversation_id}/status", put(update_status))
        .route("/unread", get(get_unread_count))
}
