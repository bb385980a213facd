//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness (public)
//! - `/chat` → support conversations and messages (authenticated)
//! - `/catalog` → cached storefront reads (public)

use crate::auth::guards::allow_authenticated;
use crate::routes::{catalog::catalog_routes, chat::chat_routes, health::health_routes};
use crate::state::AppState;
use axum::{Router, middleware::from_fn};

pub mod catalog;
pub mod chat;
pub mod common;
pub mod health;

/// Builds the complete `/api` router with its state applied.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/chat", chat_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/catalog", catalog_routes())
        .with_state(app_state)
}
