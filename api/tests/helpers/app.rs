use api::{routes::routes, state::AppState};
use axum::{Router, response::Response};
use chrono::Duration;
use db::test_utils::setup_test_db;
use serde_json::Value;
use services::catalog_service::CatalogCache;
use std::sync::{Arc, Once};
use util::cache::{Clock, SystemClock};

static INIT: Once = Once::new();

/// Seeds the environment the global config reads on first access.
pub fn init_test_env() {
    INIT.call_once(|| {
        // SAFETY: runs once, before any test thread reads the environment.
        unsafe {
            std::env::set_var("APP_ENV", "test");
            std::env::set_var("DATABASE_PATH", "sqlite::memory:");
            std::env::set_var("JWT_SECRET", "test-secret-for-souk");
            std::env::set_var("JWT_DURATION_MINUTES", "60");
        }
    });
}

pub async fn make_test_app() -> (Router, AppState) {
    make_test_app_with_cache(
        Arc::new(SystemClock),
        Duration::seconds(300),
        Duration::seconds(120),
        8,
    )
    .await
}

pub async fn make_test_app_with_cache(
    clock: Arc<dyn Clock>,
    category_ttl: Duration,
    featured_ttl: Duration,
    featured_limit: u64,
) -> (Router, AppState) {
    init_test_env();

    let db = setup_test_db().await;
    let cache = CatalogCache::new(clock, category_ttl, featured_ttl, featured_limit);
    let app_state = AppState::new(db, cache);

    let router = Router::new().nest("/api", routes(app_state.clone()));
    (router, app_state)
}

pub async fn get_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
