use crate::state::AppState;
use axum::{Router, routing::get};

pub mod get;

use get::{get_categories, get_featured_products};

/// Builds the public `/catalog` route group. Both reads go through the catalog cache.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/featured", get(get_featured_products))
}
