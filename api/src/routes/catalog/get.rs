use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use services::catalog_service::CatalogService;

use crate::{
    response::{ApiError, ApiResponse},
    state::AppState,
};

/// GET /api/catalog/categories
///
/// Public. Every category ordered by name, served from the process-wide
/// catalog cache and so at most `CATEGORY_CACHE_TTL_SECONDS` stale.
///
/// ### Responses
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": [{ "id": 2, "name": "Ceramics", "slug": "ceramics" }],
///   "message": "Categories retrieved successfully"
/// }
/// ```
/// - `500 Internal Server Error` when the refresh query fails and nothing is cached
pub async fn get_categories(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = CatalogService::categories(app_state.db(), app_state.catalog()).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            categories,
            "Categories retrieved successfully",
        )),
    ))
}

/// GET /api/catalog/featured
///
/// Public. The newest featured products, at most `FEATURED_LIMIT` of them,
/// cached for `FEATURED_CACHE_TTL_SECONDS`.
///
/// ### Responses
/// - `200 OK` with an array of products (`id`, `category_id`, `name`, `slug`,
///   `price_cents`, `featured`, `created_at`)
/// - `500 Internal Server Error` when the refresh query fails and nothing is cached
pub async fn get_featured_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let products =
        CatalogService::featured_products(app_state.db(), app_state.catalog()).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            products,
            "Featured products retrieved successfully",
        )),
    ))
}
