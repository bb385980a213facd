#[cfg(test)]
mod tests {
    use crate::helpers::{get_json_body, make_test_app, make_test_app_with_cache};
    use axum::{
        Router,
        body::Body as AxumBody,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, TimeZone, Utc};
    use db::models::{category::Model as CategoryModel, product::Model as ProductModel};
    use serde_json::Value;
    use serial_test::serial;
    use services::catalog_service::CatalogCache;
    use std::sync::Arc;
    use tower::ServiceExt;
    use util::cache::ManualClock;
    use util::config::AppConfig;

    async fn get(app: &Router, uri: &str) -> Value {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(AxumBody::empty())
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        get_json_body(response).await
    }

    #[tokio::test]
    async fn categories_are_public_and_sorted_by_name() {
        let (app, state) = make_test_app().await;
        CategoryModel::create(state.db(), "Tagines", "tagines").await.unwrap();
        CategoryModel::create(state.db(), "Lanterns", "lanterns").await.unwrap();

        let json = get(&app, "/api/catalog/categories").await;
        let names: Vec<_> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Lanterns", "Tagines"]);
    }

    #[tokio::test]
    async fn featured_products_are_cached_until_ttl_expires() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
        ));
        let (app, state) = make_test_app_with_cache(
            clock.clone(),
            Duration::seconds(300),
            Duration::seconds(120),
            8,
        )
        .await;

        let rugs = CategoryModel::create(state.db(), "Rugs", "rugs").await.unwrap();
        ProductModel::create(state.db(), rugs.id, "Kilim", "kilim", 22000, true)
            .await
            .unwrap();

        let first = get(&app, "/api/catalog/featured").await;
        assert_eq!(first["data"].as_array().unwrap().len(), 1);

        ProductModel::create(state.db(), rugs.id, "Azilal", "azilal", 39000, true)
            .await
            .unwrap();

        let cached = get(&app, "/api/catalog/featured").await;
        assert_eq!(cached["data"].as_array().unwrap().len(), 1);

        clock.advance(Duration::seconds(121));
        let fresh = get(&app, "/api/catalog/featured").await;
        assert_eq!(fresh["data"].as_array().unwrap().len(), 2);
        assert_eq!(fresh["data"][0]["name"], "Azilal");
    }

    #[tokio::test]
    #[serial]
    async fn cache_settings_come_from_config() {
        crate::helpers::app::init_test_env();
        AppConfig::set_featured_limit(3u64);

        let cache = CatalogCache::from_config();
        assert_eq!(cache.featured_limit(), 3);

        AppConfig::reset();
        assert_eq!(CatalogCache::from_config().featured_limit(), 8);
    }
}
