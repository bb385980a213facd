//! Cached reads for the storefront's hottest catalog queries.

use std::sync::Arc;

use chrono::Duration;
use db::models::{category::Model as CategoryModel, product::Model as ProductModel};
use sea_orm::DatabaseConnection;
use util::cache::{Clock, SystemClock, TtlSlot};
use util::config;

use crate::error::ServiceError;

/// Process-wide catalog cache. Built once at startup and shared through app state.
pub struct CatalogCache {
    categories: TtlSlot<Vec<CategoryModel>>,
    featured: TtlSlot<Vec<ProductModel>>,
    featured_limit: u64,
}

impl CatalogCache {
    pub fn new(
        clock: Arc<dyn Clock>,
        category_ttl: Duration,
        featured_ttl: Duration,
        featured_limit: u64,
    ) -> Self {
        Self {
            categories: TtlSlot::new(category_ttl, clock.clone()),
            featured: TtlSlot::new(featured_ttl, clock),
            featured_limit,
        }
    }

    pub fn from_config() -> Self {
        Self::new(
            Arc::new(SystemClock),
            Duration::seconds(config::category_cache_ttl_seconds() as i64),
            Duration::seconds(config::featured_cache_ttl_seconds() as i64),
            config::featured_limit(),
        )
    }

    pub fn featured_limit(&self) -> u64 {
        self.featured_limit
    }
}

pub struct CatalogService;

impl CatalogService {
    /// All categories ordered by name, at most one TTL stale.
    pub async fn categories(
        db: &DatabaseConnection,
        cache: &CatalogCache,
    ) -> Result<Vec<CategoryModel>, ServiceError> {
        cache
            .categories
            .get_or_refresh(move || async move {
                tracing::debug!("refreshing category cache");
                CategoryModel::find_all_by_name(db)
                    .await
                    .map_err(ServiceError::from)
            })
            .await
    }

    /// Newest featured products, at most one TTL stale.
    pub async fn featured_products(
        db: &DatabaseConnection,
        cache: &CatalogCache,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        let limit = cache.featured_limit;
        cache
            .featured
            .get_or_refresh(move || async move {
                tracing::debug!(limit, "refreshing featured products cache");
                ProductModel::find_featured(db, limit)
                    .await
                    .map_err(ServiceError::from)
            })
            .await
    }
}
