use std::sync::Arc;

use sea_orm::DatabaseConnection;
use services::catalog_service::CatalogCache;

/// Shared handles passed to every handler.
///
/// Built once in `main`; the catalog cache lives here rather than in a global
/// so each router (and each test) gets its own.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    catalog: Arc<CatalogCache>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, catalog: CatalogCache) -> Self {
        Self {
            db,
            catalog: Arc::new(catalog),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }
}
