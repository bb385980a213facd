//! Helpers for tests that need a migrated database.

use crate::models::user::Model as UserModel;
use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory SQLite database with every migration applied.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn create_customer(db: &DatabaseConnection, name: &str) -> UserModel {
    let email = format!("{}@customers.test", name.to_lowercase().replace(' ', "."));
    UserModel::create(db, name, &email, None, false)
        .await
        .expect("Failed to create customer")
}

pub async fn create_admin(db: &DatabaseConnection, name: &str) -> UserModel {
    let email = format!("{}@support.test", name.to_lowercase().replace(' ', "."));
    UserModel::create(db, name, &email, Some("https://cdn.test/avatars/support.png"), true)
        .await
        .expect("Failed to create admin")
}
