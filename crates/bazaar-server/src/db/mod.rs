//! Database connection management and repositories.
//!
//! - SQLite pool creation and health checks
//! - Embedded migrations
//! - Repositories for users, products and categories; owned resources expose
//!   only ownership-scoped mutations

pub mod categories;
pub mod health;
pub mod migration;
pub mod pool;
pub mod products;
mod query;
pub mod users;

pub use categories::{Category, CategoryRepository};
pub use health::{check_health, DbHealth};
pub use migration::{check_migrations, run_migrations};
pub use pool::{create_pool, pool_stats, verify_connection, PoolStats};
pub use products::{Product, ProductRepository};
pub use users::{NewUser, User, UserRepository};

/// Fresh migrated in-memory database.
#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let config = crate::config::validation::test_config();
    let pool = create_pool(&config.database).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
