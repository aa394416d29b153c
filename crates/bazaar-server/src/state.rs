//! Shared application state.

use crate::{
    config::ServerConfig,
    db::{self, CategoryRepository, ProductRepository, UserRepository},
    middleware::{
        auth::{AuthLayer, TokenService},
        authz::{Authorizer, PermissionTable},
    },
    uploads::{LocalUploadStore, UploadLimits, UploadStore},
};
use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Everything a request handler can reach.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub tokens: Arc<TokenService>,
    pub authorizer: Authorizer,
    pub users: UserRepository,
    pub products: ProductRepository,
    pub categories: CategoryRepository,
    pub uploads: Arc<dyn UploadStore>,
}

impl AppState {
    /// Connect to the configured database, migrate it and build the state.
    pub async fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let pool = db::create_pool(&config.database).await?;
        if config.database.run_migrations {
            db::run_migrations(&pool).await?;
        }
        Ok(Self::from_pool(config.clone(), pool))
    }

    /// Build the state around an existing pool.
    pub fn from_pool(config: ServerConfig, pool: SqlitePool) -> Self {
        let users = UserRepository::new(pool.clone());
        let tokens = Arc::new(TokenService::new(
            &config.auth.jwt_secret,
            config.auth.token_ttl_secs,
        ));
        let authorizer = Authorizer::new(PermissionTable::builtin(), Arc::new(users.clone()));
        let uploads: Arc<dyn UploadStore> =
            Arc::new(LocalUploadStore::new(config.uploads.directory.clone()));

        Self {
            config: Arc::new(config),
            products: ProductRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            db: pool,
            tokens,
            authorizer,
            users,
            uploads,
        }
    }

    /// Authentication layer sharing this state's token service.
    pub fn auth_layer(&self) -> AuthLayer {
        AuthLayer::new(self.tokens.clone())
    }
}

impl FromRef<AppState> for UploadLimits {
    fn from_ref(state: &AppState) -> Self {
        UploadLimits {
            max_file_bytes: state.config.uploads.max_file_bytes,
        }
    }
}
