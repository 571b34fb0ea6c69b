//! Manual dependency wiring.
//!
//! Every component is constructed once here and handed to its consumers as
//! an `Arc` of its trait object.

use catalog_config::AppConfig;
use catalog_core::{CatalogResult, HealthCheck};
use catalog_repository::{
    create_pool, DatabasePool, PgProductRepository, PgUserRepository, ProductRepository,
    UserRepository,
};
use catalog_rest::AppState;
use catalog_security::{PasswordHasher, TokenProvider, TokenProviderInterface};
use catalog_service::{
    create_redis_pool, AuthService, AuthServiceImpl, CacheHealthCheck, CacheStore,
    GuardedCacheStore, ListCache, ProductService, ProductServiceImpl, RedisCacheStore,
};
use std::sync::Arc;
use tracing::info;

/// Fully wired application components.
pub struct AppContainer {
    product_service: Arc<dyn ProductService>,
    auth_service: Arc<dyn AuthService>,
    token_provider: Arc<dyn TokenProviderInterface>,
    health_checks: Vec<Arc<dyn HealthCheck>>,
    database: Option<Arc<DatabasePool>>,
}

impl AppContainer {
    /// Connects to PostgreSQL and Redis and wires the production graph.
    ///
    /// Redis being unreachable is not an error: the pool connects lazily and
    /// the list cache degrades to direct reads.
    pub async fn build(config: &AppConfig) -> CatalogResult<Self> {
        let database = create_pool(&config.database).await?;
        if config.database.run_migrations {
            database.run_migrations().await?;
        }

        let redis = match create_redis_pool(&config.redis)? {
            Some(pool) => RedisCacheStore::new(pool),
            None => RedisCacheStore::disabled(),
        };
        let cache: Arc<dyn CacheStore> =
            Arc::new(GuardedCacheStore::from_config(Arc::new(redis), &config.cache));

        let mut container = Self::with_components(
            config,
            Arc::new(PgProductRepository::new(database.clone())),
            Arc::new(PgUserRepository::new(database.clone())),
            cache,
        );
        container.health_checks.insert(0, database.clone());
        container.database = Some(database);

        info!("Application components initialized");
        Ok(container)
    }

    /// Wires services over the given repositories and cache store.
    #[must_use]
    pub fn with_components(
        config: &AppConfig,
        product_repository: Arc<dyn ProductRepository>,
        user_repository: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        let token_provider: Arc<dyn TokenProviderInterface> =
            Arc::new(TokenProvider::new(Arc::new(config.security.clone())));
        let password_hasher = Arc::new(PasswordHasher::from_config(&config.security));

        let product_service = Arc::new(ProductServiceImpl::new(
            product_repository,
            ListCache::new(cache.clone()),
            config.cache.list_ttl(),
        ));
        let auth_service = Arc::new(AuthServiceImpl::new(
            user_repository,
            password_hasher,
            token_provider.clone(),
        ));

        Self {
            product_service,
            auth_service,
            token_provider,
            health_checks: vec![Arc::new(CacheHealthCheck::new(cache))],
            database: None,
        }
    }

    /// State shared by the HTTP handlers.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        AppState::new(
            self.product_service.clone(),
            self.auth_service.clone(),
            self.health_checks.clone(),
        )
    }

    #[must_use]
    pub fn token_provider(&self) -> Arc<dyn TokenProviderInterface> {
        self.token_provider.clone()
    }

    /// Releases pooled connections.
    pub async fn shutdown(&self) {
        if let Some(database) = &self.database {
            database.close().await;
        }
    }
}

impl std::fmt::Debug for AppContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContainer")
            .field("health_checks", &self.health_checks.len())
            .field("database", &self.database.is_some())
            .finish_non_exhaustive()
    }
}
