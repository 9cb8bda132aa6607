//! Application state - shared across all handlers.

use std::sync::Arc;

use postbox_core::ports::{PostRepository, TokenService};
use postbox_infra::{InMemoryPostRepository, JwtTokenService};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub tokens: Arc<dyn TokenService>,
    /// Page size used when the listing request does not specify one.
    pub per_page: u64,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let posts = Self::post_repository(config).await;

        tracing::info!("Application state initialized");

        Self::from_parts(posts, tokens, config.posts_per_page)
    }

    pub fn from_parts(
        posts: Arc<dyn PostRepository>,
        tokens: Arc<dyn TokenService>,
        per_page: u64,
    ) -> Self {
        Self {
            posts,
            tokens,
            per_page,
        }
    }

    #[cfg(feature = "postgres")]
    async fn post_repository(config: &AppConfig) -> Arc<dyn PostRepository> {
        use postbox_infra::PostgresPostRepository;
        use postbox_infra::database::connect;

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Arc::new(InMemoryPostRepository::new());
        };

        match connect(db_config).await {
            Ok(conn) => Arc::new(PostgresPostRepository::new(conn)),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Arc::new(InMemoryPostRepository::new())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn post_repository(config: &AppConfig) -> Arc<dyn PostRepository> {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        tracing::info!("Running without postgres feature - using in-memory repository");
        Arc::new(InMemoryPostRepository::new())
    }
}
