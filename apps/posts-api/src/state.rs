//! Application state - shared across all handlers.

use std::sync::Arc;

use posts_core::ports::PostStore;
use posts_infra::DatabaseConfig;
use posts_infra::InMemoryPostStore;

#[cfg(feature = "postgres")]
use posts_infra::PostgresPostStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Unit-of-work factory for the `posts` table.
    pub posts: Arc<dyn PostStore>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let posts: Arc<dyn PostStore> = {
            if let Some(config) = db_config {
                match posts_infra::database::connect(config).await {
                    Ok(conn) => Arc::new(PostgresPostStore::new(conn)),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        Arc::new(InMemoryPostStore::new())
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Arc::new(InMemoryPostStore::new())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let posts: Arc<dyn PostStore> = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored - built without postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory store");
            Arc::new(InMemoryPostStore::new())
        };

        tracing::info!(store = posts.backend(), "Application state initialized");

        Self { posts }
    }

    /// State over an explicit store.
    #[cfg(test)]
    pub fn with_store(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }
}
