use std::sync::Arc;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::RateLimiter;
use crate::storage::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fyparchive_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Per-IP request counters for `/api`.
    pub rate_limiter: Arc<RateLimiter>,
    /// Directory holding uploaded PDFs.
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(pool: fyparchive_db::DbPool, config: ServerConfig) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
        let uploads = UploadStore::new(config.upload.dir.clone());
        Self {
            pool,
            config: Arc::new(config),
            rate_limiter,
            uploads,
        }
    }
}
