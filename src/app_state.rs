use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::middleware::auth::{create_approval_cache, ApprovalCache};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub approval_cache: ApprovalCache,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let approval_cache = create_approval_cache(config.approval_cache_ttl);
        Self {
            pool,
            config: Arc::new(config),
            approval_cache,
        }
    }
}
