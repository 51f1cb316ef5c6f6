use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::StatsConfig;
use crate::repository::Repository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<RwLock<Repository>>,
    pub stats: StatsConfig,
}

impl AppState {
    pub fn new(repository: Repository, stats: StatsConfig) -> Self {
        Self {
            repository: Arc::new(RwLock::new(repository)),
            stats,
        }
    }
}
