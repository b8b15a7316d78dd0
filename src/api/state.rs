use std::sync::Arc;

use crate::services::RecommendationEngine;
use crate::store::UserStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub users: Arc<UserStore>,
}

impl AppState {
    /// Wraps the engine and profile store for the router
    pub fn new(engine: RecommendationEngine, users: UserStore) -> Self {
        Self {
            engine: Arc::new(engine),
            users: Arc::new(users),
        }
    }
}
