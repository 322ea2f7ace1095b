//! Application state

use aiopass_auth::JwtManager;
use aiopass_db::Store;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, jwt: Arc<JwtManager>) -> Self {
        Self { store, jwt }
    }
}
