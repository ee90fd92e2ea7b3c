//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedAtbClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached AtB client
    pub atb: Arc<CachedAtbClient>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(atb: CachedAtbClient) -> Self {
        Self { atb: Arc::new(atb) }
    }
}
