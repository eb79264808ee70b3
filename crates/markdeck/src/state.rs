//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::store::SnippetStore;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Snippet storage. For Postgres this holds the connection pool.
    pub store: Arc<dyn SnippetStore>,
}

impl AppState {
    /// Create a new application state around a store.
    pub fn new(store: impl SnippetStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
