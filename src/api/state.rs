//! Application state for the attendance engine API.

use std::sync::Arc;

use crate::store::EngineStore;

/// Shared application state.
///
/// Wraps the engine store for all request handlers; cloning is cheap
/// and shares the same store.
#[derive(Clone)]
pub struct AppState {
    store: Arc<EngineStore>,
}

impl AppState {
    /// Creates a new application state around a store.
    pub fn new(store: EngineStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Returns a reference to the engine store.
    pub fn store(&self) -> &EngineStore {
        &self.store
    }
}
