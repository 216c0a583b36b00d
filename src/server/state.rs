//! Shared state for the collection service.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::server::store::ContactStore;

pub struct AppState {
    /// `None` when the collection could not be opened; requests then get 503.
    pub store: Option<ContactStore>,
}

impl AppState {
    pub fn new(store: ContactStore) -> Self {
        Self { store: Some(store) }
    }

    pub fn unavailable() -> Self {
        Self { store: None }
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }
}

pub type SharedState = Arc<Mutex<AppState>>;
