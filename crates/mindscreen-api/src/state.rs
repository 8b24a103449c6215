use std::sync::Arc;

use mindscreen_instruments::Registry;

/// Shared application state, injected into all route handlers via Axum state.
///
/// The registry is immutable after startup, so handlers read it without locks.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}
