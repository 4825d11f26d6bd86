//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::runtime::{Runtime, RuntimeHandle};

#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeHandle>,
}

impl AppState {
    pub fn new(runtime: Arc<RuntimeHandle>) -> Self {
        Self { runtime }
    }

    /// Snapshot of the active runtime for the duration of one request.
    pub fn current(&self) -> Arc<Runtime> {
        self.runtime.current()
    }
}
