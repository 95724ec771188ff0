#![forbid(unsafe_code)]

use crate::error::AppError;
use crate::render::Renderer;
use bubbles_storage::{SqliteStore, StoreError};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handler state.
///
/// One mutex guards the store for the whole process, so every read and write
/// against any project is serialized and a read never observes half of a
/// multi-statement mutation.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<SqliteStore>>,
    renderer: Arc<dyn Renderer>,
}

impl AppState {
    pub fn new(store: SqliteStore, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            renderer,
        }
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    /// Runs `op` against the store on the blocking pool while holding the lock.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut SqliteStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = self.store.clone().lock_owned().await;
        let result = tokio::task::spawn_blocking(move || op(&mut *guard)).await?;
        Ok(result?)
    }
}
