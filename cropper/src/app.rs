use std::sync::Arc;

use thumb_store::Storage;

use crate::config::AppConfig;
use crate::notice::{Notice, Notifier};

/// Application state handed to every operation.
///
/// Holds the resolved configuration, the output location and the notice
/// sink. Cloning is cheap and clones share the same storage and notifier.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Create state from explicit parts.
    pub fn new(config: AppConfig, storage: Arc<dyn Storage>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                notifier,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn storage(&self) -> &dyn Storage {
        self.inner.storage.as_ref()
    }

    pub fn notify(&self, notice: Notice) {
        self.inner.notifier.notify(&notice);
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("storage", &self.inner.storage.describe())
            .finish()
    }
}
