//! Server state.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::{EncodingSettings, ServerConfig, Settings};
use crate::store::{DesignStore, FsDesignStore};

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub encoding: EncodingSettings,
    pub store: Arc<dyn DesignStore>,
    /// Unix timestamp of server boot.
    pub boot_time: u64,
}

impl AppState {
    pub fn new(settings: Settings, store: Arc<dyn DesignStore>) -> Self {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            config: settings.server,
            encoding: settings.encoding,
            store,
            boot_time,
        }
    }

    /// State backed by the filesystem store under `config.data_dir`.
    pub fn with_fs_store(settings: Settings) -> Self {
        let store = Arc::new(FsDesignStore::new(settings.server.data_dir.clone()));
        Self::new(settings, store)
    }
}
