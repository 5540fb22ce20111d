//! Filesystem-backed design store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use super::{DesignId, DesignStore, SaveDesign, StoreError, StoredDesign};

/// Stores each design as `<id>.json`, plus `<id>.png` when an image is given.
#[derive(Debug, Clone)]
pub struct FsDesignStore {
    dir: PathBuf,
}

impl FsDesignStore {
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn json_path(&self, id: &DesignId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    pub fn png_path(&self, id: &DesignId) -> PathBuf {
        self.dir.join(format!("{}.png", id))
    }
}

#[async_trait]
impl DesignStore for FsDesignStore {
    async fn save(&self, design: SaveDesign) -> Result<StoredDesign, StoreError> {
        let stored = StoredDesign::from_request(&design)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(&stored)?;
        tokio::fs::write(self.json_path(&stored.id), json).await?;

        if let Some(png) = &design.image_png {
            tokio::fs::write(self.png_path(&stored.id), png).await?;
        }

        info!(id = %stored.id, image = design.image_png.is_some(), "design saved");
        Ok(stored)
    }

    async fn fetch(&self, id: &DesignId) -> Result<StoredDesign, StoreError> {
        let raw = match tokio::fs::read_to_string(self.json_path(id)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(e) => return Err(e.into()),
        };
        let stored = serde_json::from_str(&raw)?;
        debug!(%id, "design fetched");
        Ok(stored)
    }
}
