//! In-memory design store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{DesignId, DesignStore, SaveDesign, StoreError, StoredDesign};

#[derive(Debug, Default)]
pub struct MemoryDesignStore {
    designs: RwLock<HashMap<DesignId, (StoredDesign, Option<Vec<u8>>)>>,
}

impl MemoryDesignStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.designs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.designs.read().await.is_empty()
    }

    /// PNG saved with a design, if any.
    pub async fn image(&self, id: &DesignId) -> Option<Vec<u8>> {
        self.designs.read().await.get(id).and_then(|(_, png)| png.clone())
    }
}

#[async_trait]
impl DesignStore for MemoryDesignStore {
    async fn save(&self, design: SaveDesign) -> Result<StoredDesign, StoreError> {
        let stored = StoredDesign::from_request(&design)?;
        self.designs
            .write()
            .await
            .insert(stored.id.clone(), (stored.clone(), design.image_png));
        debug!(id = %stored.id, "design saved in memory");
        Ok(stored)
    }

    async fn fetch(&self, id: &DesignId) -> Result<StoredDesign, StoreError> {
        self.designs
            .read()
            .await
            .get(id)
            .map(|(stored, _)| stored.clone())
            .ok_or(StoreError::NotFound)
    }
}
