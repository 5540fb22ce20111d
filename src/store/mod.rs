//! # Design Store
//!
//! Persistence for saved designs: the encoded payload, the design snapshot
//! and an optional PNG preview.
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`FsDesignStore`] | `<dir>/<id>.json` + `<dir>/<id>.png` on disk |
//! | [`MemoryDesignStore`] | tests and ephemeral servers |
//!
//! Ids are 16 lowercase hex characters. Incoming ids are sanitized by
//! dropping every character outside `[a-f0-9]`; what remains must be
//! exactly 16 characters long.

mod fs;
mod memory;

pub use fs::FsDesignStore;
pub use memory::MemoryDesignStore;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::design::DesignSnapshot;

/// Length of a design id in hex characters.
pub const ID_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing or invalid body")]
    MissingData,

    #[error("Invalid ID")]
    InvalidId,

    #[error("Design not found")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid design file: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Identifier of a stored design.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesignId(String);

impl DesignId {
    /// Fresh id from 8 random bytes.
    pub fn generate() -> Self {
        Self(format!("{:016x}", rand::random::<u64>()))
    }

    /// Sanitize and check an id from a request.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let cleaned: String = raw
            .chars()
            .filter(|c| matches!(c, 'a'..='f' | '0'..='9'))
            .collect();
        if cleaned.len() == ID_LEN {
            Ok(Self(cleaned))
        } else {
            Err(StoreError::InvalidId)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DesignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A design to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveDesign {
    /// Encoded payload.
    pub data: String,
    pub options: DesignSnapshot,
    pub image_png: Option<Vec<u8>>,
}

/// A saved design as persisted and returned by fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDesign {
    pub id: DesignId,
    pub data: String,
    pub options: DesignSnapshot,
    /// RFC 3339 timestamp.
    pub created: String,
}

impl StoredDesign {
    /// Assign an id and timestamp to a save request.
    pub fn from_request(request: &SaveDesign) -> Result<Self, StoreError> {
        if request.data.is_empty() {
            return Err(StoreError::MissingData);
        }
        Ok(Self {
            id: DesignId::generate(),
            data: request.data.clone(),
            options: request.options.clone(),
            created: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        })
    }
}

#[async_trait]
pub trait DesignStore: Send + Sync {
    /// Persist a design and return the stored record.
    async fn save(&self, design: SaveDesign) -> Result<StoredDesign, StoreError>;

    /// Load a design by id.
    async fn fetch(&self, id: &DesignId) -> Result<StoredDesign, StoreError>;
}
