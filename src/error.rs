//! # Error Types
//!
//! Crate-level error type. Boundaries with their own taxonomy keep a
//! focused enum next to the code that raises it:
//!
//! | Type | Raised by |
//! |------|-----------|
//! | [`RenderError`] | renderer implementations (caught by the render gate) |
//! | [`ExportError`] | export collaborators |
//! | [`StoreError`] | design stores |
//! | [`ConfigError`] | settings file loading |
//!
//! Content validation never errors; it yields a
//! [`ValidationResult`](crate::content::ValidationResult).

use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::export::ExportError;
pub use crate::render::RenderError;
pub use crate::store::StoreError;

/// Main error type for qrforge operations
#[derive(Debug, Error)]
pub enum QrForgeError {
    /// Bad command-line or request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Renderer failure surfaced outside the render gate
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Export collaborator failure
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Design store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Settings failure
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP server failure (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
