//! # qrforge - Styled QR Code Payloads and Design Engine
//!
//! qrforge turns structured content into the exact strings scanner apps
//! expect, and manages the visual design of the resulting QR code. It
//! provides:
//!
//! - **Content encoders**: URL, text, phone, SMS, email, Wi-Fi, vCard, geo
//!   location and calendar event payloads, with validation
//! - **Design state**: styling options with a bounded undo history
//! - **Render gate**: debounced, validation-gated driving of a renderer
//! - **Reference renderer**: PNG/SVG output via `qrcode` + `image`
//! - **HTTP API**: payload, render and saved-design endpoints
//!
//! ## Quick Start
//!
//! ```
//! use qrforge::content::{ContentFields, ContentType};
//!
//! let mut fields = ContentFields::default();
//! fields.wifi.ssid = "Home \"Net\"".into();
//! fields.wifi.password = "p,w".into();
//!
//! assert_eq!(
//!     ContentType::Wifi.encode(&fields),
//!     r#"WIFI:T:WPA;S:Home \"Net\";P:p\,w;;"#
//! );
//! assert!(ContentType::Wifi.validate(&fields).valid);
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`content`] | Content types, field sets, encoders, validation |
//! | [`design`] | Design options, snapshots, undo history |
//! | [`render`] | Renderer configuration, debounce, render gate, raster renderer |
//! | [`studio`] | Editing session with two-phase exports |
//! | [`export`] | Export kinds, messages, PDF layout |
//! | [`store`] | Saved-design persistence |
//! | [`server`] | HTTP API |
//! | [`config`] | Settings file and server configuration |
//! | [`error`] | Error types |

pub mod config;
pub mod content;
pub mod design;
pub mod error;
pub mod export;
pub mod render;
pub mod server;
pub mod store;
pub mod studio;

// Re-exports for convenience
pub use content::{ContentFields, ContentType, MessageKey, ValidationResult};
pub use design::{DesignOptions, DesignState};
pub use error::QrForgeError;
pub use render::{RasterRenderer, RenderGate, RendererConfiguration};
pub use studio::Studio;
