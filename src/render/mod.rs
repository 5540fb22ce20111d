//! # Rendering
//!
//! From validated content and design options to a live renderer instance.
//!
//! ## Modules
//!
//! - [`config`]: options builder producing a [`RendererConfiguration`]
//! - [`debounce`]: single-slot scheduler coalescing rapid edits
//! - [`gate`]: the render gate plus the [`Renderer`] / [`RendererInstance`] seam
//! - [`raster`]: reference renderer on `qrcode` + `image`
//!
//! ## Usage Example
//!
//! ```
//! use qrforge::content::{ContentFields, ContentType};
//! use qrforge::design::DesignOptions;
//! use qrforge::render::{ImageFormat, RasterRenderer, RenderGate, RenderOutcome, RenderRequest, RendererInstance};
//!
//! let mut fields = ContentFields::default();
//! fields.url.url = "example.com".into();
//! let options = DesignOptions::default();
//!
//! let mut gate = RenderGate::new(RasterRenderer);
//! let outcome = gate.generate_now(RenderRequest {
//!     content_type: ContentType::Url,
//!     fields: &fields,
//!     options: &options,
//! });
//! assert_eq!(outcome, RenderOutcome::Rendered { constructed: true });
//!
//! let png = gate.instance().unwrap().image_bytes(ImageFormat::Png).unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```

pub mod config;
pub mod debounce;
pub mod gate;
pub mod raster;

pub use config::{
    Background, BackgroundOptions, ColorStop, ElementOptions, Fill, Gradient, GradientKind,
    ImageOptions, QrOptions, RendererConfiguration,
};
pub use debounce::{Debouncer, QUIET_PERIOD_MS, ScheduledRender};
pub use gate::{
    GateMessage, ImageFormat, RENDER_FAILED_MESSAGE, RenderError, RenderGate, RenderOutcome,
    RenderRequest, Renderer, RendererInstance,
};
pub use raster::{RasterInstance, RasterRenderer, Rgba8};
