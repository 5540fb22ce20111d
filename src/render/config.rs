//! Renderer configuration and the options builder.
//!
//! [`RendererConfiguration::build`] maps a payload plus [`DesignOptions`]
//! onto the structure handed to a [`Renderer`](super::Renderer). The field
//! names serialize in the camelCase layout that browser-side styled-QR
//! renderers accept, so the JSON form can be passed straight through.
//!
//! The configuration is rebuilt from scratch for every render and never
//! patched in place.

use serde::{Deserialize, Serialize};

use crate::content::normalize::parse_leading_float;
use crate::design::{
    CornerDotStyle, CornerSquareStyle, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, DEFAULT_SIZE,
    DesignOptions, DotStyle, ErrorCorrection,
};

/// Quiet margin around the symbol, in pixels.
pub const MARGIN: u32 = 10;
/// Logo side as a fraction of the symbol side.
pub const LOGO_IMAGE_SIZE: f64 = 0.4;
/// Clear margin around the logo, in pixels.
pub const LOGO_MARGIN: u32 = 5;
/// Background value meaning "no background".
pub const TRANSPARENT: &str = "transparent";

/// Solid color or gradient for one element class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    Color(String),
    Gradient(Gradient),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    /// Radians.
    pub rotation: f64,
    pub color_stops: Vec<ColorStop>,
}

impl Gradient {
    /// Two-stop linear gradient rotated by `degrees`.
    pub fn linear(degrees: f64, from: &str, to: &str) -> Self {
        Self {
            kind: GradientKind::Linear,
            rotation: degrees.to_radians(),
            color_stops: vec![
                ColorStop {
                    offset: 0.0,
                    color: from.to_string(),
                },
                ColorStop {
                    offset: 1.0,
                    color: to.to_string(),
                },
            ],
        }
    }
}

/// Fill plus shape for dots, corner squares or corner dots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementOptions<S> {
    #[serde(flatten)]
    pub fill: Fill,
    #[serde(rename = "type")]
    pub shape: S,
}

/// Background color, or no background at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Background {
    Color(String),
    Transparent,
}

impl From<Background> for String {
    fn from(background: Background) -> Self {
        match background {
            Background::Color(color) => color,
            Background::Transparent => TRANSPARENT.to_string(),
        }
    }
}

impl From<String> for Background {
    fn from(value: String) -> Self {
        if value == TRANSPARENT {
            Background::Transparent
        } else {
            Background::Color(value)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundOptions {
    pub color: Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrOptions {
    pub error_correction_level: ErrorCorrection,
}

/// Overlay parameters for an embedded logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    pub hide_background_dots: bool,
    pub image_size: f64,
    pub margin: u32,
    pub cross_origin: String,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            hide_background_dots: true,
            image_size: LOGO_IMAGE_SIZE,
            margin: LOGO_MARGIN,
            cross_origin: "anonymous".to_string(),
        }
    }
}

/// Fully resolved input for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererConfiguration {
    pub width: u32,
    pub height: u32,
    /// Encoded payload.
    pub data: String,
    pub margin: u32,
    pub qr_options: QrOptions,
    pub dots_options: ElementOptions<DotStyle>,
    pub corners_square_options: ElementOptions<CornerSquareStyle>,
    pub corners_dot_options: ElementOptions<CornerDotStyle>,
    pub background_options: BackgroundOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_options: Option<ImageOptions>,
}

impl RendererConfiguration {
    /// Build the configuration for `payload` styled by `options`.
    ///
    /// Pure: the same inputs always give an equal configuration.
    ///
    /// ## Example
    ///
    /// ```
    /// use qrforge::design::DesignOptions;
    /// use qrforge::render::{Fill, RendererConfiguration};
    ///
    /// let config = RendererConfiguration::build("https://example.com", &DesignOptions::default());
    /// assert_eq!(config.width, 300);
    /// assert_eq!(config.margin, 10);
    /// assert_eq!(config.dots_options.fill, Fill::Color("#1a1a2e".into()));
    /// ```
    pub fn build(payload: &str, options: &DesignOptions) -> Self {
        let size = if options.size == 0 {
            DEFAULT_SIZE
        } else {
            options.size
        };

        let fill = element_fill(options);

        let background = if options.transparent {
            Background::Transparent
        } else {
            Background::Color(color_or(&options.background, DEFAULT_BACKGROUND))
        };

        let (image, image_options) = match &options.logo {
            Some(logo) if !logo.is_empty() => (Some(logo.clone()), Some(ImageOptions::default())),
            _ => (None, None),
        };

        Self {
            width: size,
            height: size,
            data: payload.to_string(),
            margin: MARGIN,
            qr_options: QrOptions {
                error_correction_level: options.error_correction,
            },
            dots_options: ElementOptions {
                fill: fill.clone(),
                shape: options.dot_style,
            },
            corners_square_options: ElementOptions {
                fill: fill.clone(),
                shape: options.corner_square,
            },
            corners_dot_options: ElementOptions {
                fill,
                shape: options.corner_dot,
            },
            background_options: BackgroundOptions { color: background },
            image,
            image_options,
        }
    }
}

/// Gradient when enabled and both colors are present, foreground otherwise.
fn element_fill(options: &DesignOptions) -> Fill {
    let from = options.gradient_from.trim();
    let to = options.gradient_to.trim();
    if options.gradient && !from.is_empty() && !to.is_empty() {
        let degrees = parse_leading_float(&options.gradient_rotation).unwrap_or(0.0);
        Fill::Gradient(Gradient::linear(degrees, from, to))
    } else {
        Fill::Color(color_or(&options.foreground, DEFAULT_FOREGROUND))
    }
}

/// A cleared color input means the default color.
fn color_or(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
