//! Reference renderer built on `qrcode` + `image`.
//!
//! Honors size, margin, error correction, solid and linear-gradient fills,
//! background color and transparency. Module shapes are drawn as squares
//! and the logo overlay is not composited; browser-side styled renderers
//! consume the same [`RendererConfiguration`] for those.
//!
//! SVG output uses the first gradient stop as a solid fill.

use std::io::Cursor;

use image::{Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};

use super::config::{Background, Fill, Gradient, RendererConfiguration};
use super::gate::{ImageFormat, RenderError, Renderer, RendererInstance};
use crate::design::ErrorCorrection;

/// Largest canvas side, in pixels, the raster renderer will allocate.
pub const MAX_SIDE: u32 = 4096;

/// 8-bit RGBA color parsed from `#rgb` or `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb`.
    pub fn from_hex(hex: &str) -> Result<Self, RenderError> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let invalid = || RenderError::InvalidColor(hex.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
                Ok(Self::opaque(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                let channel = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::opaque(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => Err(invalid()),
        }
    }

    fn lerp(self, other: Rgba8, t: f64) -> Rgba8 {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Rgba8 {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    fn pixel(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::L => EcLevel::L,
        ErrorCorrection::M => EcLevel::M,
        ErrorCorrection::Q => EcLevel::Q,
        ErrorCorrection::H => EcLevel::H,
    }
}

/// Resolved paint for dark modules.
enum Paint {
    Solid(Rgba8),
    Linear {
        stops: Vec<(f64, Rgba8)>,
        cos: f64,
        sin: f64,
    },
}

impl Paint {
    fn resolve(fill: &Fill) -> Result<Self, RenderError> {
        match fill {
            Fill::Color(color) => Ok(Paint::Solid(Rgba8::from_hex(color)?)),
            Fill::Gradient(gradient) => Self::linear(gradient),
        }
    }

    fn linear(gradient: &Gradient) -> Result<Self, RenderError> {
        let mut stops = gradient
            .color_stops
            .iter()
            .map(|stop| Ok((stop.offset.clamp(0.0, 1.0), Rgba8::from_hex(&stop.color)?)))
            .collect::<Result<Vec<_>, RenderError>>()?;
        if stops.is_empty() {
            return Err(RenderError::InvalidColor(String::new()));
        }
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Paint::Linear {
            stops,
            cos: gradient.rotation.cos(),
            sin: gradient.rotation.sin(),
        })
    }

    /// Color at pixel `(x, y)` on a `side` x `side` canvas.
    fn at(&self, x: f64, y: f64, side: f64) -> Rgba8 {
        match self {
            Paint::Solid(color) => *color,
            Paint::Linear { stops, cos, sin } => {
                let half = side / 2.0;
                let extent = (cos.abs() + sin.abs()) * half;
                let projected = (x - half) * cos + (y - half) * sin;
                let t = if extent > 0.0 {
                    (0.5 + projected / (2.0 * extent)).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                sample(stops, t)
            }
        }
    }
}

fn sample(stops: &[(f64, Rgba8)], t: f64) -> Rgba8 {
    let (first_offset, first) = stops[0];
    if t <= first_offset {
        return first;
    }
    for pair in stops.windows(2) {
        let (a_offset, a) = pair[0];
        let (b_offset, b) = pair[1];
        if t <= b_offset {
            let span = b_offset - a_offset;
            let local = if span > 0.0 { (t - a_offset) / span } else { 1.0 };
            return a.lerp(b, local);
        }
    }
    stops[stops.len() - 1].1
}

fn background(config: &RendererConfiguration) -> Result<Rgba8, RenderError> {
    match &config.background_options.color {
        Background::Transparent => Ok(Rgba8::TRANSPARENT),
        Background::Color(color) => Rgba8::from_hex(color),
    }
}

/// Constructs [`RasterInstance`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterRenderer;

impl Renderer for RasterRenderer {
    type Instance = RasterInstance;

    fn construct(&mut self, config: &RendererConfiguration) -> Result<RasterInstance, RenderError> {
        RasterInstance::new(config)
    }
}

/// Encoded symbol plus the configuration that styles it.
pub struct RasterInstance {
    config: RendererConfiguration,
    code: QrCode,
}

impl std::fmt::Debug for RasterInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterInstance")
            .field("modules", &self.code.width())
            .field("width", &self.config.width)
            .finish()
    }
}

impl RasterInstance {
    pub fn new(config: &RendererConfiguration) -> Result<Self, RenderError> {
        let code = encode(config)?;
        canvas_side(config, &code)?;
        // Reject unparseable colors up front rather than at export time.
        Paint::resolve(&config.dots_options.fill)?;
        background(config)?;
        Ok(Self {
            config: config.clone(),
            code,
        })
    }

    pub fn config(&self) -> &RendererConfiguration {
        &self.config
    }

    /// Modules per side of the encoded symbol.
    pub fn modules(&self) -> usize {
        self.code.width()
    }

    /// Rasterize the symbol.
    pub fn to_image(&self) -> Result<RgbaImage, RenderError> {
        let modules = self.code.width() as u32;
        let margin = self.config.margin;
        let side = canvas_side(&self.config, &self.code)?;
        let area = (side - 2 * margin) as f64;
        let module_px = area / modules as f64;

        let paint = Paint::resolve(&self.config.dots_options.fill)?;
        let light = background(&self.config)?;

        let mut img = RgbaImage::from_pixel(side, side, light.pixel());
        for y in margin..side - margin {
            let qy = (((y - margin) as f64) / module_px) as usize;
            for x in margin..side - margin {
                let qx = (((x - margin) as f64) / module_px) as usize;
                if qx >= self.code.width() || qy >= self.code.width() {
                    continue;
                }
                if self.code[(qx, qy)] == qrcode::Color::Dark {
                    let color = paint.at(x as f64 + 0.5, y as f64 + 0.5, side as f64);
                    img.put_pixel(x, y, color.pixel());
                }
            }
        }
        Ok(img)
    }

    fn png_bytes(&self) -> Result<Vec<u8>, RenderError> {
        let img = self.to_image()?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| RenderError::Image(e.to_string()))?;
        Ok(bytes)
    }

    fn svg_string(&self) -> String {
        use qrcode::render::svg;

        let dark = match &self.config.dots_options.fill {
            Fill::Color(color) => color.as_str(),
            Fill::Gradient(gradient) => gradient
                .color_stops
                .first()
                .map(|stop| stop.color.as_str())
                .unwrap_or("#000000"),
        };
        let light = match &self.config.background_options.color {
            Background::Color(color) => color.as_str(),
            Background::Transparent => "none",
        };

        self.code
            .render()
            .min_dimensions(self.config.width, self.config.height)
            .dark_color(svg::Color(dark))
            .light_color(svg::Color(light))
            .build()
    }
}

/// Canvas side: the configured width, grown to fit the symbol and margins.
fn canvas_side(config: &RendererConfiguration, code: &QrCode) -> Result<u32, RenderError> {
    let fitted = u32::try_from(code.width())
        .ok()
        .zip(config.margin.checked_mul(2))
        .and_then(|(modules, margins)| modules.checked_add(margins));
    match fitted.map(|fitted| config.width.max(fitted).max(config.height)) {
        Some(side) if side <= MAX_SIDE => Ok(side),
        _ => Err(RenderError::Image(format!(
            "canvas larger than {}x{} pixels",
            MAX_SIDE, MAX_SIDE
        ))),
    }
}

fn encode(config: &RendererConfiguration) -> Result<QrCode, RenderError> {
    QrCode::with_error_correction_level(
        config.data.as_bytes(),
        ec_level(config.qr_options.error_correction_level),
    )
    .map_err(|e| RenderError::Encode(e.to_string()))
}

impl RendererInstance for RasterInstance {
    fn update(&mut self, config: &RendererConfiguration) -> Result<(), RenderError> {
        *self = RasterInstance::new(config)?;
        Ok(())
    }

    fn image_bytes(&self, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
        match format {
            ImageFormat::Png => self.png_bytes(),
            ImageFormat::Svg => Ok(self.svg_string().into_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DesignOptions;

    fn config(options: &DesignOptions) -> RendererConfiguration {
        RendererConfiguration::build("https://example.com", options)
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba8::from_hex("#1a1a2e").unwrap(), Rgba8::opaque(0x1a, 0x1a, 0x2e));
        assert_eq!(Rgba8::from_hex("FFFFFF").unwrap(), Rgba8::opaque(255, 255, 255));
        assert_eq!(Rgba8::from_hex("#f0a").unwrap(), Rgba8::opaque(255, 0, 170));
        assert!(Rgba8::from_hex("#12345").is_err());
        assert!(Rgba8::from_hex("#gggggg").is_err());
        assert!(Rgba8::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_png_has_configured_size() {
        let instance = RasterInstance::new(&config(&DesignOptions::default())).unwrap();
        let img = instance.to_image().unwrap();
        assert_eq!(img.dimensions(), (300, 300));
        // Margin is background.
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        // Top-left finder pattern starts right inside the margin.
        assert_eq!(img.get_pixel(11, 11), &Rgba([0x1a, 0x1a, 0x2e, 255]));

        let bytes = instance.image_bytes(ImageFormat::Png).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_transparent_background() {
        let options = DesignOptions {
            transparent: true,
            ..DesignOptions::default()
        };
        let img = RasterInstance::new(&config(&options)).unwrap().to_image().unwrap();
        assert_eq!(img.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_gradient_runs_between_stops() {
        let options = DesignOptions {
            gradient: true,
            gradient_from: "#000000".into(),
            gradient_to: "#ffffff".into(),
            gradient_rotation: "0".into(),
            ..DesignOptions::default()
        };
        let instance = RasterInstance::new(&config(&options)).unwrap();
        let img = instance.to_image().unwrap();
        let left = img.get_pixel(11, 11)[0];
        let modules = instance.modules() as u32;
        let module_px = 280 / modules;
        // Top-right finder pattern, outer ring.
        let right = img.get_pixel(289 - module_px / 2, 11)[0];
        assert!(left < right, "left {} right {}", left, right);
    }

    #[test]
    fn test_invalid_color_rejected_at_construct() {
        let options = DesignOptions {
            foreground: "not-a-color".into(),
            ..DesignOptions::default()
        };
        let err = RasterRenderer.construct(&config(&options)).unwrap_err();
        assert_eq!(err, RenderError::InvalidColor("not-a-color".into()));
    }

    #[test]
    fn test_svg_output() {
        let options = DesignOptions {
            transparent: true,
            ..DesignOptions::default()
        };
        let instance = RasterInstance::new(&config(&options)).unwrap();
        let svg = String::from_utf8(instance.image_bytes(ImageFormat::Svg).unwrap()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#1a1a2e"));
        assert!(svg.contains("none"));
    }

    #[test]
    fn test_update_reencodes() {
        let mut instance = RasterInstance::new(&config(&DesignOptions::default())).unwrap();
        let small = instance.modules();
        let long = RendererConfiguration::build(&"x".repeat(500), &DesignOptions::default());
        instance.update(&long).unwrap();
        assert!(instance.modules() > small);
        assert_eq!(instance.config().data.len(), 500);
    }

    #[test]
    fn test_cleared_colors_render_with_defaults() {
        let options = DesignOptions {
            foreground: String::new(),
            background: String::new(),
            ..DesignOptions::default()
        };
        let img = RasterInstance::new(&config(&options)).unwrap().to_image().unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(11, 11), &Rgba([0x1a, 0x1a, 0x2e, 255]));
    }

    #[test]
    fn test_oversized_canvas_rejected() {
        let options = DesignOptions {
            size: 4_000_000_000,
            ..DesignOptions::default()
        };
        let err = RasterRenderer.construct(&config(&options)).unwrap_err();
        assert!(matches!(err, RenderError::Image(_)));

        let at_limit = DesignOptions {
            size: MAX_SIDE,
            ..DesignOptions::default()
        };
        assert!(RasterRenderer.construct(&config(&at_limit)).is_ok());
    }

    #[test]
    fn test_small_size_grows_to_fit() {
        let options = DesignOptions {
            size: 8,
            ..DesignOptions::default()
        };
        let instance = RasterInstance::new(&config(&options)).unwrap();
        let img = instance.to_image().unwrap();
        assert_eq!(img.width(), instance.modules() as u32 + 20);
    }
}
