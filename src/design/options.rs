//! Design options: everything about how the symbol looks, nothing about
//! what it says.
//!
//! All fields have defaults and every field deserializes leniently: a
//! missing key falls back to its default, and so does an unrecognized shape
//! or error-correction string.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SIZE: u32 = 300;
pub const DEFAULT_FOREGROUND: &str = "#1a1a2e";
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_GRADIENT_FROM: &str = "#6366f1";
pub const DEFAULT_GRADIENT_TO: &str = "#8b5cf6";
pub const DEFAULT_GRADIENT_ROTATION: &str = "0";

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum ErrorCorrection {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    #[default]
    Q,
    /// ~30% recovery
    H,
}

impl ErrorCorrection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCorrection::L => "L",
            ErrorCorrection::M => "M",
            ErrorCorrection::Q => "Q",
            ErrorCorrection::H => "H",
        }
    }

    /// Lenient parse; anything unrecognized is `Q`.
    pub fn from_field(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "L" => ErrorCorrection::L,
            "M" => ErrorCorrection::M,
            "H" => ErrorCorrection::H,
            _ => ErrorCorrection::Q,
        }
    }
}

impl From<String> for ErrorCorrection {
    fn from(value: String) -> Self {
        Self::from_field(&value)
    }
}

/// Shape of the data modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum DotStyle {
    #[default]
    Square,
    Dots,
    Rounded,
    Classy,
    ClassyRounded,
    ExtraRounded,
}

/// Shape of the three finder-pattern outer squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum CornerSquareStyle {
    #[default]
    Square,
    Dot,
    ExtraRounded,
}

/// Shape of the three finder-pattern centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum CornerDotStyle {
    #[default]
    Square,
    Dot,
}

macro_rules! shape_names {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Renderer-facing shape name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Lenient parse; unknown names give the default shape.
            pub fn from_field(value: &str) -> Self {
                match value.trim() {
                    $($name => Self::$variant,)+
                    _ => Self::default(),
                }
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self::from_field(&value)
            }
        }
    };
}

shape_names!(DotStyle {
    Square => "square",
    Dots => "dots",
    Rounded => "rounded",
    Classy => "classy",
    ClassyRounded => "classy-rounded",
    ExtraRounded => "extra-rounded",
});

shape_names!(CornerSquareStyle {
    Square => "square",
    Dot => "dot",
    ExtraRounded => "extra-rounded",
});

shape_names!(CornerDotStyle {
    Square => "square",
    Dot => "dot",
});

/// Live design options, including the logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignOptions {
    /// Symbol width and height in pixels.
    pub size: u32,
    #[serde(rename = "ec")]
    pub error_correction: ErrorCorrection,
    #[serde(rename = "fgColor")]
    pub foreground: String,
    #[serde(rename = "bgColor")]
    pub background: String,
    pub transparent: bool,
    #[serde(rename = "useGradient")]
    pub gradient: bool,
    pub gradient_from: String,
    pub gradient_to: String,
    /// Degrees, kept as typed; parsed when the renderer config is built.
    #[serde(deserialize_with = "deserialize_rotation")]
    pub gradient_rotation: String,
    pub corner_square: CornerSquareStyle,
    pub corner_dot: CornerDotStyle,
    pub dot_style: DotStyle,
    /// Embedded logo image reference (data URL or URL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub label_text: String,
}

impl Default for DesignOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            error_correction: ErrorCorrection::Q,
            foreground: DEFAULT_FOREGROUND.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            transparent: false,
            gradient: false,
            gradient_from: DEFAULT_GRADIENT_FROM.to_string(),
            gradient_to: DEFAULT_GRADIENT_TO.to_string(),
            gradient_rotation: DEFAULT_GRADIENT_ROTATION.to_string(),
            corner_square: CornerSquareStyle::Square,
            corner_dot: CornerDotStyle::Square,
            dot_style: DotStyle::Square,
            logo: None,
            label_text: String::new(),
        }
    }
}

/// Rotation arrives as a string from form inputs but as a number from
/// some JSON clients; accept both.
fn deserialize_rotation<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RotationValue {
        Number(f64),
        Text(String),
    }

    Ok(match RotationValue::deserialize(deserializer)? {
        RotationValue::Number(n) => n.to_string(),
        RotationValue::Text(s) => s,
    })
}

/// Style-only copy of [`DesignOptions`]: no logo, no content.
///
/// This is the unit of undo history and the `options` object persisted with
/// a saved design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignSnapshot {
    pub size: u32,
    #[serde(rename = "ec")]
    pub error_correction: ErrorCorrection,
    #[serde(rename = "fgColor")]
    pub foreground: String,
    #[serde(rename = "bgColor")]
    pub background: String,
    pub transparent: bool,
    #[serde(rename = "useGradient")]
    pub gradient: bool,
    pub gradient_from: String,
    pub gradient_to: String,
    #[serde(deserialize_with = "deserialize_rotation")]
    pub gradient_rotation: String,
    pub corner_square: CornerSquareStyle,
    pub corner_dot: CornerDotStyle,
    pub dot_style: DotStyle,
    pub label_text: String,
}

impl Default for DesignSnapshot {
    fn default() -> Self {
        Self::capture(&DesignOptions::default())
    }
}

impl DesignSnapshot {
    /// Copy every style field of `options`.
    pub fn capture(options: &DesignOptions) -> Self {
        Self {
            size: options.size,
            error_correction: options.error_correction,
            foreground: options.foreground.clone(),
            background: options.background.clone(),
            transparent: options.transparent,
            gradient: options.gradient,
            gradient_from: options.gradient_from.clone(),
            gradient_to: options.gradient_to.clone(),
            gradient_rotation: options.gradient_rotation.clone(),
            corner_square: options.corner_square,
            corner_dot: options.corner_dot,
            dot_style: options.dot_style,
            label_text: options.label_text.clone(),
        }
    }

    /// Write every style field back onto `options`. The logo is untouched.
    pub fn apply_to(self, options: &mut DesignOptions) {
        options.size = self.size;
        options.error_correction = self.error_correction;
        options.foreground = self.foreground;
        options.background = self.background;
        options.transparent = self.transparent;
        options.gradient = self.gradient;
        options.gradient_from = self.gradient_from;
        options.gradient_to = self.gradient_to;
        options.gradient_rotation = self.gradient_rotation;
        options.corner_square = self.corner_square;
        options.corner_dot = self.corner_dot;
        options.dot_style = self.dot_style;
        options.label_text = self.label_text;
    }

    /// Full design options with this style and the given logo.
    pub fn into_options(self, logo: Option<String>) -> DesignOptions {
        let mut options = DesignOptions {
            logo,
            ..DesignOptions::default()
        };
        self.apply_to(&mut options);
        options
    }
}
