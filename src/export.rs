//! # Export
//!
//! The outward actions available once a symbol is rendered, and the
//! transient messages they report.
//!
//! | Kind | Artifact | Success | Failure |
//! |------|----------|---------|---------|
//! | `Png` | PNG bytes | "PNG downloaded." | "Download failed." |
//! | `Svg` | SVG bytes | "SVG downloaded." | "Download failed." |
//! | `Pdf` | PNG bytes placed by [`PdfLayout`] | "PDF downloaded." | "PDF export failed." |
//! | `Clipboard` | PNG bytes | "Image copied to clipboard." | "Copy failed. Try downloading PNG." |
//! | `Print` | PNG bytes | "Sent to printer." | "Print failed." |
//! | `Save` | PNG bytes + snapshot | "Design saved. ID: …" | "Save failed (server may be offline)" |
//!
//! The actual file, clipboard, print and PDF writers live outside this
//! crate; they receive bytes from [`Studio::begin_export`] and report back
//! through [`Studio::finish_export`].
//!
//! [`Studio::begin_export`]: crate::studio::Studio::begin_export
//! [`Studio::finish_export`]: crate::studio::Studio::finish_export

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::{ImageFormat, RenderError};

/// Base file name for downloaded artifacts.
pub const DOWNLOAD_NAME: &str = "qr-code";

/// Font size for the PDF label.
pub const PDF_LABEL_FONT_SIZE: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Png,
    Svg,
    Pdf,
    Clipboard,
    Print,
    Save,
}

impl ExportKind {
    pub const ALL: [ExportKind; 6] = [
        ExportKind::Png,
        ExportKind::Svg,
        ExportKind::Pdf,
        ExportKind::Clipboard,
        ExportKind::Print,
        ExportKind::Save,
    ];

    /// Image format the collaborator needs.
    pub fn image_format(&self) -> ImageFormat {
        match self {
            ExportKind::Svg => ImageFormat::Svg,
            _ => ImageFormat::Png,
        }
    }

    /// Download file name, for the kinds that produce a file.
    pub fn file_name(&self) -> Option<String> {
        match self {
            ExportKind::Png | ExportKind::Svg => Some(format!(
                "{}.{}",
                DOWNLOAD_NAME,
                self.image_format().extension()
            )),
            ExportKind::Pdf => Some(format!("{}.pdf", DOWNLOAD_NAME)),
            _ => None,
        }
    }

    pub fn success_text(&self) -> &'static str {
        match self {
            ExportKind::Png => "PNG downloaded.",
            ExportKind::Svg => "SVG downloaded.",
            ExportKind::Pdf => "PDF downloaded.",
            ExportKind::Clipboard => "Image copied to clipboard.",
            ExportKind::Print => "Sent to printer.",
            ExportKind::Save => "Design saved.",
        }
    }

    pub fn failure_text(&self) -> &'static str {
        match self {
            ExportKind::Png | ExportKind::Svg => "Download failed.",
            ExportKind::Pdf => "PDF export failed.",
            ExportKind::Clipboard => "Copy failed. Try downloading PNG.",
            ExportKind::Print => "Print failed.",
            ExportKind::Save => "Save failed (server may be offline)",
        }
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExportKind::Png => "png",
            ExportKind::Svg => "svg",
            ExportKind::Pdf => "pdf",
            ExportKind::Clipboard => "clipboard",
            ExportKind::Print => "print",
            ExportKind::Save => "save",
        };
        f.write_str(name)
    }
}

/// Failure reported by an export collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Artifact could not be produced.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Collaborator unreachable or unsupported (no clipboard, server offline).
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Collaborator refused with its own message.
    #[error("{0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e.to_string())
    }
}

/// Transient message after an export completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMessage {
    pub kind: ExportKind,
    pub is_error: bool,
    pub text: String,
}

impl ExportMessage {
    pub fn success(kind: ExportKind) -> Self {
        Self {
            kind,
            is_error: false,
            text: kind.success_text().to_string(),
        }
    }

    /// Save confirmation naming the stored id.
    pub fn saved(id: &str) -> Self {
        Self {
            kind: ExportKind::Save,
            is_error: false,
            text: format!("Design saved. ID: {}", id),
        }
    }

    /// Failure message; a rejected save shows the server's own reason.
    pub fn failure(kind: ExportKind, error: &ExportError) -> Self {
        let text = match (kind, error) {
            (ExportKind::Save, ExportError::Rejected(reason)) if !reason.is_empty() => reason.clone(),
            (ExportKind::Save, ExportError::Rejected(_)) => "Save failed".to_string(),
            _ => kind.failure_text().to_string(),
        };
        Self {
            kind,
            is_error: true,
            text,
        }
    }
}

/// Where the symbol and its label go on a single PDF page, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfLayout {
    pub page_width: u32,
    pub page_height: u32,
    pub image_x: u32,
    pub image_y: u32,
    pub image_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<PdfLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfLabel {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub max_width: u32,
    pub font_size: u32,
}

impl PdfLayout {
    /// Portrait page with a 20 px border and room for one label line.
    pub fn new(size: u32, label: &str) -> Self {
        let label = (!label.is_empty()).then(|| PdfLabel {
            text: label.to_string(),
            x: 20,
            y: size + 48,
            max_width: size,
            font_size: PDF_LABEL_FONT_SIZE,
        });
        Self {
            page_width: size + 40,
            page_height: size + 80,
            image_x: 20,
            image_y: 20,
            image_size: size,
            label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(ExportKind::Png.file_name().as_deref(), Some("qr-code.png"));
        assert_eq!(ExportKind::Svg.file_name().as_deref(), Some("qr-code.svg"));
        assert_eq!(ExportKind::Pdf.file_name().as_deref(), Some("qr-code.pdf"));
        assert_eq!(ExportKind::Clipboard.file_name(), None);
    }

    #[test]
    fn test_image_formats() {
        for kind in ExportKind::ALL {
            let expected = if kind == ExportKind::Svg {
                ImageFormat::Svg
            } else {
                ImageFormat::Png
            };
            assert_eq!(kind.image_format(), expected, "{}", kind);
        }
    }

    #[test]
    fn test_failure_messages() {
        let io = ExportError::Io("disk full".into());
        assert_eq!(ExportMessage::failure(ExportKind::Png, &io).text, "Download failed.");
        assert_eq!(
            ExportMessage::failure(ExportKind::Clipboard, &ExportError::Unavailable("no api".into())).text,
            "Copy failed. Try downloading PNG."
        );
        assert_eq!(
            ExportMessage::failure(ExportKind::Save, &ExportError::Rejected("Invalid JSON".into())).text,
            "Invalid JSON"
        );
        assert_eq!(
            ExportMessage::failure(ExportKind::Save, &ExportError::Rejected(String::new())).text,
            "Save failed"
        );
        assert_eq!(
            ExportMessage::failure(ExportKind::Save, &ExportError::Unavailable("offline".into())).text,
            "Save failed (server may be offline)"
        );
        assert!(ExportMessage::failure(ExportKind::Pdf, &io).is_error);
    }

    #[test]
    fn test_saved_message() {
        let msg = ExportMessage::saved("0123456789abcdef");
        assert_eq!(msg.text, "Design saved. ID: 0123456789abcdef");
        assert!(!msg.is_error);
    }

    #[test]
    fn test_pdf_layout() {
        let layout = PdfLayout::new(300, "Menu");
        assert_eq!((layout.page_width, layout.page_height), (340, 380));
        assert_eq!((layout.image_x, layout.image_y, layout.image_size), (20, 20, 300));
        let label = layout.label.unwrap();
        assert_eq!((label.x, label.y, label.max_width), (20, 348, 300));
        assert_eq!(label.font_size, 12);

        assert!(PdfLayout::new(300, "").label.is_none());
    }
}
