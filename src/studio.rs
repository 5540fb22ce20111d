//! # Studio
//!
//! One editing session: the content form, the design state with its undo
//! history, and the render gate, driven by a single owner.
//!
//! ## Exports
//!
//! Exports are two-phase. [`Studio::begin_export`] snapshots the design,
//! produces the artifact bytes and hands out an [`ExportTicket`]. The
//! caller performs the outward I/O and reports back with
//! [`Studio::finish_export`]. Tickets are consumed on completion, and a
//! ticket issued before the renderer instance was dropped (by
//! [`Studio::reset`] or by content turning invalid) completes as
//! [`ExportOutcome::Superseded`] without touching the session.
//!
//! ## Example
//!
//! ```
//! use qrforge::content::ContentType;
//! use qrforge::export::ExportKind;
//! use qrforge::render::RasterRenderer;
//! use qrforge::studio::{ExportOutcome, ExportReceipt, Studio};
//!
//! let mut studio = Studio::new(RasterRenderer);
//! studio.select_type(ContentType::Text, 0);
//! studio.edit_field("text", "hello", 10).unwrap();
//! studio.generate_now();
//!
//! let pending = studio.begin_export(ExportKind::Png).unwrap();
//! assert!(pending.bytes.starts_with(b"\x89PNG"));
//! let outcome = studio.finish_export(pending.ticket, Ok(ExportReceipt::Done));
//! assert!(matches!(outcome, ExportOutcome::Reported(_)));
//! ```

use tracing::{debug, info, warn};

use crate::content::{ContentFields, ContentType, UnknownField, ValidationResult};
use crate::design::{DesignOptions, DesignSnapshot, DesignState};
use crate::export::{ExportError, ExportKind, ExportMessage, PdfLayout};
use crate::render::{
    GateMessage, ImageFormat, RenderGate, RenderOutcome, RenderRequest, Renderer, RendererInstance,
    ScheduledRender,
};
use crate::store::SaveDesign;

/// Text shown after a reset.
pub const RESET_MESSAGE: &str = "Form reset.";

/// Active content type plus every type's field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentForm {
    pub content_type: ContentType,
    pub fields: ContentFields,
}

impl ContentForm {
    pub fn payload(&self) -> String {
        self.content_type.encode(&self.fields)
    }

    pub fn validate(&self) -> ValidationResult {
        self.content_type.validate(&self.fields)
    }
}

/// Transient message for the session's message area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Export(ExportMessage),
    Reset,
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Export(msg) => &msg.text,
            Notice::Reset => RESET_MESSAGE,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Export(msg) if msg.is_error)
    }
}

/// Claim on one in-flight export. Not `Clone`: it completes exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct ExportTicket {
    id: u64,
    kind: ExportKind,
    generation: u64,
}

impl ExportTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> ExportKind {
        self.kind
    }
}

/// Everything an export collaborator needs.
#[derive(Debug)]
pub struct PendingExport {
    pub ticket: ExportTicket,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
    /// Encoded payload at the time of export.
    pub payload: String,
    /// Design at the time of export.
    pub snapshot: DesignSnapshot,
    /// Page placement, for PDF exports.
    pub pdf_layout: Option<PdfLayout>,
}

impl PendingExport {
    /// Request body for a design store.
    pub fn save_request(&self) -> SaveDesign {
        SaveDesign {
            data: self.payload.clone(),
            options: self.snapshot.clone(),
            image_png: (self.format == ImageFormat::Png).then(|| self.bytes.clone()),
        }
    }
}

/// What a collaborator reports on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportReceipt {
    Done,
    /// Stored under this id.
    Saved { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Reported(ExportMessage),
    /// Session moved on since the ticket was issued; nothing reported.
    Superseded,
}

pub struct Studio<R: Renderer> {
    form: ContentForm,
    design: DesignState,
    gate: RenderGate<R>,
    notice: Option<Notice>,
    next_ticket: u64,
}

impl<R: Renderer> Studio<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_gate(RenderGate::new(renderer))
    }

    pub fn with_gate(gate: RenderGate<R>) -> Self {
        Self {
            form: ContentForm::default(),
            design: DesignState::new(),
            gate,
            notice: None,
            next_ticket: 0,
        }
    }

    pub fn form(&self) -> &ContentForm {
        &self.form
    }

    pub fn content_type(&self) -> ContentType {
        self.form.content_type
    }

    pub fn fields(&self) -> &ContentFields {
        &self.form.fields
    }

    pub fn design(&self) -> &DesignState {
        &self.design
    }

    pub fn options(&self) -> &DesignOptions {
        self.design.options()
    }

    pub fn gate(&self) -> &RenderGate<R> {
        &self.gate
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn gate_message(&self) -> Option<GateMessage> {
        self.gate.message()
    }

    pub fn preview_label(&self) -> Option<&str> {
        self.gate.preview_label()
    }

    pub fn exports_enabled(&self) -> bool {
        self.gate.exports_enabled()
    }

    pub fn payload(&self) -> String {
        self.form.payload()
    }

    pub fn validate(&self) -> ValidationResult {
        self.form.validate()
    }

    // ========================================================================
    // EDITING
    // ========================================================================

    pub fn select_type(&mut self, content_type: ContentType, now: u64) -> ScheduledRender {
        self.form.content_type = content_type;
        self.gate.request_render(now)
    }

    /// Set a field of the active content type.
    pub fn edit_field(&mut self, field: &str, value: &str, now: u64) -> Result<ScheduledRender, UnknownField> {
        self.form.fields.set(self.form.content_type, field, value)?;
        Ok(self.gate.request_render(now))
    }

    /// Replace all field values.
    pub fn set_fields(&mut self, fields: ContentFields, now: u64) -> ScheduledRender {
        self.form.fields = fields;
        self.gate.request_render(now)
    }

    /// Apply a style edit. No snapshot is taken.
    pub fn edit_design(&mut self, now: u64, edit: impl FnOnce(&mut DesignOptions)) -> ScheduledRender {
        edit(self.design.options_mut());
        self.gate.request_render(now)
    }

    pub fn set_logo(&mut self, logo: impl Into<String>, now: u64) -> ScheduledRender {
        self.design.set_logo(logo);
        self.gate.request_render(now)
    }

    pub fn clear_logo(&mut self, now: u64) -> ScheduledRender {
        self.design.clear_logo();
        self.gate.request_render(now)
    }

    // ========================================================================
    // RENDERING
    // ========================================================================

    /// Run the debounced render if it is due.
    pub fn poll(&mut self, now: u64) -> Option<RenderOutcome> {
        let request = RenderRequest {
            content_type: self.form.content_type,
            fields: &self.form.fields,
            options: self.design.options(),
        };
        self.gate.poll(now, request)
    }

    pub fn generate_now(&mut self) -> RenderOutcome {
        let request = RenderRequest {
            content_type: self.form.content_type,
            fields: &self.form.fields,
            options: self.design.options(),
        };
        self.gate.generate_now(request)
    }

    /// Restore the latest design snapshot and re-render.
    ///
    /// Returns `None` when there was nothing to undo.
    pub fn undo(&mut self) -> Option<RenderOutcome> {
        if !self.design.undo() {
            return None;
        }
        Some(self.generate_now())
    }

    /// Clear content, design and history, and empty the preview.
    pub fn reset(&mut self) -> &Notice {
        self.form.fields = ContentFields::default();
        self.design.reset();
        self.gate.clear();
        info!("studio reset");
        self.notice.insert(Notice::Reset)
    }

    // ========================================================================
    // EXPORTS
    // ========================================================================

    /// Start an export. `None` when there is no rendered symbol to export.
    pub fn begin_export(&mut self, kind: ExportKind) -> Option<PendingExport> {
        if !self.gate.exports_enabled() {
            debug!(%kind, "export ignored, nothing rendered");
            return None;
        }
        let instance = self.gate.instance()?;

        let format = kind.image_format();
        let bytes = match instance.image_bytes(format) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(%kind, error = %e, "export artifact failed");
                let message = ExportMessage::failure(kind, &ExportError::Render(e));
                self.notice = Some(Notice::Export(message));
                return None;
            }
        };

        self.design.snapshot();

        self.next_ticket += 1;
        let ticket = ExportTicket {
            id: self.next_ticket,
            kind,
            generation: self.gate.generation(),
        };
        let options = self.design.options();
        let pdf_layout = (kind == ExportKind::Pdf).then(|| PdfLayout::new(options.size, &options.label_text));
        debug!(%kind, ticket = ticket.id, bytes = bytes.len(), "export started");

        Some(PendingExport {
            ticket,
            format,
            bytes,
            payload: self.form.payload(),
            snapshot: DesignSnapshot::capture(options),
            pdf_layout,
        })
    }

    /// Complete an export started by [`begin_export`](Self::begin_export).
    pub fn finish_export(
        &mut self,
        ticket: ExportTicket,
        result: Result<ExportReceipt, ExportError>,
    ) -> ExportOutcome {
        if ticket.generation != self.gate.generation() || !self.gate.has_instance() {
            debug!(kind = %ticket.kind, ticket = ticket.id, "export superseded");
            return ExportOutcome::Superseded;
        }

        let message = match result {
            Ok(ExportReceipt::Saved { id }) => ExportMessage::saved(&id),
            Ok(ExportReceipt::Done) => ExportMessage::success(ticket.kind),
            Err(e) => {
                warn!(kind = %ticket.kind, error = %e, "export failed");
                ExportMessage::failure(ticket.kind, &e)
            }
        };
        debug!(kind = %ticket.kind, ticket = ticket.id, is_error = message.is_error, "export finished");
        self.notice = Some(Notice::Export(message.clone()));
        ExportOutcome::Reported(message)
    }

    /// Drop the transient message.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
