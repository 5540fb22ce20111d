//! Render gate: decides, per edit, whether and how the renderer runs.
//!
//! The gate owns the renderer instance. Each render pass:
//!
//! 1. re-derives the payload from the fields and validates it; an invalid
//!    result drops the instance, disables exports, and stops there;
//! 2. builds a fresh [`RendererConfiguration`] and either constructs the
//!    first instance or updates the existing one in place;
//! 3. enables exports only when that call succeeded. A renderer failure
//!    disables exports but keeps any instance already produced.
//!
//! Field edits go through [`RenderGate::request_render`], which debounces;
//! [`RenderGate::generate_now`] renders immediately and cancels whatever
//! was pending.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::config::RendererConfiguration;
use super::debounce::{Debouncer, ScheduledRender};
use crate::content::validate::check_payload;
use crate::content::{ContentFields, ContentType, MessageKey};
use crate::design::DesignOptions;

/// Generic text shown when the renderer rejects a configuration.
pub const RENDER_FAILED_MESSAGE: &str = "Failed to generate QR code.";

/// Failure reported by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("QR encoding failed: {0}")]
    Encode(String),

    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    #[error("Image encoding failed: {0}")]
    Image(String),

    #[error("Renderer unavailable: {0}")]
    Unavailable(String),
}

/// Artifact format produced by a renderer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

/// Factory for renderer instances.
pub trait Renderer {
    type Instance: RendererInstance;

    /// Construct an instance from a configuration with a non-empty payload.
    fn construct(&mut self, config: &RendererConfiguration) -> Result<Self::Instance, RenderError>;
}

/// A live renderer holding the current symbol.
pub trait RendererInstance {
    /// Reconfigure in place.
    fn update(&mut self, config: &RendererConfiguration) -> Result<(), RenderError>;

    /// Produce the current symbol as image bytes.
    fn image_bytes(&self, format: ImageFormat) -> Result<Vec<u8>, RenderError>;
}

/// Message surfaced by the last render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMessage {
    Invalid(MessageKey),
    RenderFailed,
}

impl GateMessage {
    pub fn text(&self) -> &'static str {
        match self {
            GateMessage::Invalid(key) => key.default_message(),
            GateMessage::RenderFailed => RENDER_FAILED_MESSAGE,
        }
    }
}

/// Result of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Renderer ran; `constructed` is true when a new instance was created.
    Rendered { constructed: bool },
    /// Content rejected; the renderer was not invoked.
    Invalid(MessageKey),
    /// Renderer rejected the configuration.
    Failed,
}

/// Everything a render pass reads.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub content_type: ContentType,
    pub fields: &'a ContentFields,
    pub options: &'a DesignOptions,
}

pub struct RenderGate<R: Renderer> {
    renderer: R,
    instance: Option<R::Instance>,
    debouncer: Debouncer,
    exports_enabled: bool,
    message: Option<GateMessage>,
    /// Bumped whenever the instance is dropped.
    generation: u64,
    last_config: Option<RendererConfiguration>,
    preview_label: Option<String>,
}

impl<R: Renderer> RenderGate<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_debouncer(renderer, Debouncer::default())
    }

    pub fn with_debouncer(renderer: R, debouncer: Debouncer) -> Self {
        Self {
            renderer,
            instance: None,
            debouncer,
            exports_enabled: false,
            message: None,
            generation: 0,
            last_config: None,
            preview_label: None,
        }
    }

    pub fn instance(&self) -> Option<&R::Instance> {
        self.instance.as_ref()
    }

    pub fn has_instance(&self) -> bool {
        self.instance.is_some()
    }

    pub fn exports_enabled(&self) -> bool {
        self.exports_enabled
    }

    pub fn message(&self) -> Option<GateMessage> {
        self.message
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<ScheduledRender> {
        self.debouncer.pending()
    }

    /// Configuration of the last successful render.
    pub fn last_config(&self) -> Option<&RendererConfiguration> {
        self.last_config.as_ref()
    }

    /// Label shown under the preview, present only while exports are enabled.
    pub fn preview_label(&self) -> Option<&str> {
        self.preview_label.as_deref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Note an edit at `now`; the render runs once the quiet period passes.
    pub fn request_render(&mut self, now: u64) -> ScheduledRender {
        self.debouncer.schedule(now)
    }

    /// Run the pending render if it is due at `now`.
    pub fn poll(&mut self, now: u64, request: RenderRequest<'_>) -> Option<RenderOutcome> {
        self.debouncer
            .take_due(now)
            .map(|_| self.render(request))
    }

    /// Render immediately, cancelling any pending debounced render.
    pub fn generate_now(&mut self, request: RenderRequest<'_>) -> RenderOutcome {
        if let Some(cancelled) = self.debouncer.cancel() {
            debug!(id = cancelled.id, "pending render cancelled by generate");
        }
        self.render(request)
    }

    /// Drop the instance and return to the empty preview.
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.drop_instance();
        self.exports_enabled = false;
        self.message = None;
        self.preview_label = None;
    }

    fn drop_instance(&mut self) {
        if self.instance.take().is_some() {
            self.generation += 1;
        }
        self.last_config = None;
    }

    fn render(&mut self, request: RenderRequest<'_>) -> RenderOutcome {
        let payload = request.content_type.encode(request.fields);
        let verdict = check_payload(&payload, request.content_type.missing_message());
        if let Some(key) = verdict.message_key {
            debug!(content_type = %request.content_type, key = key.as_str(), "content invalid");
            self.drop_instance();
            self.exports_enabled = false;
            self.preview_label = None;
            self.message = Some(GateMessage::Invalid(key));
            return RenderOutcome::Invalid(key);
        }

        let config = RendererConfiguration::build(&payload, request.options);
        let result = match self.instance.as_mut() {
            Some(instance) => instance.update(&config).map(|()| false),
            None => match self.renderer.construct(&config) {
                Ok(instance) => {
                    self.instance = Some(instance);
                    Ok(true)
                }
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(constructed) => {
                debug!(
                    content_type = %request.content_type,
                    constructed,
                    chars = payload.chars().count(),
                    "render complete"
                );
                self.exports_enabled = true;
                self.message = None;
                self.last_config = Some(config);
                let label = request.options.label_text.trim();
                self.preview_label = (!label.is_empty()).then(|| label.to_string());
                RenderOutcome::Rendered { constructed }
            }
            Err(e) => {
                warn!(error = %e, "renderer rejected configuration");
                self.exports_enabled = false;
                self.preview_label = None;
                self.message = Some(GateMessage::RenderFailed);
                RenderOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Counters {
        constructs: Rc<Cell<u32>>,
        updates: Rc<Cell<u32>>,
        fail: Rc<Cell<bool>>,
    }

    struct FakeRenderer(Counters);

    struct FakeInstance {
        counters: Counters,
        data: String,
    }

    impl Renderer for FakeRenderer {
        type Instance = FakeInstance;

        fn construct(&mut self, config: &RendererConfiguration) -> Result<FakeInstance, RenderError> {
            if self.0.fail.get() {
                return Err(RenderError::Unavailable("fake".into()));
            }
            self.0.constructs.set(self.0.constructs.get() + 1);
            Ok(FakeInstance {
                counters: self.0.clone(),
                data: config.data.clone(),
            })
        }
    }

    impl RendererInstance for FakeInstance {
        fn update(&mut self, config: &RendererConfiguration) -> Result<(), RenderError> {
            if self.counters.fail.get() {
                return Err(RenderError::Encode("fake".into()));
            }
            self.counters.updates.set(self.counters.updates.get() + 1);
            self.data = config.data.clone();
            Ok(())
        }

        fn image_bytes(&self, _format: ImageFormat) -> Result<Vec<u8>, RenderError> {
            Ok(self.data.as_bytes().to_vec())
        }
    }

    fn url_fields(url: &str) -> ContentFields {
        let mut fields = ContentFields::default();
        fields.url.url = url.to_string();
        fields
    }

    fn gate() -> (RenderGate<FakeRenderer>, Counters) {
        let counters = Counters::default();
        (RenderGate::new(FakeRenderer(counters.clone())), counters)
    }

    fn request<'a>(fields: &'a ContentFields, options: &'a DesignOptions) -> RenderRequest<'a> {
        RenderRequest {
            content_type: ContentType::Url,
            fields,
            options,
        }
    }

    #[test]
    fn test_construct_then_update() {
        let (mut gate, counters) = gate();
        let options = DesignOptions::default();
        let fields = url_fields("example.com");

        let outcome = gate.generate_now(request(&fields, &options));
        assert_eq!(outcome, RenderOutcome::Rendered { constructed: true });
        assert!(gate.exports_enabled());

        let fields = url_fields("example.org");
        let outcome = gate.generate_now(request(&fields, &options));
        assert_eq!(outcome, RenderOutcome::Rendered { constructed: false });
        assert_eq!(counters.constructs.get(), 1);
        assert_eq!(counters.updates.get(), 1);
        assert_eq!(gate.instance().unwrap().data, "https://example.org");
        assert_eq!(gate.last_config().unwrap().data, "https://example.org");
    }

    #[test]
    fn test_invalid_clears_instance_without_rendering() {
        let (mut gate, counters) = gate();
        let options = DesignOptions::default();
        let fields = url_fields("example.com");
        gate.generate_now(request(&fields, &options));
        let generation = gate.generation();

        let empty = url_fields("   ");
        let outcome = gate.generate_now(request(&empty, &options));
        assert_eq!(outcome, RenderOutcome::Invalid(MessageKey::UrlRequired));
        assert!(!gate.has_instance());
        assert!(!gate.exports_enabled());
        assert_eq!(gate.message(), Some(GateMessage::Invalid(MessageKey::UrlRequired)));
        assert_eq!(gate.generation(), generation + 1);
        assert_eq!(counters.updates.get(), 0);
    }

    #[test]
    fn test_too_long_is_rejected() {
        let (mut gate, counters) = gate();
        let options = DesignOptions::default();
        let fields = url_fields(&format!("example.com/{}", "a".repeat(2000)));
        let outcome = gate.generate_now(request(&fields, &options));
        assert_eq!(outcome, RenderOutcome::Invalid(MessageKey::ContentTooLong));
        assert_eq!(counters.constructs.get(), 0);
    }

    #[test]
    fn test_failure_keeps_instance_and_disables_exports() {
        let (mut gate, counters) = gate();
        let options = DesignOptions::default();
        let fields = url_fields("example.com");
        gate.generate_now(request(&fields, &options));

        counters.fail.set(true);
        let outcome = gate.generate_now(request(&fields, &options));
        assert_eq!(outcome, RenderOutcome::Failed);
        assert!(gate.has_instance());
        assert!(!gate.exports_enabled());
        assert_eq!(gate.message().map(|m| m.text()), Some(RENDER_FAILED_MESSAGE));

        counters.fail.set(false);
        gate.generate_now(request(&fields, &options));
        assert!(gate.exports_enabled());
        assert!(gate.message().is_none());
    }

    #[test]
    fn test_construct_failure_leaves_no_instance() {
        let (mut gate, counters) = gate();
        counters.fail.set(true);
        let options = DesignOptions::default();
        let fields = url_fields("example.com");
        assert_eq!(gate.generate_now(request(&fields, &options)), RenderOutcome::Failed);
        assert!(!gate.has_instance());
    }

    #[test]
    fn test_debounced_edits_render_once() {
        let (mut gate, counters) = gate();
        let options = DesignOptions::default();
        let fields = url_fields("example.com");

        for now in [0, 40, 80, 120] {
            gate.request_render(now);
            assert!(gate.poll(now, request(&fields, &options)).is_none());
        }
        assert!(gate.poll(269, request(&fields, &options)).is_none());
        assert!(gate.poll(270, request(&fields, &options)).is_some());
        assert!(gate.poll(1000, request(&fields, &options)).is_none());
        assert_eq!(counters.constructs.get() + counters.updates.get(), 1);
    }

    #[test]
    fn test_generate_now_cancels_pending() {
        let (mut gate, counters) = gate();
        let options = DesignOptions::default();
        let fields = url_fields("example.com");

        gate.request_render(0);
        gate.generate_now(request(&fields, &options));
        assert!(gate.pending().is_none());
        assert!(gate.poll(500, request(&fields, &options)).is_none());
        assert_eq!(counters.constructs.get(), 1);
    }

    #[test]
    fn test_preview_label_follows_render_state() {
        let (mut gate, _) = gate();
        let options = DesignOptions {
            label_text: "  Scan me ".into(),
            ..DesignOptions::default()
        };
        let fields = url_fields("example.com");
        gate.generate_now(request(&fields, &options));
        assert_eq!(gate.preview_label(), Some("Scan me"));

        let empty = url_fields("");
        gate.generate_now(request(&empty, &options));
        assert_eq!(gate.preview_label(), None);

        let unlabeled = DesignOptions::default();
        gate.generate_now(request(&fields, &unlabeled));
        assert_eq!(gate.preview_label(), None);
    }

    #[test]
    fn test_clear() {
        let (mut gate, _) = gate();
        let options = DesignOptions::default();
        let fields = url_fields("example.com");
        gate.generate_now(request(&fields, &options));
        gate.request_render(10);

        gate.clear();
        assert!(!gate.has_instance());
        assert!(!gate.exports_enabled());
        assert!(gate.pending().is_none());
        assert!(gate.message().is_none());
        assert_eq!(gate.generation(), 1);
    }
}
