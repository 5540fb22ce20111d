//! # Studio Session Tests
//!
//! Edit, render, export, undo and reset sequences against a recording
//! renderer, checking the order of renderer calls and the state left
//! behind.

use std::cell::RefCell;
use std::rc::Rc;

use qrforge::content::{ContentType, MessageKey};
use qrforge::design::{DotStyle, UNDO_LIMIT};
use qrforge::export::{ExportError, ExportKind};
use qrforge::render::{
    GateMessage, ImageFormat, RenderError, RenderOutcome, Renderer, RendererConfiguration,
    RendererInstance,
};
use qrforge::studio::{ExportOutcome, ExportReceipt, Notice, Studio};

// ============================================================================
// RECORDING RENDERER
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Construct(String),
    Update(String),
    Bytes(ImageFormat),
}

#[derive(Default, Clone)]
struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
    fail_updates: Rc<RefCell<bool>>,
}

impl Recorder {
    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn renders(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Construct(_) | Call::Update(_)))
            .count()
    }
}

struct RecordingRenderer(Recorder);

struct RecordingInstance(Recorder);

impl Renderer for RecordingRenderer {
    type Instance = RecordingInstance;

    fn construct(&mut self, config: &RendererConfiguration) -> Result<RecordingInstance, RenderError> {
        self.0.calls.borrow_mut().push(Call::Construct(config.data.clone()));
        Ok(RecordingInstance(self.0.clone()))
    }
}

impl RendererInstance for RecordingInstance {
    fn update(&mut self, config: &RendererConfiguration) -> Result<(), RenderError> {
        if *self.0.fail_updates.borrow() {
            return Err(RenderError::Encode("rejected".into()));
        }
        self.0.calls.borrow_mut().push(Call::Update(config.data.clone()));
        Ok(())
    }

    fn image_bytes(&self, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
        self.0.calls.borrow_mut().push(Call::Bytes(format));
        Ok(vec![0xAB])
    }
}

fn studio() -> (Studio<RecordingRenderer>, Recorder) {
    let recorder = Recorder::default();
    (Studio::new(RecordingRenderer(recorder.clone())), recorder)
}

// ============================================================================
// RENDERING
// ============================================================================

#[test]
fn test_typing_coalesces_into_one_render() {
    let (mut studio, recorder) = studio();
    let mut now = 0;
    for prefix in ["e", "ex", "exa", "exam", "examp", "exampl", "example.com"] {
        studio.edit_field("url", prefix, now).unwrap();
        assert!(studio.poll(now).is_none());
        now += 30;
    }

    assert!(studio.poll(now + 150).is_some());
    assert_eq!(recorder.calls(), vec![Call::Construct("https://example.com".into())]);
    assert!(studio.exports_enabled());
}

#[test]
fn test_generate_now_is_synchronous() {
    let (mut studio, recorder) = studio();
    studio.edit_field("url", "example.com", 0).unwrap();

    let outcome = studio.generate_now();
    assert_eq!(outcome, RenderOutcome::Rendered { constructed: true });
    assert_eq!(recorder.renders(), 1);

    // The cancelled debounce never fires.
    assert!(studio.poll(10_000).is_none());
    assert_eq!(recorder.renders(), 1);
}

#[test]
fn test_second_render_updates_in_place() {
    let (mut studio, recorder) = studio();
    studio.select_type(ContentType::Text, 0);
    studio.edit_field("text", "one", 0).unwrap();
    studio.generate_now();
    studio.edit_field("text", "two", 1).unwrap();
    studio.generate_now();

    assert_eq!(
        recorder.calls(),
        vec![Call::Construct("one".into()), Call::Update("two".into())]
    );
}

#[test]
fn test_invalid_content_never_reaches_renderer() {
    let (mut studio, recorder) = studio();
    studio.select_type(ContentType::Wifi, 0);
    studio.edit_field("password", "secret", 0).unwrap();

    let outcome = studio.generate_now();
    assert_eq!(outcome, RenderOutcome::Invalid(MessageKey::WifiRequired));
    assert_eq!(studio.gate_message(), Some(GateMessage::Invalid(MessageKey::WifiRequired)));
    assert!(recorder.calls().is_empty());
    assert!(studio.begin_export(ExportKind::Png).is_none());
}

#[test]
fn test_render_failure_disables_exports() {
    let (mut studio, recorder) = studio();
    studio.edit_field("url", "example.com", 0).unwrap();
    studio.generate_now();

    *recorder.fail_updates.borrow_mut() = true;
    studio.edit_design(1, |o| o.dot_style = DotStyle::Dots);
    assert_eq!(studio.generate_now(), RenderOutcome::Failed);
    assert_eq!(studio.gate_message(), Some(GateMessage::RenderFailed));
    assert!(studio.gate().has_instance());
    assert!(studio.begin_export(ExportKind::Png).is_none());
}

// ============================================================================
// EXPORTS AND UNDO
// ============================================================================

#[test]
fn test_every_export_kind_snapshots() {
    let (mut studio, recorder) = studio();
    studio.edit_field("url", "example.com", 0).unwrap();
    studio.generate_now();

    for (i, kind) in ExportKind::ALL.into_iter().enumerate() {
        let pending = studio.begin_export(kind).unwrap();
        assert_eq!(pending.format, kind.image_format());
        assert_eq!(studio.design().history().len(), i + 1);
        studio.finish_export(pending.ticket, Ok(ExportReceipt::Done));
    }
    assert!(recorder.calls().contains(&Call::Bytes(ImageFormat::Svg)));
}

#[test]
fn test_undo_restores_style_before_export() {
    let (mut studio, _) = studio();
    studio.edit_field("url", "example.com", 0).unwrap();
    studio.edit_design(0, |o| o.foreground = "#111111".into());
    studio.generate_now();

    let pending = studio.begin_export(ExportKind::Png).unwrap();
    studio.finish_export(pending.ticket, Ok(ExportReceipt::Done));

    studio.edit_design(1, |o| {
        o.foreground = "#222222".into();
        o.size = 640;
    });
    studio.set_logo("data:image/png;base64,AAAA", 2);
    studio.edit_field("url", "example.org", 3).unwrap();

    assert!(studio.undo().is_some());
    assert_eq!(studio.options().foreground, "#111111");
    assert_eq!(studio.options().size, 300);
    // Content and logo are left alone.
    assert_eq!(studio.payload(), "https://example.org");
    assert_eq!(studio.options().logo.as_deref(), Some("data:image/png;base64,AAAA"));
}

#[test]
fn test_history_is_bounded() {
    let (mut studio, _) = studio();
    studio.edit_field("url", "example.com", 0).unwrap();
    studio.generate_now();

    for _ in 0..(UNDO_LIMIT + 5) {
        let pending = studio.begin_export(ExportKind::Png).unwrap();
        studio.finish_export(pending.ticket, Ok(ExportReceipt::Done));
    }
    assert_eq!(studio.design().history().len(), UNDO_LIMIT);
}

#[test]
fn test_export_failure_is_transient() {
    let (mut studio, _) = studio();
    studio.edit_field("url", "example.com", 0).unwrap();
    studio.generate_now();

    let pending = studio.begin_export(ExportKind::Print).unwrap();
    let outcome = studio.finish_export(pending.ticket, Err(ExportError::Unavailable("no printer".into())));
    let ExportOutcome::Reported(message) = outcome else {
        panic!("expected a report");
    };
    assert!(message.is_error);
    assert_eq!(message.text, "Print failed.");
    assert!(studio.notice().unwrap().is_error());
    assert!(studio.exports_enabled());

    studio.dismiss_notice();
    assert!(studio.notice().is_none());
}

// ============================================================================
// RESET
// ============================================================================

#[test]
fn test_reset_wins_over_in_flight_exports() {
    let (mut studio, _) = studio();
    studio.edit_field("url", "example.com", 0).unwrap();
    studio.generate_now();

    let save = studio.begin_export(ExportKind::Save).unwrap();
    let pdf = studio.begin_export(ExportKind::Pdf).unwrap();
    studio.reset();

    assert_eq!(
        studio.finish_export(save.ticket, Ok(ExportReceipt::Saved { id: "0123456789abcdef".into() })),
        ExportOutcome::Superseded
    );
    assert_eq!(
        studio.finish_export(pdf.ticket, Err(ExportError::Io("disk".into()))),
        ExportOutcome::Superseded
    );
    assert_eq!(studio.notice(), Some(&Notice::Reset));
    assert_eq!(studio.notice().unwrap().text(), "Form reset.");
}

#[test]
fn test_export_after_reset_and_rerender_is_fresh() {
    let (mut studio, recorder) = studio();
    studio.edit_field("url", "example.com", 0).unwrap();
    studio.generate_now();
    let stale = studio.begin_export(ExportKind::Png).unwrap();

    studio.reset();
    studio.edit_field("url", "example.net", 5).unwrap();
    studio.generate_now();

    // A new instance was constructed; the old ticket belongs to the previous one.
    assert_eq!(
        recorder.calls().last(),
        Some(&Call::Construct("https://example.net".into()))
    );
    assert_eq!(
        studio.finish_export(stale.ticket, Ok(ExportReceipt::Done)),
        ExportOutcome::Superseded
    );

    let fresh = studio.begin_export(ExportKind::Png).unwrap();
    assert!(matches!(
        studio.finish_export(fresh.ticket, Ok(ExportReceipt::Done)),
        ExportOutcome::Reported(_)
    ));
}
