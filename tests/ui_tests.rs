//! UI automation tests using egui_kittest and AccessKit
//!
//! The full HUD frame is driven against a coordinator wired to fakes, and
//! the accessibility tree is checked for the expected widgets.

mod common;

use common::Rig;
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use hud::backend::{CommandPurpose, CommandRequest, CommandResponse, RemoteEvent, RemoteOutcome};
use hud::telemetry::{MetricSample, TelemetryPipeline};
use hud::ui::{HudApp, OverlayKind, Theme};

fn harness(app: HudApp) -> Harness<'static, HudApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(1100.0, 700.0))
        .build_state(|ctx, app: &mut HudApp| app.frame(ctx), app)
}

fn app_from(rig: Rig) -> (HudApp, common::RecordingBackend, common::FakeRecognizer) {
    let backend = rig.backend.clone();
    let recognizer = rig.recognizer.clone();
    let app = HudApp::from_parts(rig.surface.clone(), rig.coordinator, Theme::hud());
    (app, backend, recognizer)
}

fn type_command(harness: &mut Harness<'_, HudApp>, text: &str) {
    harness.get_by_label("Command input").focus();
    harness.run();
    harness.get_by_label("Command input").type_text(text);
    harness.run();
}

#[test]
fn test_input_controls_exist() {
    let (app, _, _) = app_from(Rig::new());
    let mut harness = harness(app);
    harness.run();

    let _input = harness.get_by_label("Command input");
    let _send = harness.get_by_label("Send command");
    let _mic = harness.get_by_label("Toggle voice input");
    let _empty = harness.get_by_label("Awaiting command...");
    let _waveform = harness.get_by_label("Silent");
}

#[test]
fn test_typing_fills_input_buffer() {
    let (app, _, _) = app_from(Rig::new());
    let mut harness = harness(app);
    harness.run();

    type_command(&mut harness, "hello");

    assert_eq!(harness.state().surface().read().input, "hello");
}

#[test]
fn test_send_forwards_unmatched_command() {
    let (app, backend, _) = app_from(Rig::new());
    let mut harness = harness(app);
    harness.run();

    type_command(&mut harness, "What time is it");
    harness.get_by_label("Send command").click();
    harness.run();
    harness.run();

    assert_eq!(
        backend.requests.lock().clone(),
        vec![CommandRequest::dispatch("what time is it")]
    );
    assert!(harness.state().surface().read().input.is_empty());
    let _line = harness.get_by_label("BOSS: What time is it");
}

#[test]
fn test_show_system_opens_diagnostics_overlay() {
    let (app, backend, _) = app_from(Rig::new());
    let mut harness = harness(app);
    harness.run();

    type_command(&mut harness, "show system");
    harness.get_by_label("Send command").click();
    harness.run();
    harness.run();

    assert!(harness
        .state()
        .surface()
        .read()
        .overlay_visible(OverlayKind::Diagnostics));
    assert!(backend.requests.lock().is_empty());
    let _gpu = harness.get_by_label("GPU not reported");
    let _banner = harness.get_by_label("⚠ SYSTEM OVERLAY ACTIVE");
}

#[test]
fn test_vitals_overlay_without_data() {
    let (app, _, _) = app_from(Rig::new());
    let mut harness = harness(app);
    harness
        .state()
        .surface()
        .write()
        .set_overlay(OverlayKind::Vitals, true);
    harness.run();

    let _placeholder = harness.get_by_label("No biometric data");
}

#[test]
fn test_cannot_send_empty_command() {
    let (app, backend, _) = app_from(Rig::new());
    let mut harness = harness(app);
    harness.run();

    harness.get_by_label("Send command").click();
    harness.run();

    assert!(backend.requests.lock().is_empty());
    assert!(harness.state().surface().read().chat.is_empty());
}

#[test]
fn test_mic_button_starts_recognition() {
    let (app, _, recognizer) = app_from(Rig::new());
    let mut harness = harness(app);
    harness.run();

    harness.get_by_label("Toggle voice input").click();
    harness.run();

    assert_eq!(*recognizer.starts.lock(), 1);
}

#[test]
fn test_mic_button_inert_without_recognizer() {
    let (coordinator, surface, _backend, _remote_tx) = Rig::silent();
    let app = HudApp::from_parts(surface, coordinator, Theme::hud());
    let mut harness = harness(app);
    harness.run();

    harness.get_by_label("Toggle voice input").click();
    harness.run();

    assert!(!harness.state().coordinator().dialogue().is_listening);
}

#[test]
fn test_remote_response_appears_in_chat() {
    let rig = Rig::new();
    let remote_tx = rig.remote_tx.clone();
    let (app, _, _) = app_from(rig);
    let mut harness = harness(app);
    harness.run();

    remote_tx
        .send(RemoteEvent {
            purpose: CommandPurpose::Dispatch,
            outcome: RemoteOutcome::Response(
                CommandResponse::success("Two matches.")
                    .with_data(serde_json::json!([{ "title": "X" }, { "title": "Y" }])),
            ),
        })
        .unwrap();
    harness.run();
    harness.run();

    let _message = harness.get_by_label("JARVIS: Two matches.");
    let _top = harness.get_by_label("JARVIS: Result: X");
    assert!(harness.query_by_label("JARVIS: Result: Y").is_none());
}

#[test]
fn test_transport_failure_raises_banner() {
    let rig = Rig::new();
    let remote_tx = rig.remote_tx.clone();
    let (app, _, _) = app_from(rig);
    let mut harness = harness(app);
    harness.run();

    remote_tx
        .send(RemoteEvent {
            purpose: CommandPurpose::Dispatch,
            outcome: RemoteOutcome::TransportFailure("refused".into()),
        })
        .unwrap();
    harness.run();
    harness.run();

    let _line = harness.get_by_label("JARVIS: Neural Link Offline.");
    let _banner = harness.get_by_label("⚠ CONNECTION ERROR");
}

#[test]
fn test_telemetry_panel_shows_rendered_frame() {
    let (app, _, _) = app_from(Rig::new());
    let mut harness = harness(app);

    let mut pipeline = TelemetryPipeline::new(20, 0.0);
    let frame = pipeline.render(&MetricSample::new(42.0, 61.5).with_gpu(88.0, 70.0));
    frame.apply(&mut harness.state().surface().write().telemetry);
    harness.run();

    let _core = harness.get_by_label("Core load 42");
    let _cpu = harness.get_by_label("CPU 42%");
    let _ram = harness.get_by_label("RAM 61.5%");
    let _gpu = harness.get_by_label("GPU 88%");
    let _graph = harness.get_by_label("CPU history graph");
}

#[test]
fn test_debug_panel_toggle() {
    let (app, _, _) = app_from(Rig::new());
    let mut harness = harness(app);
    harness.run();
    assert!(harness.query_by_label("Frames drawn").is_none());

    harness.get_by_label("Toggle debug panel").click();
    harness.run();
    harness.run();

    assert!(harness.state().show_debug_panel());
    let _row = harness.get_by_label("Frames drawn");
}
