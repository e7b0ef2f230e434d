//! End-to-end lifecycle through the facade and the registry.
//!
//! Backends are built on test doubles: ratatui's `TestBackend` with scripted
//! events for the terminal, a headless host for the window.
use std::time::{Duration, Instant};

use crossterm::event::KeyCode as TermKey;
use presentation::terminal::{ScriptedEvents, TerminalInput, TerminalRenderer};
use presentation::window::{MAX_TILE_SIZE, MIN_TILE_SIZE, NativeEvent, WindowRenderer};
use presentation::{
    BackendKind, InputAction, KeyCode, MenuOption, Presentation, PresentationError, RenderConfig,
    Renderer, registry, zoom_level,
};
use ratatui::backend::TestBackend;

fn terminal(events: &ScriptedEvents) -> Presentation {
    let config = RenderConfig {
        input_delay: Duration::ZERO,
        ..RenderConfig::new(BackendKind::Terminal)
    };
    let renderer = TerminalRenderer::new(TestBackend::new(40, 12), events.clone())
        .with_input_delay(Duration::ZERO);
    let input = TerminalInput::new(events.clone()).with_input_delay(Duration::ZERO);
    Presentation::from_parts(
        BackendKind::Terminal,
        config,
        Box::new(renderer),
        Box::new(input),
    )
    .expect("terminal test backend initializes")
}

fn window() -> Presentation {
    let renderer = WindowRenderer::headless(160, 120);
    let input = renderer.input_handler();
    Presentation::from_parts(
        BackendKind::Window,
        RenderConfig::new(BackendKind::Window),
        Box::new(renderer),
        Box::new(input),
    )
    .expect("headless window initializes")
}

#[test]
fn terminal_session_through_registry() {
    registry::install(terminal(&ScriptedEvents::new())).unwrap();
    assert!(registry::is_initialized());

    let sprites = registry::with_instance(|p| p.renderer().capabilities().supports_sprites());
    assert!(!sprites.unwrap());

    registry::with_instance(|p| p.input().map_key_to_action(KeyCode::Z, InputAction::Pause))
        .unwrap();
    let action = registry::with_instance(|p| p.input().action_for_key(KeyCode::Z)).unwrap();
    assert_eq!(action, Some(InputAction::Pause));

    registry::shutdown();
    assert!(!registry::is_initialized());
    assert!(matches!(
        registry::with_instance(|_| ()),
        Err(PresentationError::NotInitialized)
    ));
}

#[test]
fn access_before_initialization_fails() {
    assert!(!registry::is_initialized());
    assert!(matches!(
        registry::with_instance(|p| p.backend()),
        Err(PresentationError::NotInitialized)
    ));
    registry::shutdown();
}

#[test]
fn second_install_keeps_first_instance() {
    registry::install(terminal(&ScriptedEvents::new())).unwrap();

    let second = window();
    assert!(matches!(
        registry::install(second),
        Err(PresentationError::AlreadyInitialized)
    ));
    assert!(matches!(
        registry::initialize(RenderConfig::default()),
        Err(PresentationError::AlreadyInitialized)
    ));
    assert_eq!(
        registry::with_instance(|p| p.backend()).unwrap(),
        BackendKind::Terminal
    );
    registry::shutdown();
}

#[test]
fn explicit_instances_are_independent() {
    let mut first = terminal(&ScriptedEvents::new());
    let mut second = terminal(&ScriptedEvents::new());

    first.input().map_key_to_action(KeyCode::Z, InputAction::Pause);
    assert_eq!(second.input().action_for_key(KeyCode::Z), None);

    second.shutdown();
    assert!(first.is_initialized());
    assert!(!second.is_initialized());
}

#[test]
fn shutdown_is_idempotent() {
    let mut presentation = terminal(&ScriptedEvents::new());
    presentation.shutdown();
    presentation.shutdown();
    assert!(!presentation.is_initialized());
    assert!(!presentation.input().is_initialized());
    assert!(!presentation.renderer().is_initialized());
}

#[test]
fn scripted_keys_reach_actions() {
    let events = ScriptedEvents::new();
    let mut presentation = terminal(&events);
    events.push_keys([TermKey::Char(' '), TermKey::Up]);

    let (_, input) = presentation.parts_mut();
    assert_eq!(input.poll_input().action, Some(InputAction::Pause));
    assert_eq!(input.poll_input().action, Some(InputAction::MoveUp));
    assert!(!input.poll_input().has_event());
}

#[test]
fn zero_timeout_wait_returns_promptly() {
    for mut presentation in [terminal(&ScriptedEvents::new()), window()] {
        let started = Instant::now();
        let event = presentation.input().wait_for_input(Some(Duration::ZERO));
        assert!(!event.has_event());
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}

#[test]
fn capability_queries_agree() {
    for mut presentation in [terminal(&ScriptedEvents::new()), window()] {
        let renderer = presentation.renderer();
        let caps = renderer.capabilities();
        assert_eq!(renderer.supports_color(), caps.supports_color());
        assert_eq!(renderer.supports_sprites(), caps.supports_sprites());
        assert_eq!(renderer.capabilities(), caps);
    }
}

#[test]
fn only_the_window_zooms_and_clamps() {
    let mut terminal = terminal(&ScriptedEvents::new());
    assert!(terminal.renderer().zoom().is_none());
    assert_eq!(zoom_level(terminal.renderer()), 1.0);

    let mut window = window();
    let zoom = window.renderer().zoom().expect("window renderer zooms");
    for _ in 0..10 {
        zoom.zoom_in();
    }
    assert_eq!(zoom.tile_size(), MAX_TILE_SIZE);
    for _ in 0..10 {
        zoom.zoom_out();
    }
    assert_eq!(zoom.tile_size(), MIN_TILE_SIZE);
}

#[test]
fn pause_menu_makes_overlay_modal() {
    let mut window = window();
    let overlay = window.renderer().overlay().expect("window has an overlay");
    overlay.set_file_exists(Box::new(|_: &str| false));
    assert!(!overlay.has_pending_save());
    assert!(!overlay.is_modal());

    overlay.toggle_pause_menu();
    assert!(overlay.is_modal());
    overlay.toggle_pause_menu();
    assert!(!overlay.is_modal());
}

#[test]
fn menus_honour_remapped_keys() {
    let events = ScriptedEvents::new();
    let mut presentation = terminal(&events);
    presentation
        .input()
        .map_key_to_action(KeyCode::Z, InputAction::MenuSelect);
    let options = [MenuOption::new("Resume"), MenuOption::new("Quit")];

    events.push_keys([TermKey::Down, TermKey::Char('z')]);
    let (renderer, input) = presentation.parts_mut();
    assert_eq!(
        renderer.render_menu("Paused", &options, input.bindings()),
        Some(1)
    );
}

#[test]
fn quit_key_leaves_pause_menu_open() {
    let mut renderer = WindowRenderer::headless(160, 120);
    renderer.initialize().unwrap();
    renderer.with_host(|host| host.inject(NativeEvent::KeyDown(KeyCode::Escape)));
    let input = renderer.input_handler();
    let mut window = Presentation::from_parts(
        BackendKind::Window,
        RenderConfig::new(BackendKind::Window),
        Box::new(renderer),
        Box::new(input),
    )
    .expect("headless window initializes");

    let event = window.input().poll_input();
    assert_eq!(event.action, Some(InputAction::Quit));
    window.renderer().overlay().unwrap().toggle_pause_menu();

    for _ in 0..3 {
        let renderer = window.renderer();
        renderer.begin_frame();
        renderer.end_frame();
    }
    assert!(window.renderer().overlay().unwrap().is_modal());
}
