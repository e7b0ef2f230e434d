//! Backend construction and `Auto` resolution.
use std::env;

use presentation_core::{BackendKind, PresentationError, RenderConfig, Result};

use crate::presentation::Presentation;

/// Backends `Auto` tries, best first.
///
/// The window backend is only a candidate when a display can be reached.
pub fn auto_candidates(display_detectable: bool) -> Vec<BackendKind> {
    let mut candidates = Vec::with_capacity(2);
    if cfg!(feature = "window") && display_detectable {
        candidates.push(BackendKind::Window);
    }
    if cfg!(feature = "terminal") {
        candidates.push(BackendKind::Terminal);
    }
    candidates
}

/// Whether a graphical display is likely reachable from this process.
pub fn display_detectable() -> bool {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return true;
    }
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|key| env::var_os(key).is_some_and(|value| !value.is_empty()))
}

/// Builds and initializes the backend `config.backend` selects.
pub fn create(config: &RenderConfig) -> Result<Presentation> {
    match config.backend {
        BackendKind::Auto => create_auto(config),
        BackendKind::Terminal => build_terminal(config),
        BackendKind::Window => build_window(config),
    }
}

fn create_auto(config: &RenderConfig) -> Result<Presentation> {
    let candidates = auto_candidates(display_detectable());
    tracing::debug!(?candidates, "resolving auto backend");

    resolve_auto(&candidates, |kind| match kind {
        BackendKind::Window => build_window(config),
        _ => build_terminal(config),
    })
}

/// Tries `build` on each candidate in order and keeps the first success.
///
/// Failures are logged and skipped; running out of candidates is
/// [`PresentationError::NoBackendAvailable`].
pub fn resolve_auto<T>(
    candidates: &[BackendKind],
    mut build: impl FnMut(BackendKind) -> Result<T>,
) -> Result<T> {
    for &kind in candidates {
        match build(kind) {
            Ok(built) => {
                tracing::info!(backend = %kind, "auto backend selected");
                return Ok(built);
            }
            Err(err) => {
                tracing::warn!(backend = %kind, error = %err, "backend failed, trying next");
            }
        }
    }
    Err(PresentationError::NoBackendAvailable)
}

#[cfg(feature = "terminal")]
fn build_terminal(config: &RenderConfig) -> Result<Presentation> {
    use presentation_terminal::{StdinInput, StdoutRenderer};

    let renderer = StdoutRenderer::stdout().with_input_delay(config.input_delay);
    let input = StdinInput::stdin().with_input_delay(config.input_delay);
    Presentation::from_parts(
        BackendKind::Terminal,
        config.clone(),
        Box::new(renderer),
        Box::new(input),
    )
}

#[cfg(not(feature = "terminal"))]
fn build_terminal(_config: &RenderConfig) -> Result<Presentation> {
    Err(PresentationError::BackendUnavailable(BackendKind::Terminal))
}

#[cfg(feature = "window")]
fn build_window(config: &RenderConfig) -> Result<Presentation> {
    use presentation_window::{WindowRenderer, WindowSpec};

    let renderer = WindowRenderer::new(WindowSpec {
        target_fps: config.target_fps,
        ..WindowSpec::default()
    });
    let input = renderer.input_handler();
    Presentation::from_parts(
        BackendKind::Window,
        config.clone(),
        Box::new(renderer),
        Box::new(input),
    )
}

#[cfg(not(feature = "window"))]
fn build_window(_config: &RenderConfig) -> Result<Presentation> {
    Err(PresentationError::BackendUnavailable(BackendKind::Window))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH: [BackendKind; 2] = [BackendKind::Window, BackendKind::Terminal];

    #[test]
    fn window_is_skipped_without_display() {
        let candidates = auto_candidates(false);
        assert!(!candidates.contains(&BackendKind::Window));
        assert_eq!(
            candidates.contains(&BackendKind::Terminal),
            cfg!(feature = "terminal")
        );
    }

    #[cfg(all(feature = "window", feature = "terminal"))]
    #[test]
    fn window_is_preferred_with_display() {
        assert_eq!(
            auto_candidates(true),
            vec![BackendKind::Window, BackendKind::Terminal]
        );
    }

    #[test]
    fn failed_candidate_falls_back_to_the_next() {
        let mut tried = Vec::new();
        let chosen = resolve_auto(&BOTH, |kind| {
            tried.push(kind);
            match kind {
                BackendKind::Window => {
                    Err(PresentationError::display_unavailable(kind, "no display"))
                }
                _ => Ok(kind),
            }
        });

        assert_eq!(chosen.unwrap(), BackendKind::Terminal);
        assert_eq!(tried, vec![BackendKind::Window, BackendKind::Terminal]);
    }

    #[test]
    fn first_success_stops_the_cascade() {
        let mut tried = Vec::new();
        let chosen = resolve_auto(&BOTH, |kind| {
            tried.push(kind);
            Ok(kind)
        });

        assert_eq!(chosen.unwrap(), BackendKind::Window);
        assert_eq!(tried, vec![BackendKind::Window]);
    }

    #[test]
    fn exhausted_cascade_reports_no_backend() {
        let mut attempts = 0;
        let chosen: Result<()> = resolve_auto(&BOTH, |kind| {
            attempts += 1;
            Err(PresentationError::BackendUnavailable(kind))
        });

        assert!(matches!(chosen, Err(PresentationError::NoBackendAvailable)));
        assert_eq!(attempts, 2);
        assert!(matches!(
            resolve_auto(&[], |_| Ok(())),
            Err(PresentationError::NoBackendAvailable)
        ));
    }

    #[cfg(feature = "window")]
    #[test]
    fn fallback_yields_an_initialized_presentation() {
        use presentation_window::WindowRenderer;

        let config = RenderConfig::default();
        let presentation = resolve_auto(&[BackendKind::Terminal, BackendKind::Window], |kind| {
            if kind == BackendKind::Terminal {
                return Err(PresentationError::display_unavailable(kind, "not a tty"));
            }
            let renderer = WindowRenderer::headless(64, 48);
            let input = renderer.input_handler();
            Presentation::from_parts(kind, config.clone(), Box::new(renderer), Box::new(input))
        })
        .unwrap();

        assert_eq!(presentation.backend(), BackendKind::Window);
        assert!(presentation.is_initialized());
    }

    #[cfg(not(feature = "window"))]
    #[test]
    fn missing_window_backend_is_reported() {
        let config = RenderConfig::new(BackendKind::Window);
        assert!(matches!(
            create(&config),
            Err(PresentationError::BackendUnavailable(BackendKind::Window))
        ));
    }
}
