//! Owning context for one renderer/input-handler pair.
use presentation_core::{BackendKind, InputHandler, RenderConfig, Renderer, Result, zoom_level};

use crate::factory;

/// One active backend: a renderer and the input handler reading the same
/// display.
///
/// # Teardown
///
/// The input handler shuts down before the renderer, and native resources go
/// last with the renderer. `Drop` follows the same order; the field order
/// below mirrors it.
pub struct Presentation {
    input: Box<dyn InputHandler>,
    renderer: Box<dyn Renderer>,
    backend: BackendKind,
    config: RenderConfig,
}

impl Presentation {
    /// Resolves `config.backend` and initializes the first backend that works.
    ///
    /// # Errors
    ///
    /// - [`PresentationError::NoBackendAvailable`] when `Auto` found nothing usable
    /// - [`PresentationError::BackendUnavailable`] for a backend not compiled in
    /// - the backend's own initialization error for an explicit backend
    ///
    /// [`PresentationError::NoBackendAvailable`]: presentation_core::PresentationError::NoBackendAvailable
    /// [`PresentationError::BackendUnavailable`]: presentation_core::PresentationError::BackendUnavailable
    pub fn new(config: RenderConfig) -> Result<Self> {
        factory::create(&config)
    }

    /// Wraps an explicit renderer/input pair and initializes it.
    ///
    /// Instances built this way share nothing with each other or with the
    /// process-wide registry.
    pub fn from_parts(
        backend: BackendKind,
        config: RenderConfig,
        mut renderer: Box<dyn Renderer>,
        mut input: Box<dyn InputHandler>,
    ) -> Result<Self> {
        renderer.initialize()?;
        if let Err(err) = input.initialize() {
            renderer.shutdown();
            return Err(err);
        }
        if config.enable_mouse {
            input.enable_mouse_input(true);
        }

        let zoom = zoom_level(renderer.as_mut());
        tracing::info!(
            %backend,
            screen_width = renderer.screen_width(),
            screen_height = renderer.screen_height(),
            capabilities = ?renderer.capabilities(),
            zoom,
            "presentation ready"
        );

        Ok(Self {
            input,
            renderer,
            backend,
            config,
        })
    }

    pub fn renderer(&mut self) -> &mut dyn Renderer {
        self.renderer.as_mut()
    }

    pub fn input(&mut self) -> &mut dyn InputHandler {
        self.input.as_mut()
    }

    /// Both halves at once, for loops that draw and poll in one scope.
    pub fn parts_mut(&mut self) -> (&mut dyn Renderer, &mut dyn InputHandler) {
        (self.renderer.as_mut(), self.input.as_mut())
    }

    /// Backend actually in use (never `Auto`).
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.renderer.is_initialized() && self.input.is_initialized()
    }

    /// Shuts down input, then the renderer. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if !self.renderer.is_initialized() && !self.input.is_initialized() {
            return;
        }
        self.input.shutdown();
        self.renderer.shutdown();
        tracing::info!(backend = %self.backend, "presentation shut down");
    }
}

impl Drop for Presentation {
    fn drop(&mut self) {
        self.shutdown();
    }
}
