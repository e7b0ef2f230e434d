//! Process-wide presentation instance.
//!
//! For the outermost composition point only (a binary's `main`). Libraries and
//! tests should hold a [`Presentation`] directly. The slot is thread-local
//! because the backends are `!Send`; the loop that initializes it owns it.
use std::cell::RefCell;

use presentation_core::{PresentationError, RenderConfig, Result};

use crate::presentation::Presentation;

thread_local! {
    static INSTANCE: RefCell<Option<Presentation>> = const { RefCell::new(None) };
}

/// Builds the backend from `config` and stores it.
///
/// A second call fails with [`PresentationError::AlreadyInitialized`] and
/// leaves the first instance in place; no backend is built in that case.
pub fn initialize(config: RenderConfig) -> Result<()> {
    if is_initialized() {
        tracing::warn!("presentation initialized twice; keeping the first instance");
        return Err(PresentationError::AlreadyInitialized);
    }
    install(Presentation::new(config)?)
}

/// Stores an already built presentation.
pub fn install(presentation: Presentation) -> Result<()> {
    INSTANCE.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            tracing::warn!("presentation installed twice; keeping the first instance");
            return Err(PresentationError::AlreadyInitialized);
        }
        tracing::info!(backend = %presentation.backend(), "presentation registered");
        *slot = Some(presentation);
        Ok(())
    })
}

/// Tears the stored instance down. No-op when nothing is stored.
pub fn shutdown() {
    // Taken out first so teardown never runs under the borrow.
    let presentation = INSTANCE.with(|slot| slot.borrow_mut().take());
    if let Some(mut presentation) = presentation {
        presentation.shutdown();
    }
}

pub fn is_initialized() -> bool {
    INSTANCE.with(|slot| slot.borrow().is_some())
}

/// Runs `f` against the stored instance.
///
/// # Errors
///
/// [`PresentationError::NotInitialized`] before [`initialize`]/[`install`] or
/// after [`shutdown`].
///
/// # Panics
///
/// Calling back into this module from inside `f` panics on the re-entrant
/// borrow.
pub fn with_instance<R>(f: impl FnOnce(&mut Presentation) -> R) -> Result<R> {
    INSTANCE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let presentation = slot.as_mut().ok_or(PresentationError::NotInitialized)?;
        Ok(f(presentation))
    })
}
