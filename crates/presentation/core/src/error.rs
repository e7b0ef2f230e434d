//! Error types surfaced by the presentation layer.
use thiserror::Error;

use crate::config::BackendKind;

pub type Result<T> = std::result::Result<T, PresentationError>;

#[derive(Debug, Error)]
pub enum PresentationError {
    /// The native display, window, or event source could not be acquired.
    #[error("{backend} backend unavailable: {reason}")]
    DisplayUnavailable { backend: BackendKind, reason: String },

    #[error("terminal i/o failed")]
    Io(#[from] std::io::Error),

    /// The backend was not compiled into this build.
    #[error("{0} backend not compiled in")]
    BackendUnavailable(BackendKind),

    #[error("no presentation backend could be initialized")]
    NoBackendAvailable,

    /// The process-wide presentation was accessed before `initialize`.
    #[error("presentation accessed before initialization")]
    NotInitialized,

    #[error("presentation already initialized")]
    AlreadyInitialized,
}

impl PresentationError {
    pub fn display_unavailable(backend: BackendKind, reason: impl Into<String>) -> Self {
        Self::DisplayUnavailable {
            backend,
            reason: reason.into(),
        }
    }
}
