use thiserror::Error;

use crate::engine::EngineError;

/// Application-level error type.
///
/// Validation variants are raised locally, before any network call; `Engine`
/// wraps every failure at the backend boundary. Nothing here is fatal: every
/// operation stays retryable by re-issuing the action.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("An exchange is already in flight for this session")]
    ExchangeInFlight,

    #[error("Interview already started")]
    AlreadyStarted,

    #[error("Interview is completed; no further answers are accepted")]
    SessionCompleted,

    #[error("Chat history was already loaded for this session")]
    HistoryAlreadyLoaded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

impl AppError {
    /// True when the failure should be surfaced as a transient notice and the
    /// user simply re-issues the action. Engine and I/O failures qualify;
    /// validation and state errors are corrected by the user instead.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Engine(_) | AppError::Io(_))
    }
}
