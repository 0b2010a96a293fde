use storage::error::StorageError;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine-level error taxonomy layered over the storage errors.
///
/// Logical conflicts and validation failures must never be retried blindly;
/// the caller has to re-fetch current state first. Storage failures are safe
/// to retry because every mutating operation is idempotent by natural key.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Members without a complete ranking: {0:?}")]
    MissingRankings(Vec<Uuid>),

    #[error("Contestant is not on the participant's roster")]
    NotOnRoster,

    #[error("Pick window is closed for this episode")]
    WindowClosed,

    #[error("Episode scoring is incomplete; contestants without scores: {0:?}")]
    IncompleteScores(Vec<Uuid>),
}

impl EngineError {
    /// Transient storage failures may be retried as-is; everything else needs
    /// the caller to re-read state or fix the input first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Storage(_))
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(error: sqlx::Error) -> Self {
        EngineError::Storage(StorageError::Database(error))
    }
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        EngineError::Validation(errors.to_string())
    }
}
