//! Error types for KOLBR Core

use thiserror::Error;

/// Failure kinds shared by every stage of the analysis pipeline.
///
/// Lower layers convert their own failures into one of these at the point of
/// origin, so the presentation layer only ever sees a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KolbrError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote error: API returned {status}")]
    Remote { status: u16 },
}

impl KolbrError {
    /// Stable machine-readable kind, used in logs and tool responses
    pub fn kind(&self) -> &'static str {
        match self {
            KolbrError::InvalidInput(_) => "invalid_input",
            KolbrError::MissingField(_) => "missing_field",
            KolbrError::NotFound(_) => "not_found",
            KolbrError::Transport(_) => "transport_error",
            KolbrError::Remote { .. } => "remote_error",
        }
    }
}

pub type KolbrResult<T> = Result<T, KolbrError>;
