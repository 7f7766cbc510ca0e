//! Error types for TrimStrip.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for TrimStrip operations.
#[derive(Error, Debug)]
pub enum TrimStripError {
    #[error("Source unreadable: {0}")]
    SourceUnreadable(String),

    #[error("Frame {index} could not be decoded: {reason}")]
    FrameDecodeFailed { index: usize, reason: String },

    #[error("Decode cancelled by a newer request")]
    DecodeCancelled,

    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for TrimStrip operations.
pub type Result<T> = std::result::Result<T, TrimStripError>;

/// Owned, serializable copy of a [`TrimStripError`], one variant per variant.
///
/// I/O errors keep their message only; the `ErrorKind` is not carried.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameFailure {
    #[error("Source unreadable: {0}")]
    SourceUnreadable(String),

    #[error("Frame {index} could not be decoded: {reason}")]
    FrameDecodeFailed { index: usize, reason: String },

    #[error("Decode cancelled by a newer request")]
    DecodeCancelled,

    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<&TrimStripError> for FrameFailure {
    fn from(error: &TrimStripError) -> Self {
        match error {
            TrimStripError::SourceUnreadable(s) => Self::SourceUnreadable(s.clone()),
            TrimStripError::FrameDecodeFailed { index, reason } => Self::FrameDecodeFailed {
                index: *index,
                reason: reason.clone(),
            },
            TrimStripError::DecodeCancelled => Self::DecodeCancelled,
            TrimStripError::ConfigurationInvalid(s) => Self::ConfigurationInvalid(s.clone()),
            TrimStripError::Io(e) => Self::Io(e.to_string()),
            TrimStripError::Serialization(s) => Self::Serialization(s.clone()),
        }
    }
}

impl FrameFailure {
    /// Rebuild the error this failure was taken from.
    pub fn to_error(&self) -> TrimStripError {
        match self {
            Self::SourceUnreadable(s) => TrimStripError::SourceUnreadable(s.clone()),
            Self::FrameDecodeFailed { index, reason } => TrimStripError::FrameDecodeFailed {
                index: *index,
                reason: reason.clone(),
            },
            Self::DecodeCancelled => TrimStripError::DecodeCancelled,
            Self::ConfigurationInvalid(s) => TrimStripError::ConfigurationInvalid(s.clone()),
            Self::Io(msg) => TrimStripError::Io(std::io::Error::other(msg.clone())),
            Self::Serialization(s) => TrimStripError::Serialization(s.clone()),
        }
    }
}
