//! Error types for alert tile decoding.

use thiserror::Error;

/// Result type alias using AlertError.
pub type AlertResult<T> = Result<T, AlertError>;

/// Primary error type for alert tile operations.
///
/// Per-pixel decoding never fails; these cover the edges of the system:
/// parameter construction, tile shape, tile addressing and tile I/O.
#[derive(Debug, Error)]
pub enum AlertError {
    // === Parameter Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Unknown decoder variant: {0}")]
    UnknownVariant(String),

    // === Tile Errors ===
    #[error("Malformed tile: {0}")]
    MalformedTile(String),

    #[error("Invalid tile coordinate: {0}")]
    InvalidTile(String),

    #[error("Zoom level {zoom} outside supported range {min}-{max}")]
    UnsupportedZoom { zoom: u32, min: u32, max: u32 },

    #[error("Failed to decode tile image: {0}")]
    ImageDecode(String),

    #[error("Failed to encode tile image: {0}")]
    ImageEncode(String),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl AlertError {
    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a MalformedTile error.
    pub fn malformed_tile(msg: impl Into<String>) -> Self {
        Self::MalformedTile(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than the environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            AlertError::InvalidParameter { .. }
                | AlertError::UnknownVariant(_)
                | AlertError::MalformedTile(_)
                | AlertError::InvalidTile(_)
                | AlertError::UnsupportedZoom { .. }
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for AlertError {
    fn from(err: std::io::Error) -> Self {
        AlertError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AlertError {
    fn from(err: serde_json::Error) -> Self {
        AlertError::Config(format!("JSON error: {}", err))
    }
}
