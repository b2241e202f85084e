use thiserror::Error;

/// Rejected tool configuration. The previous value is always retained.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("brush size must be a positive finite number, got {0}")]
    InvalidBrushSize(f32),

    #[error("malformed color value: {0:?}")]
    MalformedColor(String),
}

/// Undo/redo requests that could not be honoured. The history is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

/// Errors that can occur while saving or loading persisted history
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("malformed persisted data: {0}")]
    Malformed(String),

    #[error("failed to encode history: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        // Anything serde_json rejects on the way in is a schema violation.
        if err.is_data() || err.is_syntax() || err.is_eof() {
            Self::Malformed(err.to_string())
        } else {
            Self::Encode(err)
        }
    }
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur while exporting the canvas as an image
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("canvas has zero area ({width}x{height})")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser download failed: {0}")]
    Download(String),
}
