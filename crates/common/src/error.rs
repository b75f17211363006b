//! Error types shared across Pixsort crates.

use std::path::PathBuf;

/// Top-level error type for Pixsort operations.
#[derive(Debug, thiserror::Error)]
pub enum PixsortError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Frame error: {message}")]
    Frame { message: String },

    #[error("Dispatch error: {message}")]
    Dispatch { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PixsortError.
pub type PixsortResult<T> = Result<T, PixsortError>;

impl PixsortError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn frame(msg: impl Into<String>) -> Self {
        Self::Frame {
            message: msg.into(),
        }
    }

    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch {
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error was raised while resolving configuration,
    /// i.e. before any frame was touched.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_build_matching_variants() {
        assert!(PixsortError::config("bad axis").is_config());
        assert!(!PixsortError::dispatch("spawn failed").is_config());
        assert_eq!(
            PixsortError::encode("pipe closed").to_string(),
            "Encode error: pipe closed"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: PixsortError = io.into();
        assert!(matches!(err, PixsortError::Io(_)));
    }
}
