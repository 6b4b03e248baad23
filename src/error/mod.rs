//! Error handling module for FrameX

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for FrameX operations
#[derive(Error, Debug)]
pub enum FrameXError {
    /// Invalid parameter value or combination, detected before any I/O
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    /// Input file missing, unreadable, or without a decodable video stream
    #[error("Unusable source {path}: {message}")]
    Source { path: PathBuf, message: String },

    /// Inconsistent time window
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Decode process failed or produced no usable output
    #[error("Decode failed: {message}{}", exit_code_suffix(.exit_code))]
    Decode {
        message: String,
        exit_code: Option<i32>,
        /// Diagnostic text captured from the decoder's stderr
        diagnostics: String,
    },

    /// Frame image could not be written
    #[error("Failed to persist frame to {path}: {message}")]
    Persistence { path: PathBuf, message: String },

    /// Caller deadline expired before extraction finished
    #[error("Extraction timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameXError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unusable_source(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Source {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Decode failure without an exit status (spawn errors, empty output)
    pub fn decode(message: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            exit_code: None,
            diagnostics: diagnostics.into(),
        }
    }

    /// Captured decoder diagnostics, if this error carries any
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::Decode { diagnostics, .. } if !diagnostics.is_empty() => Some(diagnostics),
            _ => None,
        }
    }
}

fn exit_code_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" (exit code {})", c)).unwrap_or_default()
}

/// Result type alias for FrameX operations
pub type FrameXResult<T> = std::result::Result<T, FrameXError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_display_includes_exit_code() {
        let err = FrameXError::Decode {
            message: "ffmpeg exited abnormally".to_string(),
            exit_code: Some(1),
            diagnostics: "moov atom not found".to_string(),
        };
        assert_eq!(err.to_string(), "Decode failed: ffmpeg exited abnormally (exit code 1)");
        assert_eq!(err.diagnostics(), Some("moov atom not found"));
    }

    #[test]
    fn test_diagnostics_absent_for_other_kinds() {
        let err = FrameXError::configuration("bad scale");
        assert!(err.diagnostics().is_none());
        assert!(FrameXError::decode("no output", "").diagnostics().is_none());
    }
}
