use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TesskitError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Bad remote address: {0}")]
    BadRemoteAddress(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server responded with HTTP {0}")]
    Server(u16),

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Tessdata directory not found: {}", .0.display())]
    DataPathNotFound(PathBuf),

    #[error("OCR engine initialization failed: {0}")]
    EngineInit(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Recognition failed: {0}")]
    Recognition(String),

    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),
}

impl TesskitError {
    /// Whether a caller-side retry policy may reasonably try again.
    ///
    /// Nothing inside this crate retries; this only encodes the taxonomy:
    /// transport failures are transient, server errors only for 5xx and 429,
    /// local I/O may be transient (disk full) so it is reported as retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            TesskitError::Transport(_) => true,
            TesskitError::Server(status) => *status == 429 || (500..600).contains(status),
            TesskitError::Filesystem(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for TesskitError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => TesskitError::Server(status.as_u16()),
            None => TesskitError::Transport(e.to_string()),
        }
    }
}

impl From<url::ParseError> for TesskitError {
    fn from(e: url::ParseError) -> Self {
        TesskitError::BadRemoteAddress(e.to_string())
    }
}

impl From<serde_json::Error> for TesskitError {
    fn from(e: serde_json::Error) -> Self {
        TesskitError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TesskitError>;
