//! Error types for the viewer core

use thiserror::Error;

/// Main error type for the ingestion core
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Engine error: {0}")]
    Engine(String),
}
