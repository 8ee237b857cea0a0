//! Error types for manifest loading.

use thiserror::Error;

use crate::ValidationError;

/// Errors that can occur while loading or saving a [`CommandManifest`](crate::CommandManifest).
#[derive(Debug, Error)]
pub enum ManifestError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension is neither JSON nor YAML.
    #[error("unsupported manifest format: {0}")]
    UnsupportedFormat(String),

    /// The manifest parsed but declares a tree the engine can't serve.
    #[error("invalid manifest: {0}")]
    Invalid(#[from] ValidationError),
}

/// Convenience alias for results with [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;
