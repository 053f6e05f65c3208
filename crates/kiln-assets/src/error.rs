use std::path::PathBuf;

/// Errors that can occur while reading an interchange document.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to load glTF file '{0}': {1}")]
    GltfLoadFailed(PathBuf, String),

    #[error("failed to load buffers of '{0}': {1}")]
    BufferLoadFailed(PathBuf, String),
}
