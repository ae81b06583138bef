//! Error types.
//!
//! Layer-stack operations that the editor may refuse return [`LayerError`];
//! reading and writing project files and images return [`ProjectError`].

use thiserror::Error;

/// A layer operation that was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayerError {
    /// The stack must always keep at least one layer.
    #[error("cannot delete the last layer")]
    LastLayer,
    /// Layer names may not be empty or whitespace.
    #[error("layer name cannot be blank")]
    BlankName,
    #[error("layer index {index} out of range (have {len} layers)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failure while loading or saving a project or rendered image.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
