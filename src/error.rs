use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl EditorError {
    pub fn invalid(message: impl Into<String>) -> Self {
        EditorError::InvalidParams(message.into())
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
