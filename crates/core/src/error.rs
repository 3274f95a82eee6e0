//! Error types for presentation templating and building.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing templates or building presentations.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The referenced markdown source does not exist.
    #[error("Markdown file not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The front matter block is present but is not a valid YAML mapping.
    #[error("Invalid YAML front matter: {0}")]
    MalformedFrontMatter(String),

    /// Structured input does not describe a presentation template.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),

    /// An image could not be inspected for embedding.
    #[error("Image error: {0}")]
    ImageError(String),
}
