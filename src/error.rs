//! Error types for markodt library.

use std::io;
use thiserror::Error;

/// Result type alias for markodt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion and extraction.
///
/// Problems with individual images or malformed markup never show up here;
/// they are logged and the affected content is skipped.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid conversion options.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The document serializer rejected an operation.
    #[error("Serializer error: {0}")]
    Serializer(String),

    /// The document XML could not be read.
    #[error("Document read error: {0}")]
    Reader(String),

    /// An image could not be measured or embedded.
    #[error("Image error: {0}")]
    Image(String),

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            _ => Error::Image(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Reader(err.to_string())
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io(err.error)
    }
}
