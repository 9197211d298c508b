//! Error types for the tankobon comic structure library.

use thiserror::Error;

/// Primary error type for structure reconstruction and serialization.
#[derive(Error, Debug)]
pub enum ComicError {
    #[error("invalid detection box ({x1},{y1})-({x2},{y2})")]
    InvalidBox { x1: f64, y1: f64, x2: f64, y2: f64 },

    #[error("mismatched parallel arrays for {what}: {boxes} boxes vs {labels} labels")]
    MismatchedArrays {
        what: &'static str,
        boxes: usize,
        labels: usize,
    },

    #[error("unknown page type: {0}")]
    UnknownPageType(String),

    #[error("invalid boolean literal in <{element}>: {value:?}")]
    InvalidBool { element: &'static str, value: String },

    #[error("invalid number in <{element}> for {key}: {value:?}")]
    InvalidNumber {
        element: &'static str,
        key: String,
        value: String,
    },

    #[error("missing <{child}> in <{element}>")]
    MissingElement {
        element: &'static str,
        child: &'static str,
    },

    #[error("bounding box is missing required key {0:?}")]
    MissingBBoxKey(&'static str),

    #[error("malformed document: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("page image count mismatch: {pages} pages but only {images} images")]
    ImageCountMismatch { pages: usize, images: usize },
}

/// Convenience Result type alias for ComicError.
pub type Result<T> = std::result::Result<T, ComicError>;
