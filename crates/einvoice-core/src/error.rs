//! Error types for the einvoice-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the einvoice-lens library.
#[derive(Error, Debug)]
pub enum LensError {
    /// Invalid caller input (missing file, wrong extension).
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal user-input errors, surfaced before any PDF work starts.
#[derive(Error, Debug)]
pub enum InputError {
    /// The document path does not exist.
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    /// The document path does not end with `.pdf`.
    #[error("invalid extension for {path}: expected .pdf, got .{got}")]
    InvalidExtension { path: PathBuf, got: String },
}

/// Errors related to PDF access.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Locale-number conversion failure. A data-row cell that cannot be parsed
/// fails the whole row rather than silently becoming zero.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberError {
    /// The string contains no digit characters.
    #[error("no digits in numeric string: {0:?}")]
    NoDigits(String),

    /// The string has digits but no valid number survives separator
    /// cleanup (e.g. stray separators).
    #[error("malformed numeric string: {0:?}")]
    Malformed(String),
}

/// Result type for the einvoice-lens library.
pub type Result<T> = std::result::Result<T, LensError>;
