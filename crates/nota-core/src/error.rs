//! Error types for the nota-core library.

use thiserror::Error;

/// Main error type for the nota library.
#[derive(Error, Debug)]
pub enum NotaError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Line item extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl NotaError {
    /// Message suitable for showing to the person who uploaded the receipt.
    pub fn user_message(&self) -> String {
        match self {
            NotaError::Extraction(ExtractionError::NoItems) => {
                "No items could be recognized on the receipt. Try a sharper photo.".to_string()
            }
            NotaError::Extraction(e) => format!("Could not read the receipt: {}", e),
            NotaError::Ocr(OcrError::UnsupportedFormat(_)) => {
                "Unsupported file format. Use JPG, PNG, WEBP, BMP or TIFF.".to_string()
            }
            NotaError::Ocr(OcrError::Timeout(secs)) => {
                format!("Reading the receipt took longer than {}s. Try again.", secs)
            }
            NotaError::Ocr(e) => format!("Failed to process the receipt image: {}", e),
            other => other.to_string(),
        }
    }
}

/// Errors raised at the OCR boundary.
///
/// These mean the receipt text was never produced, as opposed to
/// [`ExtractionError`] which means the text was read but held nothing usable.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The uploaded file extension is not an accepted image type.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Invalid or undecodable image data.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The OCR engine could not be started.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The engine did not answer within the configured limit (seconds).
    #[error("OCR timed out after {0}s")]
    Timeout(u64),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),
}

/// Errors related to receipt line item extraction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The text was read but no line produced an item.
    #[error("no items recognized on the receipt")]
    NoItems,

    /// The input could not be treated as receipt text.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Field validation failed.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },
}

/// Result type for the nota library.
pub type Result<T> = std::result::Result<T, NotaError>;
