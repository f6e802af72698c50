//! Receipt line item extraction module.

mod builder;
mod dedup;
mod import;
mod parser;
pub mod rules;

pub use builder::build_item;
pub use dedup::{dedup_and_limit, Deduplicated};
pub use import::{import_receipt, ImportOutcome, SUPPORTED_EXTENSIONS};
pub use parser::{extract_items, ExtractionResult, LineItemParser, ReceiptParser};

use crate::error::ExtractionError;
use crate::models::item::ExtractedItem;
use crate::ocr::OcrOutput;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for receipt item extractors.
pub trait ItemExtractor {
    /// Extract items from OCR output.
    fn extract(&self, ocr_output: &OcrOutput) -> Result<Vec<ExtractedItem>>;

    /// Extract items from plain text.
    fn extract_from_text(&self, text: &str) -> Result<Vec<ExtractedItem>>;
}
