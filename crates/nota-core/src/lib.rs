//! Core library for Brazilian receipt OCR processing.
//!
//! This crate provides:
//! - Line item extraction from noisy receipt text (description, quantity, unit price)
//! - An OCR boundary with a Tesseract backend and an optional pure-Rust ONNX backend
//! - The receipt photo import workflow (validation, temp storage, timeout)
//! - Shopping list reports in Brazilian currency format

pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;
pub mod report;

pub use error::{ExtractionError, NotaError, OcrError, Result};
pub use models::config::{ExtractionConfig, NotaConfig, OcrConfig, OcrEngineKind};
pub use models::item::ExtractedItem;
pub use ocr::{create_recognizer, OcrOutput, TextRecognizer, TesseractRecognizer};
#[cfg(feature = "onnx")]
pub use ocr::PureOcrEngine;
pub use receipt::{
    extract_items, import_receipt, ExtractionResult, ImportOutcome, ItemExtractor, LineItemParser,
    ReceiptParser,
};
pub use report::{format_item_report, items_total};
