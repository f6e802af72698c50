//! Data models for receipt items and configuration.

pub mod config;
pub mod item;

pub use config::{ExtractionConfig, NotaConfig, OcrConfig, OcrEngineKind};
pub use item::{DedupKey, ExtractedItem};
