//! Configuration structures for OCR and line item extraction.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Keywords marking fiscal or administrative receipt lines.
///
/// Matched as lower-case substrings, so "total" also covers "valor total".
pub const DEFAULT_NOISE_KEYWORDS: &[&str] = &[
    "cnpj",
    "cpf",
    "ie",
    "cupom",
    "fiscal",
    "cliente",
    "subtotal",
    "desconto",
    "acrescimo",
    "troco",
    "pagamento",
    "dinheiro",
    "cartao",
    "pix",
    "total",
    "valor total",
    "qrcode",
    "chave de acesso",
    "nfce",
    "coo",
    "operador",
    "caixa",
];

/// Lines shorter than this (in characters) are never items.
pub const MIN_LINE_LENGTH: usize = 4;

/// Product lines carry at least a price or quantity digit.
pub const MIN_DIGITS: usize = 2;

/// Shortest description kept after truncation.
pub const MIN_DESCRIPTION_LENGTH: usize = 3;

/// Descriptions are cut to this many characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 120;

/// Upper bound on items returned from one receipt.
pub const MAX_ITEMS: usize = 60;

/// Default OCR language hint (Portuguese with English fallback).
pub const DEFAULT_OCR_LANGUAGE: &str = "por+eng";

/// Environment variable overriding the OCR language hint.
pub const OCR_LANG_ENV: &str = "OCR_LANG";

/// Main configuration for the nota pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotaConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Line item extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Which OCR backend turns images into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngineKind {
    /// External `tesseract` binary.
    #[default]
    Tesseract,
    /// In-process ONNX models (requires the `onnx` feature).
    Onnx,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Backend used for recognition.
    pub engine: OcrEngineKind,

    /// Language hint passed to the engine.
    pub language: String,

    /// Path or name of the tesseract executable.
    pub tesseract_path: PathBuf,

    /// Maximum seconds to wait for recognition.
    ///
    /// Enforced at await points only, so engines must keep CPU-bound work
    /// off the async executor (see [`crate::ocr::TextRecognizer`]).
    pub timeout_secs: u64,

    /// Convert to grayscale before recognition.
    pub grayscale: bool,

    /// Maximum image dimension (longer side) for processing.
    pub max_image_size: u32,

    /// Directory containing ONNX model files.
    pub model_dir: PathBuf,

    /// Keep `[UNK]` tokens emitted by the ONNX recognizer.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::Tesseract,
            language: DEFAULT_OCR_LANGUAGE.to_string(),
            tesseract_path: PathBuf::from("tesseract"),
            timeout_secs: 60,
            grayscale: true,
            max_image_size: 2048,
            model_dir: PathBuf::from("models"),
            keep_unk: false,
        }
    }
}

impl OcrConfig {
    /// Apply overrides from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(lang) = std::env::var(OCR_LANG_ENV) {
            let lang = lang.trim();
            if !lang.is_empty() {
                self.language = lang.to_string();
            }
        }
        self
    }
}

/// Line item extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lower-case substrings that mark a line as receipt boilerplate.
    pub noise_keywords: Vec<String>,

    /// Minimum normalized line length in characters.
    pub min_line_length: usize,

    /// Minimum number of digit characters in a line.
    pub min_digits: usize,

    /// Minimum description length after truncation.
    pub min_description_length: usize,

    /// Maximum description length.
    pub max_description_length: usize,

    /// Maximum number of items returned.
    pub max_items: usize,

    /// Compare `quantity * unit price` against the printed line total.
    pub check_line_totals: bool,

    /// Allowed absolute difference for the line total check.
    pub line_total_tolerance: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            noise_keywords: DEFAULT_NOISE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            min_line_length: MIN_LINE_LENGTH,
            min_digits: MIN_DIGITS,
            min_description_length: MIN_DESCRIPTION_LENGTH,
            max_description_length: MAX_DESCRIPTION_LENGTH,
            max_items: MAX_ITEMS,
            check_line_totals: false,
            line_total_tolerance: 0.05,
        }
    }
}

impl NotaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
