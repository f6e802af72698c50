//! OCR boundary: turning a receipt photo into raw text.
//!
//! Engines are black boxes behind [`TextRecognizer`]; the extraction pipeline
//! only ever sees the text they return.

mod preprocessing;
#[cfg(feature = "onnx")]
mod pure_engine;
mod tesseract;

pub use preprocessing::{calculate_resize_dimensions, prepare_image};
#[cfg(feature = "onnx")]
pub use pure_engine::PureOcrEngine;
pub use tesseract::TesseractRecognizer;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;
use crate::models::config::{OcrConfig, OcrEngineKind};

/// An engine that reads the text of an image file.
///
/// Callers bound `recognize` with a timeout. Implementations doing heavy
/// synchronous work should move it to `tokio::task::spawn_blocking`.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Short engine name for logs and metadata.
    fn name(&self) -> &str;

    /// Recognize all text in the image, one visual line per text line.
    async fn recognize(&self, image_path: &Path) -> Result<String, OcrError>;
}

/// Text produced by an OCR engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrOutput {
    /// Raw multi-line text.
    pub text: String,

    /// Engine that produced the text.
    pub engine: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl OcrOutput {
    /// Wrap text that did not come from an engine (e.g. a pasted transcript).
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            engine: "text".to_string(),
            processing_time_ms: 0,
        }
    }
}

/// Build the recognizer selected in the configuration.
pub fn create_recognizer(config: &OcrConfig) -> Result<Box<dyn TextRecognizer>, OcrError> {
    match config.engine {
        OcrEngineKind::Tesseract => Ok(Box::new(TesseractRecognizer::new(config))),
        #[cfg(feature = "onnx")]
        OcrEngineKind::Onnx => Ok(Box::new(PureOcrEngine::from_dir(
            &config.model_dir,
            config.clone(),
        )?)),
        #[cfg(not(feature = "onnx"))]
        OcrEngineKind::Onnx => Err(OcrError::Unavailable(
            "nota was built without the `onnx` feature".to_string(),
        )),
    }
}
