//! Receipt photo import: image upload to shopping list items.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use image::ImageFormat;
use tracing::{info, warn};

use crate::error::{NotaError, OcrError};
use crate::models::config::NotaConfig;
use crate::models::item::ExtractedItem;
use crate::ocr::{prepare_image, OcrOutput, TextRecognizer};

use super::parser::{ExtractionResult, LineItemParser, ReceiptParser};

/// Accepted upload extensions (lower-case, without the dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "tif", "tiff"];

/// What an import produced.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Raw OCR text and engine metadata.
    pub ocr: OcrOutput,
    /// Items and diagnostics from the text.
    pub extraction: ExtractionResult,
}

impl ImportOutcome {
    pub fn items(&self) -> &[ExtractedItem] {
        &self.extraction.items
    }

    pub fn into_items(self) -> Vec<ExtractedItem> {
        self.extraction.items
    }
}

fn check_extension(filename: &str) -> Result<(), OcrError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(OcrError::UnsupportedFormat(filename.to_string()))
    }
}

/// Read a receipt photo and extract its items.
///
/// The prepared image lives in a temporary file for the duration of the OCR
/// call only; it is removed on every return path.
pub async fn import_receipt(
    bytes: &[u8],
    filename: &str,
    recognizer: &dyn TextRecognizer,
    config: &NotaConfig,
) -> crate::Result<ImportOutcome> {
    check_extension(filename)?;

    let image = prepare_image(bytes, &config.ocr)?;

    let mut temp = tempfile::Builder::new()
        .prefix("nota-receipt-")
        .suffix(".png")
        .tempfile()?;
    image
        .write_to(temp.as_file_mut(), ImageFormat::Png)
        .map_err(|e| OcrError::InvalidImage(format!("failed to write temp image: {}", e)))?;
    temp.as_file_mut().flush()?;

    let start = Instant::now();
    let timeout_secs = config.ocr.timeout_secs;
    let text = match tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        recognizer.recognize(temp.path()),
    )
    .await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("{} failed on {}: {}", recognizer.name(), filename, e);
            return Err(e.into());
        }
        Err(_) => {
            warn!("{} timed out after {}s on {}", recognizer.name(), timeout_secs, filename);
            return Err(OcrError::Timeout(timeout_secs).into());
        }
    };
    drop(temp);

    let ocr = OcrOutput {
        text,
        engine: recognizer.name().to_string(),
        processing_time_ms: start.elapsed().as_millis() as u64,
    };

    let parser = ReceiptParser::with_config(config.extraction.clone());
    let extraction = parser.parse(&ocr.text).map_err(NotaError::from)?;

    info!(
        "Imported {} items from {} ({}ms OCR)",
        extraction.items.len(),
        filename,
        ocr.processing_time_ms
    );

    Ok(ImportOutcome { ocr, extraction })
}
