//! In-process OCR backend using `pure-onnx-ocr`.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use image::DynamicImage;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::TextRecognizer;

/// Recognized fragment with its top-left corner.
struct Fragment {
    x: f32,
    y: f32,
    text: String,
}

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
///
/// Inference is CPU-bound; [`TextRecognizer::recognize`] runs it on the
/// blocking pool so the caller's timeout can still fire.
#[derive(Clone)]
pub struct PureOcrEngine {
    engine: Arc<pure_onnx_ocr::engine::OcrEngine>,
    config: OcrConfig,
}

impl PureOcrEngine {
    /// Create an engine from model files in a directory.
    ///
    /// Expects `det.onnx`, `latin_rec.onnx` and `latin_dict.txt`.
    pub fn from_dir(model_dir: &Path, config: OcrConfig) -> Result<Self, OcrError> {
        let det_path = model_dir.join("det.onnx");
        let rec_path = model_dir.join("latin_rec.onnx");
        let dict_path = model_dir.join("latin_dict.txt");

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!("missing {}", path.display())));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self {
            engine: Arc::new(engine),
            config,
        })
    }

    /// Read an image and return its text in reading order.
    pub fn process(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let start = Instant::now();

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut fragments: Vec<Fragment> = results
            .iter()
            .map(|r| {
                let (x, y) = top_left(&r.bounding_box);
                let text = if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                Fragment { x, y, text }
            })
            .collect();

        Ok(join_reading_order(&mut fragments, start))
    }
}

/// Group fragments into rows (20px bands) and join each row with spaces.
///
/// Receipts print description and price on one visual line, so a row must
/// stay one text line for the line-shape matcher.
fn join_reading_order(fragments: &mut [Fragment], start: Instant) -> String {
    fragments.sort_by(|a, b| {
        let row_a = (a.y / 20.0) as i32;
        let row_b = (b.y / 20.0) as i32;
        row_a
            .cmp(&row_b)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<String> = Vec::new();
    let mut current_row = None;
    for fragment in fragments.iter() {
        let row = (fragment.y / 20.0) as i32;
        match (current_row, lines.last_mut()) {
            (Some(r), Some(line)) if r == row => {
                line.push(' ');
                line.push_str(&fragment.text);
            }
            _ => lines.push(fragment.text.clone()),
        }
        current_row = Some(row);
    }

    info!("OCR complete: {} lines in {}ms", lines.len(), start.elapsed().as_millis());
    lines.join("\n")
}

fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .take(4)
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}

#[async_trait]
impl TextRecognizer for PureOcrEngine {
    fn name(&self) -> &str {
        "pure-onnx-ocr"
    }

    async fn recognize(&self, image_path: &Path) -> Result<String, OcrError> {
        let engine = self.clone();
        let path = image_path.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let image = image::open(&path)
                .map_err(|e| OcrError::InvalidImage(format!("{}: {}", path.display(), e)))?;
            engine.process(&image)
        })
        .await
        .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr task failed: {}", e)))?
    }
}
