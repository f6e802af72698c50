//! Tesseract command-line backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::TextRecognizer;

/// Runs `tesseract <image> stdout -l <language>`.
///
/// The child process is killed if the recognition future is dropped, so a
/// timeout around [`TextRecognizer::recognize`] does not leak processes.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: PathBuf,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            binary: config.tesseract_path.clone(),
            language: config.language.clone(),
        }
    }

    /// Override the language hint (e.g. "por", "por+eng").
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image_path: &Path) -> Result<String, OcrError> {
        let start = Instant::now();
        debug!(
            "Running {} on {} (lang {})",
            self.binary.display(),
            image_path.display(),
            self.language
        );

        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::Unavailable(format!(
                    "{} not found; install tesseract-ocr",
                    self.binary.display()
                )),
                _ => OcrError::Unavailable(format!("failed to launch {}: {}", self.binary.display(), e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(
            "tesseract read {} lines in {}ms",
            text.lines().count(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_language_from_config() {
        let recognizer = TesseractRecognizer::new(&OcrConfig::default());
        assert_eq!(recognizer.language(), "por+eng");
        assert_eq!(recognizer.with_language("por").language(), "por");
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let config = OcrConfig {
            tesseract_path: PathBuf::from("/nonexistent/bin/tesseract-nota-test"),
            ..OcrConfig::default()
        };
        let recognizer = TesseractRecognizer::new(&config);

        let err = recognizer.recognize(Path::new("receipt.png")).await.unwrap_err();
        assert!(matches!(err, OcrError::Unavailable(_)));
    }
}
