//! Receipt text to line item pipeline.

use std::time::Instant;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::item::{checked_subtotal, ExtractedItem};
use crate::ocr::OcrOutput;

use super::builder::build_item;
use super::dedup::dedup_and_limit;
use super::rules::{
    format_br_amount, match_line, normalize_line, split_lines, LineMatch, NoiseFilter, NoiseVerdict,
};
use super::{ItemExtractor, Result};

/// Result of line item extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    /// Items in first-occurrence order.
    pub items: Vec<ExtractedItem>,
    /// Number of lines in the input text.
    pub lines_total: usize,
    /// Lines dropped by the noise filter.
    pub lines_skipped_noise: usize,
    /// Lines no shape matched.
    pub lines_unmatched: usize,
    /// Matched lines whose candidate failed validation.
    pub lines_rejected: usize,
    /// Items dropped as repeats.
    pub duplicates_removed: usize,
    /// Items dropped by the result cap.
    pub truncated: usize,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for receipt parsing.
pub trait LineItemParser {
    /// Parse receipt text into items.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Line-oriented receipt parser.
///
/// Stateless across calls; one instance can be shared between threads.
#[derive(Debug, Clone)]
pub struct ReceiptParser {
    config: ExtractionConfig,
    noise: NoiseFilter,
}

impl ReceiptParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    pub fn with_config(config: ExtractionConfig) -> Self {
        let noise = NoiseFilter::new(&config);
        Self { config, noise }
    }

    /// Enable or disable the `quantity * unit = total` consistency warning.
    pub fn with_line_total_check(mut self, enabled: bool) -> Self {
        self.config.check_line_totals = enabled;
        self
    }

    /// Set the maximum number of returned items.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.config.max_items = max_items;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Parse raw bytes, rejecting anything that is not UTF-8 text.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ExtractionResult> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ExtractionError::InvalidInput(format!("receipt text is not UTF-8: {}", e)))?;
        self.parse(text)
    }

    /// Extract items only.
    pub fn extract_items(&self, text: &str) -> Result<Vec<ExtractedItem>> {
        self.parse(text).map(|r| r.items)
    }

    fn check_line_total(&self, found: &LineMatch, warnings: &mut Vec<String>) {
        let LineMatch::QtyUnitTotal {
            candidate,
            line_total: Some(total),
        } = found
        else {
            return;
        };

        let tolerance = Decimal::from_f64(self.config.line_total_tolerance).unwrap_or(Decimal::ZERO);
        let Some(expected) = checked_subtotal(candidate.unit_price, candidate.quantity) else {
            debug!("{}: line total out of range, not checked", candidate.description);
            return;
        };
        if (expected - *total).abs() > tolerance {
            warnings.push(format!(
                "{}: {} x {} = {}, receipt shows {}",
                candidate.description,
                candidate.quantity,
                format_br_amount(candidate.unit_price),
                format_br_amount(expected),
                format_br_amount(*total)
            ));
        }
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineItemParser for ReceiptParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();
        let mut result = ExtractionResult::default();
        let mut items = Vec::new();

        for raw_line in split_lines(text) {
            result.lines_total += 1;

            let line = normalize_line(raw_line);
            match self.noise.check(&line) {
                NoiseVerdict::Keep => {}
                verdict => {
                    if !line.is_empty() {
                        debug!("skipping {:?}: {:?}", line, verdict);
                    }
                    result.lines_skipped_noise += 1;
                    continue;
                }
            }

            let found = match_line(&line);
            if self.config.check_line_totals {
                self.check_line_total(&found, &mut result.warnings);
            }

            let Some(candidate) = found.into_candidate() else {
                debug!("no line shape matched {:?}", line);
                result.lines_unmatched += 1;
                continue;
            };

            match build_item(candidate, &self.config) {
                Some(item) => items.push(item),
                None => result.lines_rejected += 1,
            }
        }

        let deduplicated = dedup_and_limit(items, self.config.max_items);
        result.items = deduplicated.items;
        result.duplicates_removed = deduplicated.duplicates_removed;
        result.truncated = deduplicated.truncated;
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        if result.items.is_empty() {
            debug!("no items in {} lines", result.lines_total);
            return Err(ExtractionError::NoItems);
        }

        info!(
            "Extracted {} items from {} lines ({} noise, {} unmatched, {} duplicates)",
            result.items.len(),
            result.lines_total,
            result.lines_skipped_noise,
            result.lines_unmatched,
            result.duplicates_removed
        );

        Ok(result)
    }
}

impl ItemExtractor for ReceiptParser {
    fn extract(&self, ocr_output: &OcrOutput) -> Result<Vec<ExtractedItem>> {
        self.extract_items(&ocr_output.text)
    }

    fn extract_from_text(&self, text: &str) -> Result<Vec<ExtractedItem>> {
        self.extract_items(text)
    }
}

/// Extract items from receipt text with the default configuration.
pub fn extract_items(text: &str) -> Result<Vec<ExtractedItem>> {
    ReceiptParser::new().extract_items(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const RECEIPT: &str = "ARROZ TIO JOAO 5KG 2 x 24,90 49,80
CNPJ: 12.345.678/0001-99
FEIJAO PRETO 1KG 8,50
TOTAL 58,30";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_basic_receipt() {
        let items = extract_items(RECEIPT).unwrap();

        assert_eq!(
            items,
            vec![
                ExtractedItem {
                    description: "ARROZ TIO JOAO 5KG".to_string(),
                    quantity: 2,
                    unit_price: dec("24.90"),
                },
                ExtractedItem {
                    description: "FEIJAO PRETO 1KG".to_string(),
                    quantity: 1,
                    unit_price: dec("8.50"),
                },
            ]
        );
    }

    #[test]
    fn test_parse_counts_lines() {
        let result = ReceiptParser::new().parse(RECEIPT).unwrap();

        assert_eq!(result.lines_total, 4);
        assert_eq!(result.lines_skipped_noise, 2);
        assert_eq!(result.lines_unmatched, 0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = ReceiptParser::new();
        assert_eq!(
            parser.extract_items(RECEIPT).unwrap(),
            parser.extract_items(RECEIPT).unwrap()
        );
    }

    #[test]
    fn test_total_line_alone_is_no_items() {
        assert_eq!(extract_items("TOTAL 58,30"), Err(ExtractionError::NoItems));
    }

    #[test]
    fn test_garbage_is_no_items() {
        assert_eq!(extract_items(""), Err(ExtractionError::NoItems));
        assert_eq!(
            extract_items("SUPERMERCADO BOM PRECO\nOBRIGADO PELA PREFERENCIA\n"),
            Err(ExtractionError::NoItems)
        );
    }

    #[test]
    fn test_non_utf8_is_invalid_input() {
        let err = ReceiptParser::new().parse_bytes(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidInput(_)));
    }

    #[test]
    fn test_order_and_dedup() {
        let text = "PAO FRANCES 3 x 0,50 1,50
LEITE UHT 1L 4,99
Pao Frances 3 x 0,50 1,50
CAFE PILAO 500G 15,90";
        let result = ReceiptParser::new().parse(text).unwrap();
        let descriptions: Vec<&str> = result.items.iter().map(|i| i.description.as_str()).collect();

        assert_eq!(descriptions, vec!["PAO FRANCES", "LEITE UHT 1L", "CAFE PILAO 500G"]);
        assert_eq!(result.duplicates_removed, 1);
    }

    #[test]
    fn test_max_items() {
        let text: String = (1..=80)
            .map(|i| format!("PRODUTO {} 1 x {},00\n", i, i))
            .collect();
        let result = ReceiptParser::new().parse(&text).unwrap();

        assert_eq!(result.items.len(), 60);
        assert_eq!(result.truncated, 20);
        assert_eq!(result.items[0].description, "PRODUTO 1");

        let small = ReceiptParser::new().with_max_items(5).parse(&text).unwrap();
        assert_eq!(small.items.len(), 5);
    }

    #[test]
    fn test_line_total_check_warns_on_mismatch() {
        let text = "ARROZ 5KG 2 x 24,90 39,80\nFEIJAO 1KG 3 x 8,50 25,50";

        let unchecked = ReceiptParser::new().parse(text).unwrap();
        assert!(unchecked.warnings.is_empty());

        let checked = ReceiptParser::new().with_line_total_check(true).parse(text).unwrap();
        assert_eq!(checked.items.len(), 2);
        assert_eq!(checked.warnings.len(), 1);
        assert!(checked.warnings[0].starts_with("ARROZ 5KG"));
        assert!(checked.warnings[0].contains("R$ 39,80"));
    }

    #[test]
    fn test_out_of_range_line_is_rejected_not_fatal() {
        let text = "ITEM CARO 4000000000 x 79228162514264337593543950,00 1,00\nFEIJAO 1KG 8,50";

        let result = ReceiptParser::new().with_line_total_check(true).parse(text).unwrap();

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].description, "FEIJAO 1KG");
        assert_eq!(result.lines_rejected, 1);
        assert!(result.warnings.is_empty());
        assert_eq!(crate::report::items_total(&result.items), dec("8.50"));
    }

    #[test]
    fn test_custom_noise_keywords() {
        let config = ExtractionConfig {
            noise_keywords: vec!["sacola".to_string()],
            ..ExtractionConfig::default()
        };
        let parser = ReceiptParser::with_config(config);
        let items = parser.extract_items("SACOLA PLASTICA 0,10\nTOTAL GERAL 5,00").unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "TOTAL GERAL");
    }

    #[test]
    fn test_crlf_lines() {
        let text = "LEITE UHT 1L 4,99\r\nPAO DE FORMA 7,49\r\n";
        let result = ReceiptParser::new().parse(text).unwrap();
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.lines_total, 2);
    }

    #[test]
    fn test_bare_carriage_return_and_unicode_separators_split_lines() {
        for separator in ["\r", "\u{2028}", "\u{2029}", "\u{85}", "\x0c"] {
            let text = format!("LEITE UHT 1L 4,99{}PAO DE FORMA 7,49", separator);
            let result = ReceiptParser::new().parse(&text).unwrap();

            assert_eq!(
                result.items,
                vec![
                    ExtractedItem {
                        description: "LEITE UHT 1L".to_string(),
                        quantity: 1,
                        unit_price: dec("4.99"),
                    },
                    ExtractedItem {
                        description: "PAO DE FORMA".to_string(),
                        quantity: 1,
                        unit_price: dec("7.49"),
                    },
                ],
                "separator {:?}",
                separator
            );
            assert_eq!(result.lines_total, 2);
        }
    }
}
