//! Rejection of receipt lines that cannot be products.

use crate::models::config::ExtractionConfig;

use super::normalize::digit_count;

/// Why a normalized line was kept or skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoiseVerdict {
    /// The line may hold an item.
    Keep,
    /// Shorter than the minimum line length.
    TooShort,
    /// Contains a fiscal or administrative keyword.
    Keyword(String),
    /// Not enough digits for a price or quantity.
    TooFewDigits,
}

impl NoiseVerdict {
    pub fn is_keep(&self) -> bool {
        matches!(self, NoiseVerdict::Keep)
    }
}

/// Keyword and shape based line filter.
///
/// Keywords match as substrings of the lower-cased line, so an item literally
/// named "Troco" is lost. Precision is preferred over recall here.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    keywords: Vec<String>,
    min_line_length: usize,
    min_digits: usize,
}

impl NoiseFilter {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            keywords: config
                .noise_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            min_line_length: config.min_line_length,
            min_digits: config.min_digits,
        }
    }

    /// Classify a normalized line.
    pub fn check(&self, line: &str) -> NoiseVerdict {
        if line.chars().count() < self.min_line_length {
            return NoiseVerdict::TooShort;
        }

        let lower = line.to_lowercase();
        if let Some(keyword) = self.keywords.iter().find(|k| lower.contains(k.as_str())) {
            return NoiseVerdict::Keyword(keyword.clone());
        }

        if digit_count(line) < self.min_digits {
            return NoiseVerdict::TooFewDigits;
        }

        NoiseVerdict::Keep
    }

    pub fn is_noise(&self, line: &str) -> bool {
        !self.check(line).is_keep()
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keeps_product_lines() {
        let filter = NoiseFilter::default();
        assert_eq!(filter.check("ARROZ TIO JOAO 5KG 2 x 24,90 49,80"), NoiseVerdict::Keep);
        assert_eq!(filter.check("FEIJAO PRETO 1KG 8,50"), NoiseVerdict::Keep);
    }

    #[test]
    fn test_rejects_fiscal_keywords() {
        let filter = NoiseFilter::default();
        assert_eq!(
            filter.check("CNPJ: 12.345.678/0001-99"),
            NoiseVerdict::Keyword("cnpj".to_string())
        );
        assert_eq!(filter.check("TOTAL 58,30"), NoiseVerdict::Keyword("total".to_string()));
        assert_eq!(filter.check("Troco 1,70"), NoiseVerdict::Keyword("troco".to_string()));
    }

    #[test]
    fn test_rejects_short_and_digitless_lines() {
        let filter = NoiseFilter::default();
        assert_eq!(filter.check("1,5"), NoiseVerdict::TooShort);
        assert_eq!(filter.check("OBRIGADO VOLTE SEMPRE"), NoiseVerdict::TooFewDigits);
        assert_eq!(filter.check("LOJA 1"), NoiseVerdict::TooFewDigits);
    }

    #[test]
    fn test_custom_keywords() {
        let config = ExtractionConfig {
            noise_keywords: vec!["  BRINDE ".to_string(), String::new()],
            ..ExtractionConfig::default()
        };
        let filter = NoiseFilter::new(&config);

        assert!(filter.is_noise("BRINDE CANECA 0,01"));
        assert!(!filter.is_noise("TOTAL 58,30"));
    }
}
