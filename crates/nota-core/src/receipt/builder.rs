//! Final validation of matched candidates.

use rust_decimal::Decimal;

use crate::models::config::ExtractionConfig;
use crate::models::item::{checked_subtotal, ExtractedItem};

use super::rules::Candidate;

/// Turn a candidate into an item, or reject it.
pub fn build_item(candidate: Candidate, config: &ExtractionConfig) -> Option<ExtractedItem> {
    let description: String = candidate
        .description
        .chars()
        .take(config.max_description_length)
        .collect();
    let description = description.trim();

    if description.chars().count() < config.min_description_length {
        return None;
    }

    let unit_price = candidate.unit_price.round_dp(2);
    if unit_price <= Decimal::ZERO {
        return None;
    }

    let quantity = candidate.quantity.max(1);
    checked_subtotal(unit_price, quantity)?;

    Some(ExtractedItem {
        description: description.to_string(),
        quantity,
        unit_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn candidate(description: &str, quantity: u32, price: &str) -> Candidate {
        Candidate {
            description: description.to_string(),
            quantity,
            unit_price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn test_builds_valid_item() {
        let item = build_item(candidate("CAFE PILAO 500G", 2, "15.90"), &ExtractionConfig::default()).unwrap();
        assert_eq!(item.description, "CAFE PILAO 500G");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price, Decimal::from_str("15.90").unwrap());
    }

    #[test]
    fn test_rejects_short_description() {
        let config = ExtractionConfig::default();
        assert!(build_item(candidate("OV", 1, "9.90"), &config).is_none());
        assert!(build_item(candidate("OVO", 1, "9.90"), &config).is_some());
    }

    #[test]
    fn test_truncates_long_description() {
        let long = "A".repeat(150);
        let item = build_item(candidate(&long, 1, "1.00"), &ExtractionConfig::default()).unwrap();
        assert_eq!(item.description.chars().count(), 120);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let config = ExtractionConfig {
            max_description_length: 4,
            ..ExtractionConfig::default()
        };
        let item = build_item(candidate("AÇÚCAR", 1, "4.29"), &config).unwrap();
        assert_eq!(item.description, "AÇÚC");
    }

    #[test]
    fn test_rejects_zero_price_and_clamps_quantity() {
        let config = ExtractionConfig::default();
        assert!(build_item(candidate("ARROZ", 1, "0.00"), &config).is_none());
        assert_eq!(build_item(candidate("ARROZ", 0, "1.00"), &config).unwrap().quantity, 1);
    }

    #[test]
    fn test_rejects_overflowing_subtotal() {
        let config = ExtractionConfig::default();
        let huge = "79228162514264337593543950.00";

        assert!(build_item(candidate("ITEM CARO", 4_000_000_000, huge), &config).is_none());
        assert!(build_item(candidate("ITEM CARO", 1, huge), &config).is_some());
    }
}
