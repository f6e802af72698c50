//! Duplicate removal and result size cap.

use std::collections::HashSet;

use crate::models::item::ExtractedItem;

/// Items left after dedup, with what was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduplicated {
    pub items: Vec<ExtractedItem>,
    pub duplicates_removed: usize,
    pub truncated: usize,
}

/// Keep the first item per dedup key, in order, then cap at `max_items`.
pub fn dedup_and_limit(items: Vec<ExtractedItem>, max_items: usize) -> Deduplicated {
    let before = items.len();
    let mut seen = HashSet::new();

    let mut unique: Vec<ExtractedItem> = items
        .into_iter()
        .filter(|item| seen.insert(item.dedup_key()))
        .collect();

    let duplicates_removed = before - unique.len();
    let truncated = unique.len().saturating_sub(max_items);
    unique.truncate(max_items);

    Deduplicated {
        items: unique,
        duplicates_removed,
        truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn item(description: &str, quantity: u32, price: &str) -> ExtractedItem {
        ExtractedItem::new(description, quantity, Decimal::from_str(price).unwrap()).unwrap()
    }

    #[test]
    fn test_first_occurrence_wins() {
        let items = vec![
            item("Leite UHT", 1, "4.99"),
            item("PAO", 2, "0.50"),
            item("LEITE UHT", 1, "4.99"),
        ];

        let result = dedup_and_limit(items, 60);
        assert_eq!(result.items, vec![item("Leite UHT", 1, "4.99"), item("PAO", 2, "0.50")]);
        assert_eq!(result.duplicates_removed, 1);
        assert_eq!(result.truncated, 0);
    }

    #[test]
    fn test_different_quantity_or_price_is_kept() {
        let items = vec![
            item("PAO", 1, "0.50"),
            item("PAO", 2, "0.50"),
            item("PAO", 1, "0.55"),
        ];

        assert_eq!(dedup_and_limit(items, 60).items.len(), 3);
    }

    #[test]
    fn test_limit_keeps_prefix() {
        let items: Vec<ExtractedItem> = (1..=75)
            .map(|i| item(&format!("ITEM {}", i), 1, "1.00"))
            .collect();

        let result = dedup_and_limit(items, 60);
        assert_eq!(result.items.len(), 60);
        assert_eq!(result.items[0].description, "ITEM 1");
        assert_eq!(result.items[59].description, "ITEM 60");
        assert_eq!(result.truncated, 15);
    }
}
