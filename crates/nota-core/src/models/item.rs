//! Shopping list item extracted from a receipt.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// A validated purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedItem {
    /// Product description as printed on the receipt.
    pub description: String,

    /// Number of units bought (at least 1).
    pub quantity: u32,

    /// Price of a single unit, two decimal places. A JSON number on the wire.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

/// Identity used to drop repeated items.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl ExtractedItem {
    /// Create an item from user-supplied values.
    ///
    /// Applies the same rules as manual item editing: a non-blank
    /// description, a quantity of at least one and a non-negative price.
    pub fn new(
        description: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<Self, ExtractionError> {
        let description = description.into().trim().to_string();

        if description.is_empty() {
            return Err(ExtractionError::Validation {
                field: "description".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if quantity < 1 {
            return Err(ExtractionError::Validation {
                field: "quantity".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(ExtractionError::Validation {
                field: "unit_price".to_string(),
                reason: "must not be negative".to_string(),
            });
        }

        let unit_price = unit_price.round_dp(2);
        if checked_subtotal(unit_price, quantity).is_none() {
            return Err(ExtractionError::Validation {
                field: "unit_price".to_string(),
                reason: "subtotal is out of range".to_string(),
            });
        }

        Ok(Self {
            description,
            quantity,
            unit_price,
        })
    }

    /// Unit price times quantity, saturating at [`Decimal::MAX`].
    pub fn subtotal(&self) -> Decimal {
        checked_subtotal(self.unit_price, self.quantity).unwrap_or(Decimal::MAX)
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            description: self.description.to_lowercase(),
            quantity: self.quantity,
            unit_price: self.unit_price.round_dp(2).normalize(),
        }
    }
}

/// `unit_price * quantity`, or `None` when it does not fit a [`Decimal`].
pub fn checked_subtotal(unit_price: Decimal, quantity: u32) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity))
}
