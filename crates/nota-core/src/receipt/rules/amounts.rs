//! Amount parsing for Brazilian-formatted numbers (1.234,56).

use rust_decimal::Decimal;
use std::str::FromStr;

/// Strip the currency marker, drop thousands dots, then swap the decimal comma.
///
/// The order matters: replacing the comma first would turn "1.234,56" into
/// "1.234.56".
fn normalize_br_number(raw: &str) -> String {
    raw.trim()
        .replace("R$", "")
        .replace(' ', "")
        .replace('.', "")
        .replace(',', ".")
}

/// Parse a Brazilian-formatted number (e.g., "1.234,56" or "R$ 12,90").
pub fn parse_br_number(raw: &str) -> Option<f64> {
    let value: f64 = normalize_br_number(raw).parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parse a Brazilian-formatted monetary amount into a decimal.
pub fn parse_br_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(&normalize_br_number(raw)).ok()
}

/// Format amount in Brazilian style (R$ 1234,56).
pub fn format_br_amount(amount: Decimal) -> String {
    format!("R$ {:.2}", amount).replace('.', ",")
}
