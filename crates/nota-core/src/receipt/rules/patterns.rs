//! Regex patterns for Brazilian receipt lines.
//!
//! Prices always carry exactly two decimals so trailing product codes are not
//! taken for amounts.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // "ARROZ 5KG 2 x 24,90 49,80"
    pub static ref QTY_UNIT_TOTAL: Regex = Regex::new(
        r"^(?P<description>.+?)\s+(?P<quantity>\d+[.,]?\d*)\s*[xX]\s*(?P<unit>\d+[.,]\d{2})\s+(?P<total>\d+[.,]\d{2})$"
    ).unwrap();

    // "ARROZ 5KG 2 x 24,90"
    pub static ref QTY_UNIT: Regex = Regex::new(
        r"^(?P<description>.+?)\s+(?P<quantity>\d+[.,]?\d*)\s*[xX]\s*(?P<unit>\d+[.,]\d{2})$"
    ).unwrap();

    // "FEIJAO PRETO 1KG 8,50"
    pub static ref DESC_TOTAL: Regex = Regex::new(
        r"^(?P<description>[A-Za-z0-9\s\-.,/%()]+?)\s+(?P<total>\d+[.,]\d{2})$"
    ).unwrap();
}
