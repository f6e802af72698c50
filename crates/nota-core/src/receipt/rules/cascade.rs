//! Priority-ordered line shape matching.
//!
//! Each receipt line is tried against three shapes, most specific first. The
//! first shape whose captures yield a usable candidate wins; a shape that
//! matches but produces garbage (zero price, blank description) falls through
//! to the next one.

use regex::{Captures, Regex};
use rust_decimal::Decimal;

use super::amounts::{parse_br_amount, parse_br_number};
use super::patterns::{DESC_TOTAL, QTY_UNIT, QTY_UNIT_TOTAL};

/// Line shapes, in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape {
    /// `description quantity x unit_price line_total`
    QtyUnitTotal,
    /// `description quantity x unit_price`
    QtyUnit,
    /// `description price`, a single unit.
    DescTotal,
}

/// Unvalidated item pulled out of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Outcome of running the cascade on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch {
    NoMatch,
    QtyUnitTotal {
        candidate: Candidate,
        /// Printed extended price. Not used as the item price.
        line_total: Option<Decimal>,
    },
    QtyUnit(Candidate),
    DescTotal(Candidate),
}

impl LineMatch {
    pub fn shape(&self) -> Option<LineShape> {
        match self {
            LineMatch::NoMatch => None,
            LineMatch::QtyUnitTotal { .. } => Some(LineShape::QtyUnitTotal),
            LineMatch::QtyUnit(_) => Some(LineShape::QtyUnit),
            LineMatch::DescTotal(_) => Some(LineShape::DescTotal),
        }
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            LineMatch::NoMatch => None,
            LineMatch::QtyUnitTotal { candidate, .. } => Some(candidate),
            LineMatch::QtyUnit(candidate) | LineMatch::DescTotal(candidate) => Some(candidate),
        }
    }

    pub fn into_candidate(self) -> Option<Candidate> {
        match self {
            LineMatch::NoMatch => None,
            LineMatch::QtyUnitTotal { candidate, .. } => Some(candidate),
            LineMatch::QtyUnit(candidate) | LineMatch::DescTotal(candidate) => Some(candidate),
        }
    }
}

type Extractor = fn(&Captures<'_>) -> Option<LineMatch>;

fn cascade() -> [(LineShape, &'static Regex, Extractor); 3] {
    [
        (LineShape::QtyUnitTotal, &*QTY_UNIT_TOTAL, extract_qty_unit_total),
        (LineShape::QtyUnit, &*QTY_UNIT, extract_qty_unit),
        (LineShape::DescTotal, &*DESC_TOTAL, extract_desc_total),
    ]
}

/// Run the shape cascade on a normalized, noise-free line.
pub fn match_line(line: &str) -> LineMatch {
    for (shape, pattern, extract) in cascade() {
        let Some(caps) = pattern.captures(line) else {
            continue;
        };
        match extract(&caps) {
            Some(found) => return found,
            None => {
                tracing::trace!("{:?} matched but was unusable: {}", shape, line);
            }
        }
    }
    LineMatch::NoMatch
}

/// Strip the separators OCR leaves around descriptions.
pub fn clean_description(raw: &str) -> &str {
    raw.trim_matches(|c| c == ' ' || c == '-')
}

/// Quantity as printed, rounded half to even; missing or below one counts as one.
///
/// Returns `None` when the rounded value does not fit a `u32`.
pub fn parse_quantity(raw: &str) -> Option<u32> {
    match parse_br_number(raw) {
        Some(q) if q >= 1.0 => {
            let rounded = q.round_ties_even();
            if rounded > f64::from(u32::MAX) {
                None
            } else {
                Some(rounded as u32)
            }
        }
        _ => Some(1),
    }
}

fn positive_amount(raw: &str) -> Option<Decimal> {
    parse_br_amount(raw).filter(|v| *v > Decimal::ZERO)
}

fn quantity_candidate(caps: &Captures<'_>) -> Option<Candidate> {
    let description = clean_description(&caps["description"]);
    if description.is_empty() {
        return None;
    }
    let unit_price = positive_amount(&caps["unit"])?;
    let quantity = parse_quantity(&caps["quantity"])?;
    if quantity == 0 {
        return None;
    }
    Some(Candidate {
        description: description.to_string(),
        quantity,
        unit_price,
    })
}

fn extract_qty_unit_total(caps: &Captures<'_>) -> Option<LineMatch> {
    let candidate = quantity_candidate(caps)?;
    let line_total = parse_br_amount(&caps["total"]);
    Some(LineMatch::QtyUnitTotal { candidate, line_total })
}

fn extract_qty_unit(caps: &Captures<'_>) -> Option<LineMatch> {
    quantity_candidate(caps).map(LineMatch::QtyUnit)
}

fn extract_desc_total(caps: &Captures<'_>) -> Option<LineMatch> {
    let description = clean_description(&caps["description"]);
    if description.is_empty() {
        return None;
    }
    let unit_price = positive_amount(&caps["total"])?;
    Some(LineMatch::DescTotal(Candidate {
        description: description.to_string(),
        quantity: 1,
        unit_price,
    }))
}
