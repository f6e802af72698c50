//! Rule-based line handling for Brazilian retail receipts.

pub mod amounts;
pub mod cascade;
pub mod noise;
pub mod normalize;
pub mod patterns;

pub use amounts::{format_br_amount, parse_br_amount, parse_br_number};
pub use cascade::{match_line, Candidate, LineMatch, LineShape};
pub use noise::{NoiseFilter, NoiseVerdict};
pub use normalize::{normalize_line, split_lines};
