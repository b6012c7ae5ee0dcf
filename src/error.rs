use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::PlayType;

/// Structurally invalid input handed to the calculators. Messy bill text never
/// produces these; the parser drops what it cannot use.
#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("line {line}: no numbers to play")]
    EmptyNumbers { line: usize },
    #[error("line {line}: '{number}' is not a 2-4 digit number")]
    InvalidNumber { line: usize, number: String },
    #[error("line {line}: '{number}' does not fit {play}, which takes {expected}-digit numbers")]
    NumberWidth {
        line: usize,
        number: String,
        play: PlayType,
        expected: usize,
    },
    #[error("line {line}: {play} cannot be played with {count} number(s)")]
    NumberCount {
        line: usize,
        play: PlayType,
        count: usize,
    },
    #[error("line {line}: points must be positive (got {points})")]
    NonPositivePoints { line: usize, points: Decimal },
    #[error("line {line}: amount overflows the VND range")]
    Overflow { line: usize },
    #[error("invalid price table: {0}")]
    PriceTable(String),
}
