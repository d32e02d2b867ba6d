//! Scanned barcode filtering and ISBN parsing.
//!
//! The camera reader emits the raw payload of every barcode it sees. Books
//! often carry a second barcode next to the ISBN (Japanese price codes
//! starting with `192`), which must never be looked up.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Prefix of price/classification barcodes printed beside the ISBN.
pub const PRICE_BARCODE_PREFIX: &str = "192";

/// A validated ISBN-10 or ISBN-13, stored without separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Parse an ISBN, ignoring hyphens and spaces.
    ///
    /// Accepts 13 digits with a valid EAN-13 check digit, or 10 characters
    /// (the last may be `X`) with a valid mod-11 check digit.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalized: String = raw
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let valid = match normalized.len() {
            13 => is_valid_isbn13(&normalized),
            10 => is_valid_isbn10(&normalized),
            _ => false,
        };

        if !valid {
            return Err(CoreError::Validation(format!("'{raw}' is not a valid ISBN")));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Isbn {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Isbn::parse(&value)
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

/// Turn a scanned payload into an ISBN, or `None` if it should be ignored.
///
/// Empty payloads, price barcodes and anything that does not parse as an
/// ISBN are dropped silently; the scanner simply keeps looking.
pub fn accept_payload(payload: &str) -> Option<Isbn> {
    let payload = payload.trim();
    if payload.is_empty() || payload.starts_with(PRICE_BARCODE_PREFIX) {
        return None;
    }
    if !payload.chars().all(|c| c.is_ascii_digit() || c == 'X' || c == 'x') {
        return None;
    }
    Isbn::parse(payload).ok()
}

fn is_valid_isbn13(digits: &str) -> bool {
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(index, digit)| if index % 2 == 0 { digit } else { digit * 3 })
        .sum();
    sum % 10 == 0
}

fn is_valid_isbn10(chars: &str) -> bool {
    let mut sum = 0u32;
    for (index, c) in chars.chars().enumerate() {
        let value = match c {
            'X' if index == 9 => 10,
            _ => match c.to_digit(10) {
                Some(digit) => digit,
                None => return false,
            },
        };
        sum += value * (10 - index as u32);
    }
    sum % 11 == 0
}
