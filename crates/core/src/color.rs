//! Hex colour strings used for statuses and tags.
//!
//! Colours are stored as six uppercase hex digits without a leading `#`
//! (e.g. `"6B94B7"`), the format the board has always persisted.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    /// Parse `RRGGBB` (optionally prefixed with `#`).
    pub fn parse(hex: &str) -> Result<Self, CoreError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(CoreError::Validation(format!(
                "colour must be 6 hex digits, got '{hex}'"
            )));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::Validation(format!(
                "colour '{hex}' is not hexadecimal"
            )));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| CoreError::Validation(format!("colour '{hex}' is not hexadecimal")))?;
        Ok(Self {
            red: ((value & 0xFF0000) >> 16) as u8,
            green: ((value & 0x00FF00) >> 8) as u8,
            blue: (value & 0x0000FF) as u8,
        })
    }

    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    pub fn random() -> Self {
        let mut rng = rand::rng();
        Self {
            red: rng.random(),
            green: rng.random(),
            blue: rng.random(),
        }
    }
}

/// Normalise a user-supplied colour to the stored form.
pub fn normalize_hex(hex: &str) -> Result<String, CoreError> {
    Rgb::parse(hex).map(Rgb::to_hex)
}

/// A random colour in stored form, used when a tag is created without one.
pub fn random_hex() -> String {
    Rgb::random().to_hex()
}
