//! VIN shape validation
//!
//! The single gate for VIN input: a `Vin` can only be constructed from a
//! string that is exactly 17 characters from the restricted alphabet
//! (letters I, O, Q are excluded by the standard). Downstream code takes
//! `&Vin` and never re-validates shape.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// VINs are exactly 17 characters
pub const VIN_LENGTH: usize = 17;

/// VIN shape validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VinError {
    #[error("VIN must be exactly {VIN_LENGTH} characters, got {0}")]
    WrongLength(usize),

    #[error("VIN contains invalid character '{0}' (letters I, O and Q are not used)")]
    InvalidCharacter(char),
}

/// A validated VIN, canonicalized to uppercase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vin(String);

impl Vin {
    /// Validate a raw string and canonicalize it to uppercase
    pub fn parse(raw: &str) -> Result<Self, VinError> {
        let canonical = raw.to_ascii_uppercase();

        let len = canonical.chars().count();
        if len != VIN_LENGTH {
            return Err(VinError::WrongLength(len));
        }

        for ch in canonical.chars() {
            match ch {
                'A'..='H' | 'J'..='N' | 'P' | 'R'..='Z' | '0'..='9' => {}
                other => return Err(VinError::InvalidCharacter(other)),
            }
        }

        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// World Manufacturer Identifier: the first three characters
    pub fn wmi(&self) -> &str {
        &self.0[0..3]
    }

    /// Two-character WMI prefix used for fallback manufacturer matching
    pub fn wmi_prefix(&self) -> &str {
        &self.0[0..2]
    }

    /// First character, indicating the market/region of manufacture
    pub fn first_char(&self) -> char {
        self.0.as_bytes()[0] as char
    }

    /// Check digit at position 9
    pub fn check_digit(&self) -> char {
        self.0.as_bytes()[8] as char
    }

    /// Model-year code at position 10
    pub fn year_code(&self) -> char {
        self.0.as_bytes()[9] as char
    }

    /// Two-character windows inside positions 4-8 that may carry a
    /// manufacturer-specific model code, in lookup priority order
    pub fn model_code_windows(&self) -> [&str; 3] {
        [&self.0[3..5], &self.0[5..7], &self.0[6..8]]
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
