//! Local structural VIN decoding
//!
//! Pure and total: every step either produces a value or an explicit
//! unknown. No I/O, no failure paths. Given the same VIN the result is
//! always identical.

use super::tables::{self, ManufacturerEntry, CHECKSUM_WEIGHTS, MANUFACTURERS, VW_MODEL_HINTS};
use super::validator::Vin;

/// What the VIN itself can tell us, before any remote lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCandidate {
    /// Manufacturer make from the WMI table, if matched
    pub make: Option<&'static str>,
    /// Country from the WMI table entry, if matched
    pub country: Option<&'static str>,
    /// Coarse first-character region fallback; conflated region strings are
    /// surfaced verbatim ("France/Spain")
    pub region: Option<&'static str>,
    /// Model year from the position-10 code, modern-era candidate only
    pub model_year: Option<i32>,
    /// Manufacturer-specific model hint from positions 4-8
    pub model_hint: Option<&'static str>,
    /// Whether the position-9 check digit matches the weighted sum
    pub checksum_valid: bool,
}

/// Decode the structural fields of a VIN
pub fn decode_local(vin: &Vin) -> LocalCandidate {
    let manufacturer = lookup_manufacturer(vin);

    LocalCandidate {
        make: manufacturer.map(|m| m.make),
        country: manufacturer.map(|m| m.country),
        region: tables::region(vin.first_char()),
        model_year: tables::model_year(vin.year_code()),
        model_hint: model_hint(vin),
        checksum_valid: validate_checksum(vin),
    }
}

/// Check-digit validation: weighted sum of transliterated characters mod 11
///
/// Expected check character is 'X' when the remainder is 10, otherwise the
/// remainder digit. A transliteration miss fails validation rather than
/// erroring.
pub fn validate_checksum(vin: &Vin) -> bool {
    let mut sum = 0u32;

    for (ch, weight) in vin.as_str().chars().zip(CHECKSUM_WEIGHTS) {
        match tables::transliterate(ch) {
            Some(value) => sum += value * weight,
            None => return false,
        }
    }

    let remainder = sum % 11;
    let expected = if remainder == 10 {
        'X'
    } else {
        char::from_digit(remainder, 10).unwrap_or('X')
    };

    vin.check_digit() == expected
}

/// Manufacturer lookup: exact 3-character WMI match first, then the first
/// declared table entry sharing the 2-character prefix
fn lookup_manufacturer(vin: &Vin) -> Option<&'static ManufacturerEntry> {
    let wmi = vin.wmi();

    if let Some(entry) = MANUFACTURERS.iter().find(|entry| entry.wmi == wmi) {
        return Some(entry);
    }

    let prefix = vin.wmi_prefix();
    MANUFACTURERS
        .iter()
        .find(|entry| entry.wmi.starts_with(prefix))
}

/// Model hint for makes that encode the model in positions 4-8
///
/// Three fixed two-character windows are tried in priority order; the first
/// table hit wins. Currently only the Volkswagen family has such a table;
/// the reconciler only applies the hint when the resolved make matches.
fn model_hint(vin: &Vin) -> Option<&'static str> {
    for window in vin.model_code_windows() {
        if let Some((_, model)) = VW_MODEL_HINTS.iter().find(|(code, _)| *code == window) {
            return Some(model);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vin(s: &str) -> Vin {
        Vin::parse(s).unwrap()
    }

    #[test]
    fn test_checksum_documented_example_validates() {
        // Documented standard example VIN with a correct check digit
        assert!(validate_checksum(&vin("1M8GDM9AXKP042788")));
    }

    #[test]
    fn test_checksum_rejects_mutated_check_digit() {
        // Same VIN with the position-9 character altered
        assert!(!validate_checksum(&vin("1M8GDM9A1KP042788")));
        assert!(!validate_checksum(&vin("1M8GDM9A0KP042788")));
    }

    #[test]
    fn test_decode_is_total_and_idempotent() {
        let v = vin("WBAZZZ3CZGE123456");
        let first = decode_local(&v);
        let second = decode_local(&v);
        assert_eq!(first, second);
    }

    #[test]
    fn test_wmi_exact_match_bmw() {
        let candidate = decode_local(&vin("WBAFR9C50BC123456"));
        assert_eq!(candidate.make, Some("BMW"));
        assert_eq!(candidate.country, Some("Germany"));
    }

    #[test]
    fn test_wmi_prefix_fallback_first_declared_wins() {
        // "WB" + unknown third character: no exact entry, prefix search hits
        // the first declared WB entry (WBA/BMW)
        let candidate = decode_local(&vin("WBZFR9C50BC123456"));
        assert_eq!(candidate.make, Some("BMW"));
        assert_eq!(candidate.country, Some("Germany"));
    }

    #[test]
    fn test_unmatched_wmi_falls_back_to_region() {
        // "V9" prefix matches no table entry; region table conflates V
        let candidate = decode_local(&vin("V9XZZZ5FZGE123456"));
        assert_eq!(candidate.make, None);
        assert_eq!(candidate.country, None);
        assert_eq!(candidate.region, Some("France/Spain"));
    }

    #[test]
    fn test_year_decode() {
        let candidate = decode_local(&vin("WVWZZZ3CZGE123456"));
        assert_eq!(candidate.model_year, Some(2016));

        // Position 10 = '0' carries no year
        let candidate = decode_local(&vin("WVWZZZ3CZ0E123456"));
        assert_eq!(candidate.model_year, None);
    }

    #[test]
    fn test_vw_model_hint_first_window() {
        // Positions 4-5 = "3C" (Passat)
        let candidate = decode_local(&vin("WVW3CZZZZGE123456"));
        assert_eq!(candidate.model_hint, Some("Passat"));
    }

    #[test]
    fn test_vw_model_hint_window_priority() {
        // Positions 4-5 = "ZZ" (miss), 6-7 = "7P" (Touareg)
        let candidate = decode_local(&vin("WVWZZ7PZZGE123456"));
        assert_eq!(candidate.model_hint, Some("Touareg"));
    }

    #[test]
    fn test_vw_model_hint_third_window() {
        // Positions 4-5 = "ZZ", 6-7 = "Z5", 7-8 = "5N" (Tiguan)
        let candidate = decode_local(&vin("WVWZZZ5NZGE123456"));
        assert_eq!(candidate.model_hint, Some("Tiguan"));
    }

    #[test]
    fn test_no_hint_when_windows_miss() {
        let candidate = decode_local(&vin("WVWZZZZZZGE123456"));
        assert_eq!(candidate.model_hint, None);
    }
}
