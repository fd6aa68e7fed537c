//! Static VIN decode tables
//!
//! All tables are read-only and built at compile time. `MANUFACTURERS` is an
//! ordered slice, not a map: when no exact 3-character WMI entry matches,
//! the first declared entry whose key starts with the VIN's 2-character
//! prefix wins. That precedence is a frozen policy choice; reordering the
//! table changes decode results for shared prefixes.

/// Position weights for check-digit computation
pub const CHECKSUM_WEIGHTS: [u32; 17] = [8, 7, 6, 5, 4, 3, 2, 10, 0, 9, 8, 7, 6, 5, 4, 3, 2];

/// Transliterate one VIN character to its checksum value
///
/// Distinct letters intentionally collide onto 1-9 per the standard
/// transliteration (both 'A' and 'J' map to 1). Returns None for characters
/// outside the table; the caller treats that as a checksum failure, not an
/// error.
pub fn transliterate(ch: char) -> Option<u32> {
    let value = match ch {
        '0'..='9' => ch as u32 - '0' as u32,
        'A' => 1,
        'B' => 2,
        'C' => 3,
        'D' => 4,
        'E' => 5,
        'F' => 6,
        'G' => 7,
        'H' => 8,
        'J' => 1,
        'K' => 2,
        'L' => 3,
        'M' => 4,
        'N' => 5,
        'P' => 7,
        'R' => 9,
        'S' => 2,
        'T' => 3,
        'U' => 4,
        'V' => 5,
        'W' => 6,
        'X' => 7,
        'Y' => 8,
        'Z' => 9,
        _ => return None,
    };
    Some(value)
}

/// Model year for a position-10 year code
///
/// Year codes repeat on a 30-year cycle; this table always resolves to the
/// modern-era candidate (code 'G' means 2016, never 1986).
pub fn model_year(ch: char) -> Option<i32> {
    let year = match ch {
        'A' => 2010,
        'B' => 2011,
        'C' => 2012,
        'D' => 2013,
        'E' => 2014,
        'F' => 2015,
        'G' => 2016,
        'H' => 2017,
        'J' => 2018,
        'K' => 2019,
        'L' => 2020,
        'M' => 2021,
        'N' => 2022,
        'P' => 2023,
        'R' => 2024,
        'S' => 2025,
        'T' => 2026,
        'V' => 2027,
        'W' => 2028,
        'X' => 2029,
        'Y' => 2030,
        '1'..='9' => 2000 + (ch as i32 - '0' as i32),
        _ => return None,
    };
    Some(year)
}

/// One World Manufacturer Identifier table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManufacturerEntry {
    pub wmi: &'static str,
    pub make: &'static str,
    pub country: &'static str,
}

const fn entry(wmi: &'static str, make: &'static str, country: &'static str) -> ManufacturerEntry {
    ManufacturerEntry { wmi, make, country }
}

/// WMI table, declaration order significant (see module docs)
pub static MANUFACTURERS: &[ManufacturerEntry] = &[
    // German manufacturers
    entry("WVW", "Volkswagen", "Germany"),
    entry("WV1", "Volkswagen Commercial", "Germany"),
    entry("WV2", "Volkswagen", "Germany"),
    entry("WV3", "Volkswagen", "Germany"),
    entry("WUA", "Audi", "Germany"),
    entry("WAU", "Audi", "Germany"),
    entry("WA1", "Audi", "Germany"),
    entry("WBA", "BMW", "Germany"),
    entry("WBS", "BMW M", "Germany"),
    entry("WBY", "BMW i", "Germany"),
    entry("WDB", "Mercedes-Benz", "Germany"),
    entry("WDC", "Mercedes-Benz", "Germany"),
    entry("WDD", "Mercedes-Benz", "Germany"),
    entry("WDF", "Mercedes-Benz", "Germany"),
    entry("WMW", "Mini", "Germany"),
    entry("WP0", "Porsche", "Germany"),
    entry("WP1", "Porsche", "Germany"),
    entry("WF0", "Ford", "Germany"),
    entry("WOL", "Opel", "Germany"),
    // Czech / Hungarian plants
    entry("TRU", "Audi", "Hungary"),
    entry("TM9", "Skoda", "Czech Republic"),
    entry("TMB", "Skoda", "Czech Republic"),
    entry("TMP", "Skoda", "Czech Republic"),
    // French
    entry("VF1", "Renault", "France"),
    entry("VF3", "Peugeot", "France"),
    entry("VF7", "Citroen", "France"),
    // Italian
    entry("ZAR", "Alfa Romeo", "Italy"),
    entry("ZFA", "Fiat", "Italy"),
    entry("ZFF", "Ferrari", "Italy"),
    entry("ZHW", "Lamborghini", "Italy"),
    entry("ZAM", "Maserati", "Italy"),
    // Japanese
    entry("JTD", "Toyota", "Japan"),
    entry("JTE", "Toyota", "Japan"),
    entry("JTM", "Toyota", "Japan"),
    entry("JHM", "Honda", "Japan"),
    entry("JN1", "Nissan", "Japan"),
    entry("JMZ", "Mazda", "Japan"),
    entry("JS3", "Suzuki", "Japan"),
    entry("JF1", "Subaru", "Japan"),
    entry("JF2", "Subaru", "Japan"),
    // Korean
    entry("KMH", "Hyundai", "South Korea"),
    entry("KNA", "Kia", "South Korea"),
    entry("KNC", "Kia", "South Korea"),
    entry("KND", "Kia", "South Korea"),
    // British
    entry("SAL", "Land Rover", "United Kingdom"),
    entry("SAJ", "Jaguar", "United Kingdom"),
    // Swedish
    entry("YV1", "Volvo", "Sweden"),
    entry("YV4", "Volvo", "Sweden"),
    // North American
    entry("1G1", "Chevrolet", "United States"),
    entry("1G2", "Pontiac", "United States"),
    entry("1GC", "Chevrolet Truck", "United States"),
    entry("1FA", "Ford", "United States"),
    entry("1FT", "Ford Truck", "United States"),
    entry("2FA", "Ford", "Canada"),
    entry("3FA", "Ford", "Mexico"),
    entry("5YJ", "Tesla", "United States"),
    // Polish plants
    entry("SUP", "Volkswagen", "Poland"),
];

/// The one make whose VINs carry a model code in positions 4-8
pub const MODEL_HINTED_MAKE: &str = "Volkswagen";

/// Volkswagen model codes found in positions 4-8, first window hit wins
pub static VW_MODEL_HINTS: &[(&str, &str)] = &[
    ("3C", "Passat"),
    ("1K", "Golf/Jetta"),
    ("5K", "Golf"),
    ("5C", "Beetle"),
    ("AU", "Golf"),
    ("1J", "Golf/Bora"),
    ("7N", "Sharan"),
    ("7P", "Touareg"),
    ("5N", "Tiguan"),
    ("2G", "Polo"),
    ("1T", "Touran"),
    ("3G", "Passat B8"),
    ("AD", "Polo"),
    ("BZ", "Touran"),
    ("CA", "Atlas"),
    ("NF", "Arteon"),
];

/// Coarse region for a VIN first character
///
/// Some codes stand for several plausible countries; the conflated string is
/// surfaced verbatim rather than picking one.
pub fn region(first_char: char) -> Option<&'static str> {
    let region = match first_char {
        'W' => "Germany",
        'V' => "France/Spain",
        'Z' => "Italy",
        'S' => "United Kingdom/Poland",
        'T' => "Czech Republic/Hungary",
        'J' => "Japan",
        'K' => "South Korea",
        'L' => "China",
        'Y' => "Sweden/Finland",
        '1' => "United States",
        '2' => "Canada",
        '3' => "Mexico",
        '4' => "United States",
        '5' => "United States",
        '6' => "Australia",
        '9' => "Brazil",
        _ => return None,
    };
    Some(region)
}
