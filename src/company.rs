// Company name normalization.
//
// The export writes the legal entity name, sometimes wrapped in quotes, but
// billing groups several entities under one canonical company. The alias
// table is static; names without an entry pass through unchanged.
use once_cell::sync::Lazy;
use std::collections::HashMap;

static COMPANY_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Clearlake", "Continente"),
        ("Tecnovia SGPS", "Continente"),
        ("Uganda", "Continente"),
        ("Tecnovia Angola", "Continente"),
        ("Tecnovia Bolivia", "Tecnovia Madeira"),
        ("Farrobo", "Tecnovia Madeira"),
        ("Hotel da Graciosa", "Tecnovia Acores"),
    ])
});

/// Canonical company name for a raw cell value.
///
/// Strips surrounding double quotes and whitespace before the lookup, so
/// `"\"Farrobo\" "` and `Farrobo` normalize identically.
pub fn normalize(raw: &str) -> String {
    let cleaned = raw.trim().trim_matches('"').trim();
    match COMPANY_ALIASES.get(cleaned) {
        Some(canonical) => (*canonical).to_string(),
        None => cleaned.to_string(),
    }
}
