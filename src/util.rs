// Utility helpers for parsing interactive input and formatting numbers.
//
// This module centralizes the "dirty" number handling so the rest of the
// code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Parse a string into `f64` while being forgiving about formatting issues
/// common in pasted values (surrounding whitespace, thousands separators).
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

pub fn parse_u32_safe(s: Option<&str>) -> Option<u32> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<u32>().ok()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    // First, format to a plain fixed-decimal string like `1234567.89`.
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Render a money amount like `1,234.56 €` for tables and console output.
pub fn format_euros(n: f64) -> String {
    format!("{} €", format_number(n, 2))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `1,240 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_rejects_text_and_accepts_separators() {
        assert_eq!(parse_f64_safe(Some(" 1,234.5 ")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("abc")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parse_u32_basic() {
        assert_eq!(parse_u32_safe(Some("3")), Some(3));
        assert_eq!(parse_u32_safe(Some("-1")), None);
        assert_eq!(parse_u32_safe(Some("")), None);
    }

    #[test]
    fn format_number_inserts_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.0, 2), "-42.00");
        assert_eq!(format_number(0.0, 0), "0");
    }

    #[test]
    fn format_euros_suffix() {
        assert_eq!(format_euros(31.76), "31.76 €");
    }
}
