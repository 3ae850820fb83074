// Utility helpers for parsing raw CSV cells.
//
// This module centralizes the "dirty" string handling so the loader can
// assume clean, typed values everywhere else.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that show up in CSV exports.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (e.g. "N/A").
/// - Strips thousands separators before parsing.
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

/// A required text field: trimmed, and `None` when missing or blank.
/// Blank cells count as missing for the row-cleaning pass.
pub fn non_blank(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Share of `part` in `total` as a percentage; 0 for an empty total to
/// avoid NaNs.
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64) * 100.0
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `1,234 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_parsing_is_forgiving_but_rejects_text() {
        assert_eq!(parse_f64_safe(Some(" 36.778 ")), Some(36.778));
        assert_eq!(parse_f64_safe(Some("-119.417")), Some(-119.417));
        assert_eq!(parse_f64_safe(Some("1,234.5")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("N/A")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn u32_parsing_rejects_negatives_and_text() {
        assert_eq!(parse_u32_safe(Some("7")), Some(7));
        assert_eq!(parse_u32_safe(Some(" 12 ")), Some(12));
        assert_eq!(parse_u32_safe(Some("-3")), None);
        assert_eq!(parse_u32_safe(Some("five")), None);
        assert_eq!(parse_u32_safe(Some("")), None);
        assert_eq!(parse_u32_safe(None), None);
    }

    #[test]
    fn blank_cells_count_as_missing() {
        assert_eq!(non_blank(Some("Oak Flat")), Some("Oak Flat".to_string()));
        assert_eq!(non_blank(Some("  Oak Flat ")), Some("Oak Flat".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn percent_handles_empty_totals() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(4, 4), 100.0);
    }

    #[test]
    fn format_int_inserts_thousands_separators() {
        assert_eq!(format_int(87), "87");
        assert_eq!(format_int(9855), "9,855");
    }
}
