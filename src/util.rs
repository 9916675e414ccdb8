// Utility helpers for parsing, name normalization and number formatting.
//
// Everything here is pure so the loader and the aggregators can share the
// same rules for "dirty" CSV cells.
use num_format::{Locale, ToFormattedString};

/// Trim a region/sub-region name and title-case every word.
///
/// A letter is upper-cased when it follows a non-letter (start of string,
/// space, `&`, `-`, `'`...) and lower-cased otherwise, so `"a&n islands"`
/// becomes `"A&N Islands"`. Applying it twice gives the same string.
pub fn normalize_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.trim().chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                // Letters like `ß` upper-case to two letters; only the first
                // stays capital so a second pass leaves the word alone.
                let mut upper = c.to_uppercase();
                out.extend(upper.next());
                out.extend(upper.flat_map(char::to_lowercase));
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Case-insensitive comparison of a stored (already normalized) name with a
/// user-supplied selector value.
pub fn name_matches(stored: &str, query: &str) -> bool {
    stored.to_lowercase() == normalize_name(query).to_lowercase()
}

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (`"NA"`, `"n/a"`).
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed, including
///   `NaN` and infinities.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Like [`parse_f64_safe`], but incident counts cannot be negative.
pub fn parse_count_safe(s: Option<&str>) -> Option<f64> {
    parse_f64_safe(s).filter(|v| *v >= 0.0)
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    // Some exports write years as `2019.0`.
    s.parse::<i32>()
        .ok()
        .or_else(|| s.strip_suffix(".0").and_then(|v| v.parse::<i32>().ok()))
}

/// Relative change from `previous` to `current`, in percent.
///
/// `None` when the previous value is zero or the result is not finite.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    let change = (current - previous) / previous * 100.0;
    change.is_finite().then_some(change)
}

/// Add two optional counts where a missing value only counts as missing
/// when both sides are missing.
pub fn add_optional(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale-aware thousands separators (`1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Beyond `i64` the digits are kept as-is, without separators.
    let mut res = match int_part.parse::<i64>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Format a count that is whole in practice (`1,234`).
pub fn format_count(n: f64) -> String {
    format_number(n, 0)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_names_to_title_case() {
        assert_eq!(normalize_name("  delhi "), "Delhi");
        assert_eq!(normalize_name("NEW DELHI"), "New Delhi");
        assert_eq!(normalize_name("a&n islands"), "A&N Islands");
        assert_eq!(normalize_name("24 parganas north"), "24 Parganas North");
        assert_eq!(normalize_name("ßandpur"), "Ssandpur");
        assert_eq!(normalize_name("ﬁrozabad"), "Firozabad");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "  delhi ",
            "D&N HAVELI",
            "north-east",
            "o'neil town",
            "",
            "ßandpur",
            "ﬁrozabad",
        ] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn matches_names_case_insensitively() {
        assert!(name_matches("New Delhi", "new delhi"));
        assert!(name_matches("New Delhi", " NEW DELHI "));
        assert!(!name_matches("New Delhi", "Delhi"));
    }

    #[test]
    fn parses_numbers_forgivingly() {
        assert_eq!(parse_f64_safe(Some(" 1,234 ")), Some(1234.0));
        assert_eq!(parse_f64_safe(Some("12.5")), Some(12.5));
        assert_eq!(parse_f64_safe(Some("NA")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn counts_reject_negative_values() {
        assert_eq!(parse_count_safe(Some("-5")), None);
        assert_eq!(parse_count_safe(Some("0")), Some(0.0));
        assert_eq!(parse_count_safe(Some("1,200")), Some(1200.0));
    }

    #[test]
    fn parses_years() {
        assert_eq!(parse_i32_safe(Some("2019")), Some(2019));
        assert_eq!(parse_i32_safe(Some("2019.0")), Some(2019));
        assert_eq!(parse_i32_safe(Some("year")), None);
    }

    #[test]
    fn percent_change_guards_zero_previous() {
        assert_eq!(percent_change(0.0, 10.0), None);
        let change = percent_change(100.0, 120.0).unwrap();
        assert!((change - 20.0).abs() < 1e-9);
        let change = percent_change(200.0, 150.0).unwrap();
        assert!((change + 25.0).abs() < 1e-9);
    }

    #[test]
    fn adds_optional_counts() {
        assert_eq!(add_optional(None, None), None);
        assert_eq!(add_optional(Some(2.0), None), Some(2.0));
        assert_eq!(add_optional(Some(2.0), Some(3.0)), Some(5.0));
    }

    #[test]
    fn formats_numbers_with_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1500.0, 1), "-1,500.0");
        assert_eq!(format_count(120.0), "120");
        assert_eq!(format_count(1e20), "100000000000000000000");
        assert_eq!(format_int(9855_i64), "9,855");
    }
}
