// Utility helpers for parsing, rounding and formatting.
//
// Spreadsheet exports are loose about numbers and dates; everything that
// coerces a cell lives here so the engine can work with typed values.
use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Parse a cell into `f64` while being forgiving about formatting issues
/// that are common in spreadsheet exports.
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
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Plain decimal number with `.` as the only separator. `3,5` and `1,000`
/// are rejected instead of being read as `35` and `1000`.
pub fn parse_f64_strict(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lowest and highest answer on the survey scale.
pub const SCORE_MIN: f64 = 1.0;
pub const SCORE_MAX: f64 = 4.0;

/// Coerce an item-score cell. Missing, non-numeric and off-scale cells
/// count as 0; the flag is `false` for those.
pub fn coerce_score(s: Option<&str>) -> (f64, bool) {
    match parse_f64_strict(s) {
        Some(v) if (SCORE_MIN..=SCORE_MAX).contains(&v) => (v, true),
        _ => (0.0, false),
    }
}

/// Parse a non-negative whole count (e.g. a population figure). Fractional
/// spreadsheet values such as `2400.0` are truncated.
pub fn parse_count(s: Option<&str>) -> Option<u64> {
    let v = parse_f64_safe(s)?;
    if v < 0.0 {
        return None;
    }
    Some(v.trunc() as u64)
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // Dates are expected in `YYYY-MM-DD` format.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Round to `decimals` places, halves away from zero.
///
/// Percentages and indices are non-negative, so this is round-half-up for
/// every value the report produces. The input is the binary `f64`, so a
/// value like `1.005` that is stored as `1.00499..` rounds down.
pub fn round_half_up(v: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (v * factor).round() / factor
}

/// Fixed-decimal rendering that applies [`round_half_up`] first, so the
/// printed digits never depend on the formatter's tie handling.
pub fn fixed(v: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, round_half_up(v, decimals as u32))
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators (`1,234.50`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
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

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Long Indonesian date, e.g. `4 Juli 2025`.
pub fn format_date_id(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_ID[date.month0() as usize],
        date.year()
    )
}

/// `SWASTA` -> `Swasta`, `S-1` -> `S-1`. Only the first character keeps
/// its upper case.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Short item code: the text before the first `(`, trimmed.
pub fn short_code(key: &str) -> &str {
    key.split('(').next().unwrap_or(key).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_safe_handles_spreadsheet_noise() {
        assert_eq!(parse_f64_safe(Some(" 3 ")), Some(3.0));
        assert_eq!(parse_f64_safe(Some("2,400")), Some(2400.0));
        assert_eq!(parse_f64_safe(Some("tiga")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn strict_parse_keeps_separators_out() {
        assert_eq!(parse_f64_strict(Some(" 3.5 ")), Some(3.5));
        assert_eq!(parse_f64_strict(Some("1.000")), Some(1.0));
        assert_eq!(parse_f64_strict(Some("3,5")), None);
        assert_eq!(parse_f64_strict(Some("2,400")), None);
        assert_eq!(parse_f64_strict(Some("NaN")), None);
    }

    #[test]
    fn score_cells_outside_the_scale_count_as_zero() {
        assert_eq!(coerce_score(Some("4")), (4.0, true));
        assert_eq!(coerce_score(Some("1.000")), (1.0, true));
        assert_eq!(coerce_score(Some("3,5")), (0.0, false));
        assert_eq!(coerce_score(Some("5")), (0.0, false));
        assert_eq!(coerce_score(Some("-1")), (0.0, false));
        assert_eq!(coerce_score(Some("0")), (0.0, false));
        assert_eq!(coerce_score(None), (0.0, false));
    }

    #[test]
    fn parse_count_rejects_negative_values() {
        assert_eq!(parse_count(Some("2400.0")), Some(2400));
        assert_eq!(parse_count(Some("-5")), None);
        assert_eq!(parse_count(Some("banyak")), None);
    }

    #[test]
    fn round_half_up_on_exact_halves() {
        assert_eq!(round_half_up(0.75, 1), 0.8);
        assert_eq!(round_half_up(66.666_666, 1), 66.7);
        assert_eq!(round_half_up(0.25, 1), 0.3);
        assert_eq!(round_half_up(50.0, 1), 50.0);
    }

    #[test]
    fn fixed_always_pads_decimals() {
        assert_eq!(fixed(80.0, 2), "80.00");
        assert_eq!(fixed(0.25, 1), "0.3");
        assert_eq!(fixed(77.777_777, 2), "77.78");
    }

    #[test]
    fn format_number_inserts_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(77.777, 2), "77.78");
        assert_eq!(format_number(-3.5, 1), "-3.5");
    }

    #[test]
    fn indonesian_long_date() {
        let d = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        assert_eq!(format_date_id(d), "4 Juli 2025");
    }

    #[test]
    fn capitalize_and_short_code() {
        assert_eq!(capitalize_first("SWASTA"), "Swasta");
        assert_eq!(capitalize_first("S-1"), "S-1");
        assert_eq!(capitalize_first("TIDAK DIKETAHUI"), "Tidak diketahui");
        assert_eq!(short_code("U8 (Sarana & Prasarana)"), "U8");
    }
}
