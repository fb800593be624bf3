// src/normalize/number.rs
// =============================================================================
// Parses the count strings Weibo shows in profiles.
//
// Small counts come back as plain JSON numbers, large ones as display text:
//   "12万"   -> 120000       (万 = ten thousand)
//   "1.2万"  -> 12000
//   "12万+"  -> 120000       ("12 ten-thousands or more")
//   "3亿"    -> 300000000    (亿 = hundred million)
//
// Decimal numerals are scaled with integer arithmetic, so "4.35万" is
// exactly 43500 and never 43499 from float rounding. Digits below the unit
// are truncated.
// =============================================================================

use crate::error::CrawlError;
use serde_json::Value;

const TEN_THOUSAND_PLUS: &str = "万+";
const TEN_THOUSAND: &str = "万";
const HUNDRED_MILLION: &str = "亿";

// Parses one count string
//
// Returns CrawlError::Format when the numeral part is not a non-negative
// number (counts can't be negative, so "-3" is rejected too).
pub fn parse_count(raw: &str) -> Result<u64, CrawlError> {
    let trimmed = raw.trim();
    let format_error = || CrawlError::Format {
        raw: raw.to_string(),
    };

    // "N万+" only ever carries a whole number of ten-thousands
    if let Some(numeral) = trimmed.strip_suffix(TEN_THOUSAND_PLUS) {
        return numeral
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(10_000))
            .ok_or_else(format_error);
    }

    if let Some(numeral) = trimmed.strip_suffix(TEN_THOUSAND) {
        return scale(numeral, 4).ok_or_else(format_error);
    }

    if let Some(numeral) = trimmed.strip_suffix(HUNDRED_MILLION) {
        return scale(numeral, 8).ok_or_else(format_error);
    }

    trimmed.parse::<u64>().map_err(|_| format_error())
}

// Same as parse_count, but for a raw JSON field
//
// Missing/null counts are 0. Numbers are taken as-is (fractional ones are
// truncated), strings go through parse_count.
pub fn parse_count_value(value: &Value) -> Result<u64, CrawlError> {
    match value {
        Value::Null => Ok(0),
        Value::String(s) => parse_count(s),
        Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(n), _) => Ok(n),
            (None, Some(f)) if f.is_finite() && f >= 0.0 => Ok(f as u64),
            _ => Err(CrawlError::Format { raw: n.to_string() }),
        },
        other => Err(CrawlError::Format {
            raw: other.to_string(),
        }),
    }
}

// Multiplies a decimal numeral by 10^zeros without going through f64
fn scale(numeral: &str, zeros: usize) -> Option<u64> {
    let numeral = numeral.trim();
    let (whole, frac) = numeral.split_once('.').unwrap_or((numeral, ""));

    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    // Right-pad (or cut) the fraction to exactly `zeros` digits
    let mut frac_digits: String = frac.chars().take(zeros).collect();
    while frac_digits.len() < zeros {
        frac_digits.push('0');
    }
    let frac: u64 = frac_digits.parse().ok()?;

    whole.checked_mul(10u64.pow(zeros as u32))?.checked_add(frac)
}
