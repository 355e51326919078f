/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// Rounding follows the exact binary value of `value`, so `1.005` (stored as
/// `1.00499…`) renders as `"1.00"`.
///
/// # Examples
///
/// ```
/// use sales_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if let Some(frac) = fraction {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a monetary amount as a dollar string with two decimal places and
/// thousands separators.
///
/// # Examples
///
/// ```
/// use sales_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.56),  "$1,234.56");
/// assert_eq!(format_currency(0.0),      "$0.00");
/// assert_eq!(format_currency(-9.99),    "$-9.99");
/// ```
pub fn format_currency(amount: f64) -> String {
    format!("${}", format_number(amount, 2))
}

/// Render a sale amount for the consolidated CSV.
///
/// Uses the shortest decimal form that round-trips, but always keeps at least
/// one fractional digit so whole amounts stay recognisably numeric (`6.0`).
pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() && amount.fract() == 0.0 && amount.abs() < 1e16 {
        format!("{amount:.1}")
    } else {
        amount.to_string()
    }
}

/// Capitalise the first letter of every whitespace- or hyphen-separated word
/// and lowercase the rest (`"north east"` → `"North East"`).
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_number ────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 1), "1,234.5");
        assert_eq!(format_number(1_234_567.891, 2), "1,234,567.89");
    }

    #[test]
    fn test_format_number_exact_thousands() {
        assert_eq!(format_number(1_000.0, 0), "1,000");
        assert_eq!(format_number(100_000.0, 2), "100,000.00");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-9_876.5, 1), "-9,876.5");
    }

    #[test]
    fn test_format_number_negative_rounding_to_zero_has_no_sign() {
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn test_format_number_follows_binary_rounding() {
        assert_eq!(format_number(1.005, 2), "1.00");
        assert_eq!(format_number(2.675, 2), "2.67");
    }

    // ── format_currency ──────────────────────────────────────────────────────

    #[test]
    fn test_format_currency_positive() {
        assert_eq!(format_currency(1_234.56), "$1,234.56");
    }

    #[test]
    fn test_format_currency_large() {
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
    }

    // ── format_amount ────────────────────────────────────────────────────────

    #[test]
    fn test_format_amount_whole_keeps_one_decimal() {
        assert_eq!(format_amount(6.0), "6.0");
        assert_eq!(format_amount(0.0), "0.0");
    }

    #[test]
    fn test_format_amount_fractional_is_shortest() {
        assert_eq!(format_amount(14.5), "14.5");
        assert_eq!(format_amount(0.1 + 0.2), "0.30000000000000004");
    }

    // ── title_case ───────────────────────────────────────────────────────────

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("north"), "North");
        assert_eq!(title_case("SOUTH east"), "South East");
        assert_eq!(title_case("north-west"), "North-West");
        assert_eq!(title_case(""), "");
    }
}
