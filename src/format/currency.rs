//! Price formatting.

/// Format `amount` as US dollars: `$1,234.56`.
///
/// Rounds half away from zero to whole cents. Negative amounts render as
/// `-$5.00`; NaN and infinities render as `$0.00`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }

    // `as` saturates, so absurdly large amounts cannot overflow.
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_basic() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(5.0), "$5.00");
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(1234.56), "$1,234.56");
    }

    #[test]
    fn test_format_currency_rounding() {
        assert_eq!(format_currency(9.999), "$10.00");
        assert_eq!(format_currency(0.125), "$0.13");
        assert_eq!(format_currency(2.004), "$2.00");
    }

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(999.0), "$999.00");
        assert_eq!(format_currency(1000.0), "$1,000.00");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(123_456_789.1), "$123,456,789.10");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-5.0), "-$5.00");
        assert_eq!(format_currency(-1234.5), "-$1,234.50");
        // Rounds to zero, so no sign.
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_currency_non_finite() {
        assert_eq!(format_currency(f64::NAN), "$0.00");
        assert_eq!(format_currency(f64::INFINITY), "$0.00");
        assert_eq!(format_currency(f64::NEG_INFINITY), "$0.00");
    }
}
