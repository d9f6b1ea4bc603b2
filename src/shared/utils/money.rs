//! Price formatting
//!
//! Prices are stored as integer cents. Display follows the storefront's
//! convention: thousands separated by commas, `$` as suffix, cents only
//! when non-zero (`1,234$`, `12.50$`).

/// Format an amount in cents for display.
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let major = group_thousands(abs / 100);
    let minor = abs % 100;

    if minor == 0 {
        format!("{}{}$", sign, major)
    } else {
        format!("{}{}.{:02}$", sign, major, minor)
    }
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
    fn whole_amounts() {
        assert_eq!(format_price(0), "0$");
        assert_eq!(format_price(300), "3$");
        assert_eq!(format_price(123_400), "1,234$");
        assert_eq!(format_price(100_000_000), "1,000,000$");
    }

    #[test]
    fn fractional_amounts() {
        assert_eq!(format_price(1250), "12.50$");
        assert_eq!(format_price(5), "0.05$");
        assert_eq!(format_price(-1250), "-12.50$");
    }
}
