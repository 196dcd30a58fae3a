use crate::error::{BudgetError, Result};

/// Format integer cents as a dollar amount with thousands separators: $1,234.56
pub fn money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();
    let rem = abs % 100;

    let mut with_commas = String::new();
    for (i, c) in dollars.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    format!("{sign}${with_commas}.{rem:02}")
}

/// Parse a dollar string ("12.34", "-$1,200", "0.5") to signed integer cents.
/// Pure integer arithmetic; floats would drift on large ledgers.
pub fn parse_amount(input: &str) -> Result<i64> {
    let invalid = || BudgetError::InvalidAmount(input.to_string());

    let s = input.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let s = s.strip_prefix('$').unwrap_or(s);
    let s = s.replace(',', "");

    let (dollars_part, cents_part) = match s.split_once('.') {
        Some((d, c)) => (d, c),
        None => (s.as_str(), ""),
    };
    if dollars_part.is_empty() && cents_part.is_empty() {
        return Err(invalid());
    }
    if cents_part.len() > 2
        || !dollars_part.chars().all(|c| c.is_ascii_digit())
        || !cents_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let dollars: i64 = if dollars_part.is_empty() {
        0
    } else {
        dollars_part.parse().map_err(|_| invalid())?
    };
    let cents: i64 = match cents_part.len() {
        0 => 0,
        1 => cents_part.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => cents_part.parse().map_err(|_| invalid())?,
    };

    let total = dollars * 100 + cents;
    Ok(if negative { -total } else { total })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(123456), "$1,234.56");
        assert_eq!(money(-50000), "-$500.00");
        assert_eq!(money(0), "$0.00");
        assert_eq!(money(100000099), "$1,000,000.99");
        assert_eq!(money(5), "$0.05");
        assert_eq!(money(-7), "-$0.07");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.34").unwrap(), 1234);
        assert_eq!(parse_amount("-5").unwrap(), -500);
        assert_eq!(parse_amount("$1,234.56").unwrap(), 123456);
        assert_eq!(parse_amount("-$1,200").unwrap(), -120000);
        assert_eq!(parse_amount("0.5").unwrap(), 50);
        assert_eq!(parse_amount(".99").unwrap(), 99);
        assert_eq!(parse_amount("  42.10 ").unwrap(), 4210);
        assert_eq!(parse_amount("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        for bad in ["", "abc", "1.234", "12.3.4", "--5", "1..2", "$", "."] {
            assert!(
                matches!(parse_amount(bad), Err(BudgetError::InvalidAmount(_))),
                "should reject {bad:?}"
            );
        }
    }

    #[test]
    fn test_parse_then_format_round_trip() {
        assert_eq!(money(parse_amount("-$1,234.56").unwrap()), "-$1,234.56");
    }
}
