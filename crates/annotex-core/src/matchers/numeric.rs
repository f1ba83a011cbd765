//! Numeric value matching across common number formats.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{NUMBER_GROUPED, NUMBER_PLAIN};
use super::{FieldMatch, FieldMatcher};
use crate::models::value::ExpectedValue;

/// Finds the first number in the text equal to the expected value.
///
/// `79990`, `79 990,00` and `79,990.00` all match an expected `79990`.
pub struct NumericMatcher;

impl NumericMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NumericMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMatcher for NumericMatcher {
    fn find_match(&self, text: &str, expected: &ExpectedValue) -> Option<FieldMatch> {
        let target = expected_decimal(expected)?;

        let mut candidates: Vec<(usize, usize)> = NUMBER_GROUPED
            .find_iter(text)
            .chain(NUMBER_PLAIN.find_iter(text))
            .map(|m| (m.start(), m.end()))
            .collect();

        // Leftmost first; at the same start prefer the longer reading
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
        candidates.dedup();

        candidates
            .into_iter()
            .find(|&(start, end)| {
                amount_readings(&text[start..end])
                    .iter()
                    .any(|value| *value == target)
            })
            .map(|(start, end)| FieldMatch::from_bytes(text, start, end))
    }
}

fn expected_decimal(expected: &ExpectedValue) -> Option<Decimal> {
    match expected {
        ExpectedValue::Number(n) if n.is_finite() => Decimal::from_str(&n.to_string()).ok(),
        ExpectedValue::Text(s) => parse_amount(s),
        _ => None,
    }
}

/// Parse a formatted amount (e.g., "1 234,56", "1,234.56" or "1234.56").
///
/// A single comma or dot is read as the decimal separator.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    amount_readings(s).into_iter().next()
}

/// Every plausible value of a formatted number, most likely first.
///
/// `1,234` is ambiguous: it reads as `1.234` with a decimal comma and
/// as `1234` with a thousands comma.
fn amount_readings(s: &str) -> Vec<Decimal> {
    let negative = s.trim_start().starts_with('-');
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return Vec::new();
    }

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    let normalized: Vec<String> = match (commas, dots) {
        (0, 0) => vec![cleaned],
        (c, d) if c > 0 && d > 0 => {
            // Whichever separator comes last is the decimal separator
            let comma_pos = cleaned.rfind(',').unwrap_or(0);
            let dot_pos = cleaned.rfind('.').unwrap_or(0);
            if comma_pos > dot_pos {
                vec![cleaned.replace('.', "").replace(',', ".")]
            } else {
                vec![cleaned.replace(',', "")]
            }
        }
        (1, 0) | (0, 1) => {
            let sep = if commas == 1 { ',' } else { '.' };
            let decimal = cleaned.replace(sep, ".");
            let digits_after = cleaned.len() - cleaned.rfind(sep).unwrap_or(0) - 1;
            if digits_after == 3 {
                vec![decimal, cleaned.replace(sep, "")]
            } else {
                vec![decimal]
            }
        }
        // Repeated separator of one kind is thousands grouping
        _ => vec![cleaned.replace([',', '.'], "")],
    };

    normalized
        .iter()
        .filter_map(|n| Decimal::from_str(n).ok())
        .map(|d| if negative { -d } else { d })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1 234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("12 345 678,90"), Some(dec("12345678.90")));
        assert_eq!(parse_amount("1.234.567"), Some(dec("1234567")));
        assert_eq!(parse_amount("-42"), Some(dec("-42")));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_ambiguous_thousands() {
        let readings = amount_readings("79,990");
        assert_eq!(readings, vec![dec("79.990"), dec("79990")]);
    }

    #[test]
    fn test_match_grouped_number() {
        let matcher = NumericMatcher::new();
        let text = "Price: 79 990,00 USD";

        let found = matcher.find_match(text, &ExpectedValue::Number(79990.0));
        assert_eq!(found, Some(FieldMatch::new(7, "79 990,00")));
    }

    #[test]
    fn test_match_plain_number_inside_group() {
        let matcher = NumericMatcher::new();
        let text = "Qty 12 345 units";

        // "12 345" reads as 12345, but the standalone 345 is also a candidate
        let found = matcher.find_match(text, &ExpectedValue::Number(345.0));
        assert_eq!(found, Some(FieldMatch::new(7, "345")));
    }

    #[test]
    fn test_match_expected_as_text() {
        let matcher = NumericMatcher::new();
        let found = matcher.find_match("total 1,234.50", &ExpectedValue::from("1234.5"));
        assert_eq!(found, Some(FieldMatch::new(6, "1,234.50")));
    }

    #[test]
    fn test_no_match() {
        let matcher = NumericMatcher::new();
        assert_eq!(matcher.find_match("no digits", &ExpectedValue::Number(5.0)), None);
        assert_eq!(matcher.find_match("5 apples", &ExpectedValue::Missing), None);
    }
}
