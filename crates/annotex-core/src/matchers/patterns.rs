//! Common regex patterns for value matching.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numbers with thousands grouping (1 234,56 / 1,234.56 / 1.234.567)
    pub static ref NUMBER_GROUPED: Regex = Regex::new(
        r"-?\b\d{1,3}(?:[ \u{00a0},.]\d{3})+(?:[.,]\d+)?\b"
    ).unwrap();

    // Plain numbers (1234 / 1234,56 / 1234.56)
    pub static ref NUMBER_PLAIN: Regex = Regex::new(
        r"-?\b\d+(?:[.,]\d+)?\b"
    ).unwrap();

    // DD.MM.YYYY or DD/MM/YYYY or DD-MM-YYYY (two-digit years allowed)
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    // YYYY-MM-DD or YYYY/MM/DD or YYYY.MM.DD
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})\b"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_numbers() {
        let found: Vec<&str> = NUMBER_GROUPED
            .find_iter("Total 1 234,56 or 1,234.56 vs 99")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["1 234,56", "1,234.56"]);
    }

    #[test]
    fn test_dates() {
        assert!(DATE_DMY.is_match("15.01.2024"));
        assert!(DATE_YMD.is_match("2024-01-15"));
        assert!(!DATE_YMD.is_match("15.01.24"));
    }
}
