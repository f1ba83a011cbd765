//! Calendar date matching.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_YMD};
use super::{FieldMatch, FieldMatcher};
use crate::models::value::ExpectedValue;

/// Formats accepted for expected values.
const EXPECTED_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%Y.%m.%d"];

/// Finds the first date in the text equal to the expected date,
/// whatever format either side uses.
pub struct DateMatcher;

impl DateMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMatcher for DateMatcher {
    fn find_match(&self, text: &str, expected: &ExpectedValue) -> Option<FieldMatch> {
        let target = match expected {
            ExpectedValue::Text(s) => parse_date(s)?,
            _ => return None,
        };

        let mut candidates: Vec<(usize, usize, NaiveDate)> = Vec::new();

        for caps in DATE_DMY.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let year = parse_year(&caps[3]);
            if let (Some(date), Some(full)) = (NaiveDate::from_ymd_opt(year, month, day), caps.get(0)) {
                candidates.push((full.start(), full.end(), date));
            }
        }

        for caps in DATE_YMD.captures_iter(text) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);
            if let (Some(date), Some(full)) = (NaiveDate::from_ymd_opt(year, month, day), caps.get(0)) {
                candidates.push((full.start(), full.end(), date));
            }
        }

        candidates.sort_by_key(|&(start, _, _)| start);

        candidates
            .into_iter()
            .find(|&(_, _, date)| date == target)
            .map(|(start, end, _)| FieldMatch::from_bytes(text, start, end))
    }
}

/// Parse an expected date in any of the accepted formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    EXPECTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Expand two-digit years into 2000-2099.
fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if s.len() == 2 { 2000 + year } else { year }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(parse_date("2024-01-15"), expected);
        assert_eq!(parse_date("15.01.2024"), expected);
        assert_eq!(parse_date("15/01/2024"), expected);
        assert_eq!(parse_date("January 15"), None);
    }

    #[test]
    fn test_match_across_formats() {
        let matcher = DateMatcher::new();
        let text = "Issued 14.01.2024, due 15.01.2024";

        let found = matcher.find_match(text, &ExpectedValue::from("2024-01-15"));
        assert_eq!(found, Some(FieldMatch::new(23, "15.01.2024")));
    }

    #[test]
    fn test_match_iso_in_text() {
        let matcher = DateMatcher::new();
        let found = matcher.find_match("date: 2024-03-09", &ExpectedValue::from("09.03.2024"));
        assert_eq!(found, Some(FieldMatch::new(6, "2024-03-09")));
    }

    #[test]
    fn test_two_digit_year() {
        let matcher = DateMatcher::new();
        let found = matcher.find_match("on 1/2/24", &ExpectedValue::from("2024-02-01"));
        assert_eq!(found, Some(FieldMatch::new(3, "1/2/24")));
    }

    #[test]
    fn test_numbers_are_not_dates() {
        let matcher = DateMatcher::new();
        assert_eq!(matcher.find_match("2024-01-15", &ExpectedValue::Number(2024.0)), None);
    }
}
