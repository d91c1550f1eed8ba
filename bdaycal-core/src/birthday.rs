//! Birthday values as found in vCard BDAY properties.

use chrono::{Datelike, NaiveDate};

use crate::error::{BdayError, BdayResult};

/// Placeholder year meaning "birth year unknown".
///
/// It is a leap year, so a year-less Feb 29 still forms a valid date.
pub const SENTINEL_YEAR: i32 = 1604;

const DAYS_PER_YEAR: f64 = 365.25;

/// A contact's date of birth, possibly without a known year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Birthday {
    date: NaiveDate,
}

impl Birthday {
    /// Parse a BDAY value.
    ///
    /// Accepted forms, tried in order: `YYYY-MM-DD`, `YYYYMMDD` and the
    /// year-less `--MMDD`, which is given [`SENTINEL_YEAR`].
    pub fn parse(value: &str) -> BdayResult<Self> {
        let value = value.trim();

        parse_iso(value)
            .or_else(|| parse_compact(value))
            .or_else(|| parse_month_day(value))
            .map(|date| Birthday { date })
            .ok_or_else(|| BdayError::InvalidBirthday(value.to_string()))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year_known(&self) -> bool {
        self.date.year() != SENTINEL_YEAR
    }

    /// The date this birthday is celebrated in `year`.
    ///
    /// Feb 29 falls back to Feb 28 outside leap years.
    pub fn occurrence(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.date.month(), self.date.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, self.date.month(), self.date.day() - 1))
    }

    /// Age reached on the occurrence in `year`, if the birth year is known.
    pub fn age_in(&self, year: i32) -> Option<i64> {
        if !self.year_known() {
            return None;
        }
        let days = (self.occurrence(year)? - self.date).num_days();
        Some((days as f64 / DAYS_PER_YEAR).round() as i64)
    }
}

fn parse_iso(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn parse_compact(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = value[..4].parse().ok()?;
    let month = value[4..6].parse().ok()?;
    let day = value[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_month_day(value: &str) -> Option<NaiveDate> {
    let digits = value.strip_prefix("--")?;
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month = digits[..2].parse().ok()?;
    let day = digits[2..].parse().ok()?;
    NaiveDate::from_ymd_opt(SENTINEL_YEAR, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_supported_formats() {
        assert_eq!(Birthday::parse("1990-04-15").unwrap().date(), ymd(1990, 4, 15));
        assert_eq!(Birthday::parse("19900415").unwrap().date(), ymd(1990, 4, 15));
        assert_eq!(Birthday::parse("--0415").unwrap().date(), ymd(SENTINEL_YEAR, 4, 15));
    }

    #[test]
    fn test_sentinel_only_for_month_day_form() {
        assert!(Birthday::parse("1990-04-15").unwrap().year_known());
        assert!(Birthday::parse("19900415").unwrap().year_known());
        assert!(!Birthday::parse("--0415").unwrap().year_known());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for value in ["", "15.04.1990", "1990-13-01", "--1332", "--415", "1990041", "tomorrow"] {
            let err = Birthday::parse(value).unwrap_err();
            assert!(
                matches!(err, BdayError::InvalidBirthday(_)),
                "expected InvalidBirthday for {:?}, got {:?}",
                value,
                err
            );
        }
    }

    #[test]
    fn test_year_less_leap_day_parses() {
        let bday = Birthday::parse("--0229").unwrap();
        assert_eq!(bday.date(), ymd(SENTINEL_YEAR, 2, 29));
        assert_eq!(bday.occurrence(2028), Some(ymd(2028, 2, 29)));
        assert_eq!(bday.occurrence(2027), Some(ymd(2027, 2, 28)));
    }

    #[test]
    fn test_age_matches_rounded_day_count() {
        let bday = Birthday::parse("1990-04-15").unwrap();
        assert_eq!(bday.age_in(2026), Some(36));

        let occurrence = ymd(2026, 4, 15);
        let expected = ((occurrence - ymd(1990, 4, 15)).num_days() as f64 / 365.25).round() as i64;
        assert_eq!(bday.age_in(2026), Some(expected));
    }

    #[test]
    fn test_age_unknown_without_year() {
        let bday = Birthday::parse("--1231").unwrap();
        assert_eq!(bday.age_in(2026), None);
    }

    #[test]
    fn test_age_zero_in_birth_year() {
        let bday = Birthday::parse("2026-01-02").unwrap();
        assert_eq!(bday.age_in(2026), Some(0));
    }
}
