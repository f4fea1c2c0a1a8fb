//! Calendar date keys for recap snapshots.
//!
//! Every snapshot is identified by a canonical zero-padded `YYYY-MM-DD`
//! string. Zero padding means the lexicographic order of keys equals their
//! chronological order, which the cache eviction and the availability
//! index both rely on.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Duration, Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string that does not hold a usable `YYYY-MM-DD` date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid date key: {0}")]
pub struct InvalidDateKey(pub String);

fn canonical_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date key pattern"))
}

/// Split a date key into `(year, month, day)` integers.
///
/// Lenient on purpose: requires at least three `-`-separated numeric
/// components but does not range-check the calendar. Callers that need a
/// canonical key construct a [`DateKey`] instead.
pub fn split_components(key: &str) -> Result<(i32, u32, u32), InvalidDateKey> {
    let mut parts = key.split('-').map(|part| part.parse::<u32>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(year)), Some(Ok(month)), Some(Ok(day))) => Ok((year as i32, month, day)),
        _ => Err(InvalidDateKey(key.to_string())),
    }
}

/// Canonical `YYYY-MM-DD` key identifying one dated recap snapshot.
///
/// Immutable once constructed; `Ord` derives from the inner string, so
/// sorting keys sorts them chronologically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Accept a string only in the strict `YYYY-MM-DD` form.
    pub fn new(key: impl Into<String>) -> Result<Self, InvalidDateKey> {
        let key = key.into();
        if canonical_re().is_match(&key) {
            Ok(Self(key))
        } else {
            Err(InvalidDateKey(key))
        }
    }

    /// Format a calendar date as a zero-padded key.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }

    /// Today's date in the local timezone.
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `YYYY` component, used to build the remote snapshot path.
    pub fn year(&self) -> &str {
        &self.0[..4]
    }

    /// Split into `(year, month, day)` integers.
    pub fn components(&self) -> Result<(i32, u32, u32), InvalidDateKey> {
        split_components(&self.0)
    }

    /// Long display form, e.g. `January 1, 2025`.
    pub fn display(&self) -> Result<String, InvalidDateKey> {
        Ok(self.to_naive()?.format("%B %-d, %Y").to_string())
    }

    /// Shift by `n` calendar days, carrying across month and year
    /// boundaries. `n` may be negative.
    pub fn add_days(&self, n: i64) -> Result<Self, InvalidDateKey> {
        let shifted = self
            .to_naive()?
            .checked_add_signed(Duration::days(n))
            .ok_or_else(|| InvalidDateKey(self.0.clone()))?;
        Ok(Self::from_date(shifted))
    }

    /// Shift backwards by `n` calendar days.
    pub fn subtract_days(&self, n: i64) -> Result<Self, InvalidDateKey> {
        self.add_days(-n)
    }

    fn to_naive(&self) -> Result<NaiveDate, InvalidDateKey> {
        let (year, month, day) = self.components()?;
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| InvalidDateKey(self.0.clone()))
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DateKey {
    type Err = InvalidDateKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        DateKey::new(s).unwrap()
    }

    #[test]
    fn test_new_accepts_canonical_keys() {
        assert!(DateKey::new("2025-06-01").is_ok());
        assert!(DateKey::new("1999-12-31").is_ok());
    }

    #[test]
    fn test_new_rejects_malformed_keys() {
        for bad in ["2025-6-1", "06/01/2025", "2025-06-01x", "2025-06", "", "abcd-ef-gh"] {
            assert!(DateKey::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_format_parse_round_trip() {
        let original = "2025-06-01";
        let (year, month, day) = key(original).components().unwrap();
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        assert_eq!(DateKey::from_date(date).as_str(), original);
    }

    #[test]
    fn test_split_components_is_lenient() {
        // No calendar range check, only numeric components
        assert_eq!(split_components("2025-13-40").unwrap(), (2025, 13, 40));
        assert!(split_components("2025-06").is_err());
        assert!(split_components("2025-xx-01").is_err());
    }

    #[test]
    fn test_add_days_leap_year_boundary() {
        assert_eq!(key("2024-02-28").add_days(1).unwrap(), key("2024-02-29"));
        assert_eq!(key("2023-02-28").add_days(1).unwrap(), key("2023-03-01"));
    }

    #[test]
    fn test_add_days_year_boundary() {
        assert_eq!(key("2024-12-31").add_days(1).unwrap(), key("2025-01-01"));
        assert_eq!(key("2025-01-01").add_days(-1).unwrap(), key("2024-12-31"));
    }

    #[test]
    fn test_add_subtract_inverse() {
        let d = key("2025-03-15");
        for n in [0, 1, 28, 31, 365, 400] {
            assert_eq!(d.add_days(n).unwrap().subtract_days(n).unwrap(), d);
            assert_eq!(d.subtract_days(n).unwrap().add_days(n).unwrap(), d);
        }
    }

    #[test]
    fn test_display_long_form() {
        assert_eq!(key("2025-01-01").display().unwrap(), "January 1, 2025");
        assert_eq!(key("2024-11-30").display().unwrap(), "November 30, 2024");
    }

    #[test]
    fn test_year_component() {
        assert_eq!(key("2025-06-01").year(), "2025");
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut keys = vec![key("2025-02-01"), key("2024-12-31"), key("2025-01-15")];
        keys.sort();
        assert_eq!(
            keys,
            vec![key("2024-12-31"), key("2025-01-15"), key("2025-02-01")]
        );
    }

    #[test]
    fn test_today_is_canonical() {
        let today = DateKey::today();
        assert!(DateKey::new(today.as_str()).is_ok());
    }
}
