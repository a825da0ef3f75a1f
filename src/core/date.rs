//! Partition date resolution
//!
//! Turns the optional `--target-date` argument into a [`PartitionKey`].
//! Without an argument the job processes the day two days before "now" in
//! the reporting timezone (UTC+9), which leaves time for late event data to
//! land in the warehouse.

use crate::domain::{PartitionKey, Result, TransferError};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Fixed offset of the reporting timezone from UTC, in hours
pub const REPORTING_OFFSET_HOURS: i64 = 9;

/// Days between "today" in the reporting timezone and the default partition
pub const DEFAULT_LAG_DAYS: i64 = 2;

/// Resolves the partition to export
///
/// `now` is injected so the default can be tested against a fixed clock.
///
/// # Errors
///
/// Returns [`TransferError::InvalidDateFormat`] if `input` is present but is
/// not a `YYYY-MM-DD` calendar date.
///
/// # Examples
///
/// ```
/// use ga4_transfer::core::date::resolve_partition_key;
/// use chrono::Utc;
///
/// let key = resolve_partition_key(Some("2024-03-05"), Utc::now()).unwrap();
/// assert_eq!(key.as_str(), "20240305");
/// ```
pub fn resolve_partition_key(input: Option<&str>, now: DateTime<Utc>) -> Result<PartitionKey> {
    match input.filter(|s| !s.is_empty()) {
        Some(raw) => {
            let key = parse_target_date(raw)?;
            tracing::info!(partition = %key, "Using the requested target date");
            Ok(key)
        }
        None => {
            let key = default_partition_key(now);
            tracing::info!(
                partition = %key,
                lag_days = DEFAULT_LAG_DAYS,
                "No target date given, using the default partition"
            );
            Ok(key)
        }
    }
}

/// Parses an operator-supplied `YYYY-MM-DD` date
///
/// # Errors
///
/// Returns [`TransferError::InvalidDateFormat`] on any other format.
pub fn parse_target_date(raw: &str) -> Result<PartitionKey> {
    // chrono accepts unpadded fields; the operator contract is strictly zero-padded
    let well_formed = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return Err(TransferError::InvalidDateFormat {
            input: raw.to_string(),
        });
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(PartitionKey::from_date)
        .map_err(|_| TransferError::InvalidDateFormat {
            input: raw.to_string(),
        })
}

/// Default partition: shift to the reporting timezone first, then subtract days
pub fn default_partition_key(now: DateTime<Utc>) -> PartitionKey {
    let local = now + Duration::hours(REPORTING_OFFSET_HOURS);
    let target = local - Duration::days(DEFAULT_LAG_DAYS);
    PartitionKey::from_date(target.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test_case("2024-03-05", "20240305" ; "plain date")]
    #[test_case("2024-02-29", "20240229" ; "leap day")]
    #[test_case("1999-12-31", "19991231" ; "year end")]
    fn test_explicit_date(input: &str, expected: &str) {
        let key = resolve_partition_key(Some(input), utc(2030, 1, 1, 0, 0)).unwrap();
        assert_eq!(key.as_str(), expected);
    }

    #[test_case("2024/03/05" ; "slashes")]
    #[test_case("not-a-date" ; "words")]
    #[test_case("20240305" ; "compact")]
    #[test_case("2024-3-5" ; "unpadded")]
    #[test_case("2023-02-29" ; "not a leap year")]
    #[test_case("2024-13-01" ; "month out of range")]
    #[test_case(" 2024-01-01 " ; "surrounding whitespace")]
    #[test_case("2024-01-01\n" ; "trailing newline")]
    fn test_invalid_date(input: &str) {
        let result = resolve_partition_key(Some(input), utc(2030, 1, 1, 0, 0));
        match result {
            Err(TransferError::InvalidDateFormat { input: reported }) => {
                assert_eq!(reported, input)
            }
            other => panic!("expected InvalidDateFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_default_golden_case() {
        // 01:00Z is 10:00 in UTC+9 on the same day; two days earlier is the 5th
        let key = resolve_partition_key(None, utc(2024, 3, 7, 1, 0)).unwrap();
        assert_eq!(key.as_str(), "20240305");
    }

    #[test]
    fn test_default_shift_crosses_midnight() {
        // 15:00Z on the 6th is already 00:00 on the 7th in UTC+9
        let key = default_partition_key(utc(2024, 3, 6, 15, 0));
        assert_eq!(key.as_str(), "20240305");

        let key = default_partition_key(utc(2024, 3, 6, 14, 59));
        assert_eq!(key.as_str(), "20240304");
    }

    #[test]
    fn test_default_crosses_month_boundary() {
        let key = default_partition_key(utc(2024, 3, 1, 0, 0));
        assert_eq!(key.as_str(), "20240228");
    }

    #[test]
    fn test_empty_input_uses_default() {
        let key = resolve_partition_key(Some(""), utc(2024, 3, 7, 1, 0)).unwrap();
        assert_eq!(key.as_str(), "20240305");
    }
}
