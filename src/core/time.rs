// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Epoch time helpers.
//!
//! Records carry time as `f64` seconds since 1970-01-01T00:00:00Z. Codecs
//! that store calendar fields convert through these helpers.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

/// Broken-down UTC calendar time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

/// Convert calendar fields to epoch seconds.
///
/// Returns `None` when the date is invalid. `second` may carry a fraction
/// and may exceed 59 (it is added as an offset).
pub fn epoch_seconds(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: f64,
) -> Option<f64> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    let base = midnight.and_utc().timestamp() as f64;
    Some(base + f64::from(hour) * 3600.0 + f64::from(minute) * 60.0 + second)
}

/// Split epoch seconds into calendar fields.
pub fn calendar(time: f64) -> Option<CalendarTime> {
    if !time.is_finite() {
        return None;
    }
    let whole = time.floor();
    let frac = time - whole;
    let dt = DateTime::<Utc>::from_timestamp(whole as i64, 0)?;
    Some(CalendarTime {
        year: dt.year(),
        month: dt.month(),
        day: dt.day(),
        hour: dt.hour(),
        minute: dt.minute(),
        second: f64::from(dt.second()) + frac,
    })
}

/// Human-readable UTC rendering with millisecond precision.
pub fn format_epoch(time: f64) -> String {
    let whole = time.floor();
    let nanos = ((time - whole) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    match DateTime::<Utc>::from_timestamp(whole as i64, nanos) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string(),
        None => format!("{time} s"),
    }
}

/// Current wall-clock time in epoch seconds.
pub fn now() -> f64 {
    let now = Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) * 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_seconds() {
        assert_eq!(epoch_seconds(1970, 1, 1, 0, 0, 0.0), Some(0.0));
        assert_eq!(epoch_seconds(2000, 1, 1, 0, 0, 0.0), Some(946_684_800.0));
        assert_eq!(
            epoch_seconds(2000, 1, 1, 1, 2, 3.5),
            Some(946_684_800.0 + 3723.5)
        );
        assert_eq!(epoch_seconds(2001, 2, 30, 0, 0, 0.0), None);
    }

    #[test]
    fn test_calendar_inverse() {
        let t = epoch_seconds(2002, 9, 14, 17, 45, 12.25).unwrap();
        let cal = calendar(t).unwrap();
        assert_eq!((cal.year, cal.month, cal.day), (2002, 9, 14));
        assert_eq!((cal.hour, cal.minute), (17, 45));
        assert!((cal.second - 12.25).abs() < 1e-6);
        assert!(calendar(f64::NAN).is_none());
    }

    #[test]
    fn test_format_epoch() {
        assert_eq!(format_epoch(0.5), "1970-01-01 00:00:00.500 UTC");
    }
}
