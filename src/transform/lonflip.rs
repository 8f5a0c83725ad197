// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Longitude range normalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::SwathError;

/// Target longitude interval. Every interval is half-open and 360° wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LonflipPolicy {
    /// `[-360, 0)`
    #[serde(rename = "negative", alias = "force_negative")]
    ForceNegative,
    /// `[-180, 180)`
    #[default]
    #[serde(rename = "signed", alias = "force_signed")]
    ForceSigned,
    /// `[0, 360)`
    #[serde(rename = "positive", alias = "force_positive")]
    ForcePositive,
}

impl LonflipPolicy {
    /// Policy for the legacy integer switch: negative, zero or positive.
    pub fn from_lonflip(lonflip: i32) -> Self {
        match lonflip.signum() {
            -1 => LonflipPolicy::ForceNegative,
            0 => LonflipPolicy::ForceSigned,
            _ => LonflipPolicy::ForcePositive,
        }
    }

    /// Legacy integer for this policy.
    pub fn lonflip(self) -> i32 {
        match self {
            LonflipPolicy::ForceNegative => -1,
            LonflipPolicy::ForceSigned => 0,
            LonflipPolicy::ForcePositive => 1,
        }
    }

    /// Lower and upper bound of the interval.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            LonflipPolicy::ForceNegative => (-360.0, 0.0),
            LonflipPolicy::ForceSigned => (-180.0, 180.0),
            LonflipPolicy::ForcePositive => (0.0, 360.0),
        }
    }

    pub fn contains(self, lon: f64) -> bool {
        let (lo, hi) = self.bounds();
        lon >= lo && lon < hi
    }
}

impl fmt::Display for LonflipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LonflipPolicy::ForceNegative => "negative",
            LonflipPolicy::ForceSigned => "signed",
            LonflipPolicy::ForcePositive => "positive",
        })
    }
}

impl FromStr for LonflipPolicy {
    type Err = SwathError;

    /// Accepts `negative`, `signed`, `positive` or the integers -1, 0, 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "negative" | "force_negative" => Ok(LonflipPolicy::ForceNegative),
            "signed" | "force_signed" => Ok(LonflipPolicy::ForceSigned),
            "positive" | "force_positive" => Ok(LonflipPolicy::ForcePositive),
            other => other
                .parse::<i32>()
                .map(LonflipPolicy::from_lonflip)
                .map_err(|_| SwathError::Config(format!("invalid lonflip policy {s:?}"))),
        }
    }
}

/// Map `raw` into the policy's interval.
///
/// Values already inside the interval are returned unchanged, which makes
/// the mapping idempotent. Non-finite values pass through.
pub fn normalize_longitude(raw: f64, policy: LonflipPolicy) -> f64 {
    if !raw.is_finite() || policy.contains(raw) {
        return raw;
    }
    let (lo, hi) = policy.bounds();
    let wrapped = lo + (raw - lo).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative offsets
    if wrapped >= hi {
        lo
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICIES: [LonflipPolicy; 3] = [
        LonflipPolicy::ForceNegative,
        LonflipPolicy::ForceSigned,
        LonflipPolicy::ForcePositive,
    ];

    #[test]
    fn test_from_lonflip() {
        assert_eq!(LonflipPolicy::from_lonflip(-1), LonflipPolicy::ForceNegative);
        assert_eq!(LonflipPolicy::from_lonflip(-7), LonflipPolicy::ForceNegative);
        assert_eq!(LonflipPolicy::from_lonflip(0), LonflipPolicy::ForceSigned);
        assert_eq!(LonflipPolicy::from_lonflip(3), LonflipPolicy::ForcePositive);
    }

    #[test]
    fn test_signed() {
        let p = LonflipPolicy::ForceSigned;
        assert_eq!(normalize_longitude(190.0, p), -170.0);
        assert_eq!(normalize_longitude(-190.0, p), 170.0);
        assert_eq!(normalize_longitude(180.0, p), -180.0);
        assert_eq!(normalize_longitude(-180.0, p), -180.0);
        assert_eq!(normalize_longitude(725.0, p), 5.0);
    }

    #[test]
    fn test_positive_and_negative() {
        assert_eq!(normalize_longitude(-10.0, LonflipPolicy::ForcePositive), 350.0);
        assert_eq!(normalize_longitude(360.0, LonflipPolicy::ForcePositive), 0.0);
        assert_eq!(normalize_longitude(10.0, LonflipPolicy::ForceNegative), -350.0);
        assert_eq!(normalize_longitude(0.0, LonflipPolicy::ForceNegative), -360.0);
    }

    #[test]
    fn test_in_range_values_unchanged() {
        assert_eq!(normalize_longitude(-170.5, LonflipPolicy::ForceSigned), -170.5);
        assert_eq!(normalize_longitude(359.9, LonflipPolicy::ForcePositive), 359.9);
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            -1000.25, -540.0, -360.0, -359.999, -180.0, -0.0, 0.0, 1e-12, 179.999999, 180.0,
            359.9999999, 360.0, 720.5, -1e-13,
        ];
        for policy in POLICIES {
            for raw in samples {
                let once = normalize_longitude(raw, policy);
                assert!(policy.contains(once), "{raw} -> {once} outside {policy}");
                assert_eq!(normalize_longitude(once, policy), once);
            }
        }
    }

    #[test]
    fn test_non_finite_passes_through() {
        assert!(normalize_longitude(f64::NAN, LonflipPolicy::ForceSigned).is_nan());
        assert_eq!(
            normalize_longitude(f64::INFINITY, LonflipPolicy::ForcePositive),
            f64::INFINITY
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("signed".parse::<LonflipPolicy>().unwrap(), LonflipPolicy::ForceSigned);
        assert_eq!("-1".parse::<LonflipPolicy>().unwrap(), LonflipPolicy::ForceNegative);
        assert_eq!("1".parse::<LonflipPolicy>().unwrap(), LonflipPolicy::ForcePositive);
        assert!("sideways".parse::<LonflipPolicy>().is_err());
    }
}
