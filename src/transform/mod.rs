// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Coordinate and time normalization applied at ingestion.
//!
//! - [`lonflip`] - map longitudes into a fixed 360° interval
//! - [`monotonic`] - track timestamp regressions

pub mod lonflip;
pub mod monotonic;

pub use lonflip::{normalize_longitude, LonflipPolicy};
pub use monotonic::{TimeCheck, TimestampMonitor};

use crate::core::Record;

/// Apply `policy` to every position carried by `record`.
pub fn normalize_record(record: &mut Record, policy: LonflipPolicy) {
    if let Some(position) = record.position_mut() {
        position.lon = normalize_longitude(position.lon, policy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NavFix, Position};

    #[test]
    fn test_normalize_record() {
        let mut record = Record::Nav(NavFix {
            position: Position::new(190.0, 1.0),
            ..NavFix::default()
        });
        normalize_record(&mut record, LonflipPolicy::ForceSigned);
        assert_eq!(record.position(), Some(Position::new(-170.0, 1.0)));

        let mut comment = Record::comment("no position");
        normalize_record(&mut comment, LonflipPolicy::ForcePositive);
        assert_eq!(comment, Record::comment("no position"));
    }
}
