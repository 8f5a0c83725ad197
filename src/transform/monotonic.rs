// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Timestamp monotonicity tracking.
//!
//! Real surveys contain clock jumps and duplicated pings. Regressions are
//! counted and logged, never rejected.

use tracing::warn;

/// What [`TimestampMonitor::observe`] saw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeCheck {
    /// First timestamp, or not earlier than the previous one.
    Ordered,
    /// Earlier than the previous timestamp by `by` seconds.
    Regressed { by: f64 },
    /// NaN or infinite; ignored.
    Invalid,
}

/// Per-stream monotonicity checker.
#[derive(Debug, Clone, Default)]
pub struct TimestampMonitor {
    last: Option<f64>,
    regressions: u64,
    observed: u64,
}

impl TimestampMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the next timestamp in stream order.
    pub fn observe(&mut self, time: f64) -> TimeCheck {
        if !time.is_finite() {
            return TimeCheck::Invalid;
        }
        self.observed += 1;
        let check = match self.last {
            Some(last) if time < last => {
                self.regressions += 1;
                warn!(
                    time,
                    previous = last,
                    regression = last - time,
                    "timestamp went backwards"
                );
                TimeCheck::Regressed { by: last - time }
            }
            _ => TimeCheck::Ordered,
        };
        self.last = Some(time);
        check
    }

    pub fn regressions(&self) -> u64 {
        self.regressions
    }

    pub fn observed(&self) -> u64 {
        self.observed
    }

    pub fn last(&self) -> Option<f64> {
        self.last
    }
}
