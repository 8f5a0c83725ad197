// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::FlagState;

/// Address of one beam: ping time plus beam index.
///
/// Ordered by time (total order over `f64`) and then beam.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BeamKey {
    pub time: f64,
    pub beam: usize,
}

impl BeamKey {
    pub fn new(time: f64, beam: usize) -> Self {
        Self { time, beam }
    }
}

impl PartialEq for BeamKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BeamKey {}

impl PartialOrd for BeamKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BeamKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then(self.beam.cmp(&other.beam))
    }
}

/// One recorded flag change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditEvent {
    /// Ping time of the edited beam.
    pub timestamp: f64,
    pub beam: usize,
    /// State the editor saw before the change.
    pub previous: FlagState,
    pub new: FlagState,
    /// Tool that made the change.
    pub tool: String,
    /// When the change was made, epoch seconds.
    pub applied_at: f64,
}

impl EditEvent {
    pub fn key(&self) -> BeamKey {
        BeamKey::new(self.timestamp, self.beam)
    }

    /// Whether applying the event changes the primary state.
    pub fn is_transition(&self) -> bool {
        self.previous != self.new
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_order() {
        let mut keys = vec![
            BeamKey::new(2.0, 0),
            BeamKey::new(1.0, 5),
            BeamKey::new(1.0, 2),
            BeamKey::new(-0.5, 9),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                BeamKey::new(-0.5, 9),
                BeamKey::new(1.0, 2),
                BeamKey::new(1.0, 5),
                BeamKey::new(2.0, 0),
            ]
        );
    }

    #[test]
    fn test_transition() {
        let event = EditEvent {
            timestamp: 1.0,
            beam: 0,
            previous: FlagState::Good,
            new: FlagState::FlaggedManual,
            tool: "mbedit".to_string(),
            applied_at: 10.0,
        };
        assert!(event.is_transition());
        assert_eq!(event.key(), BeamKey::new(1.0, 0));
    }
}
