// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Derived beam states and deterministic replay.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::core::{Flag, FlagState, Record, Result, SwathError};

use super::event::{BeamKey, EditEvent};

/// Current flag of every addressed beam.
///
/// Beams without an entry are Good, their state at ingestion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeamStates {
    flags: BTreeMap<BeamKey, Flag>,
}

impl BeamStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one record's beams.
    pub fn capture(record: &Record) -> Self {
        let mut states = Self::new();
        states.capture_record(record);
        states
    }

    /// Add a record's beams to the snapshot. Non-survey records are ignored.
    pub fn capture_record(&mut self, record: &Record) {
        if let Some(ping) = record.as_survey() {
            for (beam, b) in ping.beams.iter().enumerate() {
                self.flags.insert(BeamKey::new(ping.time, beam), b.flag.clone());
            }
        }
    }

    pub fn state(&self, timestamp: f64, beam: usize) -> FlagState {
        self.flags
            .get(&BeamKey::new(timestamp, beam))
            .map_or(FlagState::Good, |flag| flag.state)
    }

    pub fn flag(&self, timestamp: f64, beam: usize) -> Flag {
        self.flags
            .get(&BeamKey::new(timestamp, beam))
            .cloned()
            .unwrap_or_default()
    }

    pub fn set(&mut self, timestamp: f64, beam: usize, flag: Flag) {
        self.flags.insert(BeamKey::new(timestamp, beam), flag);
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// `StaleEditConflict` when the current state differs from the event's
    /// `previous` state; nothing is changed.
    pub fn apply(&mut self, event: &EditEvent) -> Result<()> {
        let found = self.state(event.timestamp, event.beam);
        if found != event.previous {
            return Err(SwathError::StaleEditConflict {
                timestamp: event.timestamp,
                beam: event.beam,
                expected: event.previous,
                found,
            });
        }
        self.flags.insert(
            event.key(),
            Flag::changed_by(event.new, event.tool.clone(), event.applied_at),
        );
        Ok(())
    }

    /// Entries with ping times inside `times`, in key order. Reversed bounds
    /// are swapped.
    pub fn range(&self, times: RangeInclusive<f64>) -> impl Iterator<Item = (&BeamKey, &Flag)> {
        let (mut lo, mut hi) = times.into_inner();
        if lo.total_cmp(&hi).is_gt() {
            std::mem::swap(&mut lo, &mut hi);
        }
        self.flags
            .range(BeamKey::new(lo, 0)..=BeamKey::new(hi, usize::MAX))
    }

    /// Stored ping time closest to `time`, if one lies within `tolerance`
    /// seconds.
    pub fn closest_time(&self, time: f64, tolerance: f64) -> Option<f64> {
        let tolerance = tolerance.abs();
        self.range((time - tolerance)..=(time + tolerance))
            .map(|(key, _)| key.time)
            .min_by(|a, b| (a - time).abs().total_cmp(&(b - time).abs()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BeamKey, &Flag)> {
        self.flags.iter()
    }

    /// Beams whose state is anything but Good.
    pub fn flagged(&self) -> impl Iterator<Item = (&BeamKey, &Flag)> {
        self.flags
            .iter()
            .filter(|(_, flag)| flag.state != FlagState::Good)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Compare primary states only, treating missing entries as Good.
    pub fn same_states(&self, other: &BeamStates) -> bool {
        let covers = |a: &BeamStates, b: &BeamStates| {
            a.flags
                .iter()
                .all(|(key, flag)| b.state(key.time, key.beam) == flag.state)
        };
        covers(self, other) && covers(other, self)
    }
}

/// Apply `events` in order on top of `base`.
///
/// The same base and events always give the same result. `base` is left
/// untouched, including on error.
///
/// # Errors
///
/// `StaleEditConflict` for the first event whose `previous` state does not
/// match.
pub fn replay(base: &BeamStates, events: &[EditEvent]) -> Result<BeamStates> {
    let mut states = base.clone();
    for event in events {
        states.apply(event)?;
    }
    Ok(states)
}

/// Copy of `events` with each ping time moved to the closest ping time of
/// `base` within `tolerance` seconds. Events with no ping in range keep
/// their own time.
pub fn snap_events(base: &BeamStates, events: &[EditEvent], tolerance: f64) -> Vec<EditEvent> {
    events
        .iter()
        .map(|event| {
            let mut event = event.clone();
            if let Some(time) = base.closest_time(event.timestamp, tolerance) {
                event.timestamp = time;
            }
            event
        })
        .collect()
}

/// [`replay`] after [`snap_events`], for edits made against files whose
/// formats round ping times.
///
/// # Errors
///
/// `StaleEditConflict` as for [`replay`].
pub fn replay_within(
    base: &BeamStates,
    events: &[EditEvent],
    tolerance: f64,
) -> Result<BeamStates> {
    replay(base, &snap_events(base, events, tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Beam, SurveyPing};

    fn event(timestamp: f64, beam: usize, previous: FlagState, new: FlagState) -> EditEvent {
        EditEvent {
            timestamp,
            beam,
            previous,
            new,
            tool: "mbclean".to_string(),
            applied_at: 1_700_000_000.0,
        }
    }

    #[test]
    fn test_absent_is_good() {
        let states = BeamStates::new();
        assert_eq!(states.state(1.0, 3), FlagState::Good);
        assert_eq!(states.flag(1.0, 3), Flag::default());
    }

    #[test]
    fn test_replay_is_deterministic() {
        let events = vec![
            event(10.0, 1, FlagState::Good, FlagState::FlaggedManual),
            event(10.0, 2, FlagState::Good, FlagState::FlaggedFilter),
            event(10.0, 1, FlagState::FlaggedManual, FlagState::Good),
            event(11.0, 0, FlagState::Good, FlagState::FlaggedSensor),
        ];
        let base = BeamStates::new();
        let a = replay(&base, &events).unwrap();
        let b = replay(&base, &events).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.state(10.0, 1), FlagState::Good);
        assert_eq!(a.state(10.0, 2), FlagState::FlaggedFilter);
        assert_eq!(a.state(11.0, 0), FlagState::FlaggedSensor);
        assert_eq!(a.flagged().count(), 2);

        let provenance = a.flag(10.0, 2).provenance.unwrap();
        assert_eq!(provenance.tool, "mbclean");
    }

    #[test]
    fn test_reapply_conflicts() {
        let events = vec![event(10.0, 1, FlagState::Good, FlagState::FlaggedManual)];
        let once = replay(&BeamStates::new(), &events).unwrap();
        match replay(&once, &events) {
            Err(SwathError::StaleEditConflict {
                beam,
                expected,
                found,
                ..
            }) => {
                assert_eq!(beam, 1);
                assert_eq!(expected, FlagState::Good);
                assert_eq!(found, FlagState::FlaggedManual);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        // base untouched on error
        assert_eq!(once.state(10.0, 1), FlagState::FlaggedManual);
    }

    #[test]
    fn test_capture_record() {
        let record = Record::Survey(SurveyPing {
            time: 5.0,
            beams: vec![
                Beam::with_depth(10.0),
                Beam {
                    flag: Flag::new(FlagState::Null),
                    ..Beam::default()
                },
            ],
            ..SurveyPing::default()
        });
        let states = BeamStates::capture(&record);
        assert_eq!(states.len(), 2);
        assert_eq!(states.state(5.0, 1), FlagState::Null);

        let events = vec![event(5.0, 1, FlagState::Good, FlagState::FlaggedManual)];
        assert!(replay(&states, &events).is_err());
        assert!(BeamStates::capture(&Record::comment("x")).is_empty());
    }

    #[test]
    fn test_same_states_ignores_provenance() {
        let mut a = BeamStates::new();
        a.set(1.0, 0, Flag::changed_by(FlagState::FlaggedManual, "a", 1.0));
        a.set(1.0, 1, Flag::new(FlagState::Good));
        let mut b = BeamStates::new();
        b.set(1.0, 0, Flag::changed_by(FlagState::FlaggedManual, "b", 2.0));
        assert!(a.same_states(&b));
        b.set(2.0, 0, Flag::new(FlagState::Null));
        assert!(!a.same_states(&b));
    }

    #[test]
    fn test_replay_within_snaps_to_captured_ping() {
        let mut base = BeamStates::new();
        base.set(100.0, 0, Flag::new(FlagState::FlaggedSensor));
        base.set(100.0, 1, Flag::new(FlagState::Good));

        let stale = vec![event(100.00005, 0, FlagState::Good, FlagState::FlaggedManual)];
        assert!(replay(&base, &stale).is_ok());
        assert!(matches!(
            replay_within(&base, &stale, 0.00011),
            Err(SwathError::StaleEditConflict { beam: 0, .. })
        ));

        let fresh = vec![event(99.99995, 1, FlagState::Good, FlagState::FlaggedManual)];
        let states = replay_within(&base, &fresh, 0.00011).unwrap();
        assert_eq!(states.state(100.0, 1), FlagState::FlaggedManual);
        assert_eq!(states.len(), 2);
    }

    #[test]
    fn test_closest_time() {
        let mut states = BeamStates::new();
        states.set(10.0, 0, Flag::default());
        states.set(10.00008, 3, Flag::default());
        assert_eq!(states.closest_time(10.00007, 0.0001), Some(10.00008));
        assert_eq!(states.closest_time(10.00002, 0.0001), Some(10.0));
        assert_eq!(states.closest_time(11.0, 0.0001), None);
    }

    #[test]
    fn test_range() {
        let mut states = BeamStates::new();
        states.set(1.0, 0, Flag::new(FlagState::Null));
        states.set(2.0, 4, Flag::new(FlagState::Null));
        states.set(3.0, 1, Flag::new(FlagState::Null));
        let keys: Vec<BeamKey> = states.range(1.5..=2.5).map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![BeamKey::new(2.0, 4)]);
    }
}
