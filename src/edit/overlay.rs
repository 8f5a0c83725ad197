// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Apply replayed beam edits onto streamed records.

use crate::core::{Record, Result, SwathError};

use super::engine::{replay, snap_events, BeamStates};
use super::event::EditEvent;
use super::DEFAULT_TIME_TOLERANCE;

/// Edited beams matched onto survey pings by time.
///
/// Ping times are matched within `tolerance` seconds, since many formats
/// round timestamps; when several edited times fall in the window the
/// closest one wins. Event times are snapped onto the base with the same
/// rule before replay. Beams are matched by index. Only beams named by an
/// event are touched.
#[derive(Debug, Clone)]
pub struct EditOverlay {
    /// State of each edited beam before the first event.
    starting: BeamStates,
    /// State of each edited beam after the last event.
    edited: BeamStates,
    tolerance: f64,
}

impl EditOverlay {
    /// Replay `events` over `base` with the default time tolerance.
    ///
    /// # Errors
    ///
    /// `StaleEditConflict` if the events do not replay over `base`.
    pub fn new(base: &BeamStates, events: &[EditEvent]) -> Result<Self> {
        Self::with_tolerance(base, events, DEFAULT_TIME_TOLERANCE)
    }

    pub fn with_tolerance(
        base: &BeamStates,
        events: &[EditEvent],
        tolerance: f64,
    ) -> Result<Self> {
        let tolerance = tolerance.abs();
        let events = snap_events(base, events, tolerance);
        let replayed = replay(base, &events)?;

        let mut starting = BeamStates::new();
        let mut edited = BeamStates::new();
        for event in &events {
            let (time, beam) = (event.timestamp, event.beam);
            starting.set(time, beam, base.flag(time, beam));
            edited.set(time, beam, replayed.flag(time, beam));
        }
        Ok(Self {
            starting,
            edited,
            tolerance,
        })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Final state of every edited beam.
    pub fn edited(&self) -> &BeamStates {
        &self.edited
    }

    /// Overwrite the flags of edited beams in `record`.
    ///
    /// Returns how many beams changed primary state. Records other than
    /// survey pings are left alone.
    ///
    /// # Errors
    ///
    /// `StaleEditConflict` if an edited beam's current state is not the state
    /// the edits started from; the record is left unchanged.
    pub fn apply(&self, record: &mut Record) -> Result<usize> {
        let Some(ping) = record.as_survey_mut() else {
            return Ok(0);
        };
        let Some(matched) = self.edited.closest_time(ping.time, self.tolerance) else {
            return Ok(0);
        };

        let edits: Vec<_> = self
            .edited
            .range(matched..=matched)
            .filter(|(key, _)| key.beam < ping.beams.len())
            .collect();

        for (key, _) in &edits {
            let expected = self.starting.state(key.time, key.beam);
            let found = ping.beams[key.beam].flag.state;
            if found != expected {
                return Err(SwathError::StaleEditConflict {
                    timestamp: ping.time,
                    beam: key.beam,
                    expected,
                    found,
                });
            }
        }

        let mut changed = 0;
        for (key, flag) in edits {
            let beam = &mut ping.beams[key.beam];
            if beam.flag.state != flag.state {
                changed += 1;
            }
            beam.flag = flag.clone();
        }
        Ok(changed)
    }
}
