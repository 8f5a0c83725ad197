// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Canonical record model.
//!
//! Every codec decodes into, and encodes from, these types. Downstream tools
//! only ever see a [`Record`]; the on-disk layout stays inside the codec.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::flag::Flag;

/// Discriminant of a [`Record`], used in codec capability sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Comment,
    Survey,
    Nav,
    SensorAux,
    Unsupported,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Comment,
        RecordKind::Survey,
        RecordKind::Nav,
        RecordKind::SensorAux,
        RecordKind::Unsupported,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Comment => "comment",
            RecordKind::Survey => "survey",
            RecordKind::Nav => "nav",
            RecordKind::SensorAux => "sensor_aux",
            RecordKind::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// One sounding within a ping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Beam {
    /// Depth below the sea surface in metres, positive down.
    pub depth: Option<f64>,
    pub amplitude: Option<f64>,
    /// Across-track offset from the sensor in metres, starboard positive.
    pub across_track: f64,
    /// Along-track offset from the sensor in metres, forward positive.
    pub along_track: f64,
    pub flag: Flag,
}

impl Beam {
    /// Beam with a depth value and zero offsets.
    pub fn with_depth(depth: f64) -> Self {
        Self {
            depth: Some(depth),
            ..Self::default()
        }
    }
}

/// One survey ping: a timestamped swath of beams.
///
/// Beam order is stable; the index of a beam within `beams` is the key edit
/// events use to address it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SurveyPing {
    /// Seconds since 1970-01-01T00:00:00Z.
    pub time: f64,
    pub position: Position,
    /// Heading in degrees clockwise from north.
    pub heading: f64,
    /// Speed over ground in km/h.
    pub speed: f64,
    /// Sensor depth below the surface in metres.
    pub sensor_depth: f64,
    pub heave: f64,
    pub beams: Vec<Beam>,
}

/// Navigation fix without soundings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NavFix {
    pub time: f64,
    pub position: Position,
    pub heading: f64,
    pub speed: f64,
    pub sensor_depth: f64,
}

/// Auxiliary sensor sample (attitude, sound speed, tide...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorAux {
    pub time: f64,
    pub sensor: String,
    pub values: Vec<f64>,
}

/// Vendor record the canonical model has no slot for, carried opaquely.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnsupportedRecord {
    pub label: String,
    pub data: Vec<u8>,
}

/// A canonical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Comment { text: String },
    Survey(SurveyPing),
    Nav(NavFix),
    SensorAux(SensorAux),
    Unsupported(UnsupportedRecord),
}

impl Record {
    pub fn comment(text: impl Into<String>) -> Self {
        Record::Comment { text: text.into() }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Comment { .. } => RecordKind::Comment,
            Record::Survey(_) => RecordKind::Survey,
            Record::Nav(_) => RecordKind::Nav,
            Record::SensorAux(_) => RecordKind::SensorAux,
            Record::Unsupported(_) => RecordKind::Unsupported,
        }
    }

    /// Timestamp for timed record kinds.
    pub fn time(&self) -> Option<f64> {
        match self {
            Record::Survey(ping) => Some(ping.time),
            Record::Nav(nav) => Some(nav.time),
            Record::SensorAux(aux) => Some(aux.time),
            Record::Comment { .. } | Record::Unsupported(_) => None,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Record::Survey(ping) => Some(ping.position),
            Record::Nav(nav) => Some(nav.position),
            _ => None,
        }
    }

    pub fn position_mut(&mut self) -> Option<&mut Position> {
        match self {
            Record::Survey(ping) => Some(&mut ping.position),
            Record::Nav(nav) => Some(&mut nav.position),
            _ => None,
        }
    }

    pub fn as_survey(&self) -> Option<&SurveyPing> {
        match self {
            Record::Survey(ping) => Some(ping),
            _ => None,
        }
    }

    pub fn as_survey_mut(&mut self) -> Option<&mut SurveyPing> {
        match self {
            Record::Survey(ping) => Some(ping),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flag::FlagState;

    #[test]
    fn test_kind_and_time() {
        let ping = Record::Survey(SurveyPing {
            time: 12.5,
            ..SurveyPing::default()
        });
        assert_eq!(ping.kind(), RecordKind::Survey);
        assert_eq!(ping.time(), Some(12.5));

        let comment = Record::comment("hello");
        assert_eq!(comment.kind(), RecordKind::Comment);
        assert_eq!(comment.time(), None);
        assert!(comment.position().is_none());
    }

    #[test]
    fn test_position_mut() {
        let mut nav = Record::Nav(NavFix::default());
        if let Some(pos) = nav.position_mut() {
            pos.lon = 200.0;
        }
        assert_eq!(nav.position().map(|p| p.lon), Some(200.0));
    }

    #[test]
    fn test_json_tagging() {
        let record = Record::Survey(SurveyPing {
            time: 1.0,
            beams: vec![Beam::with_depth(10.0)],
            ..SurveyPing::default()
        });
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"kind\":\"survey\""));
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(
            back.as_survey().unwrap().beams[0].flag.state,
            FlagState::Good
        );
    }
}
