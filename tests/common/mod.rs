// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use swathio::core::{Beam, Flag, FlagState, NavFix, Position, Record, SensorAux, SurveyPing};

// ============================================================================
// Temporary Directories
// ============================================================================

/// Unique scratch directory for one test.
pub fn temp_dir(tag: &str) -> PathBuf {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let thread_id = format!("{:?}", std::thread::current().id());
    std::env::temp_dir().join(format!(
        "swathio_{}_{}_{}_{}",
        tag,
        std::process::id(),
        thread_id.replace(['(', ')'], ""),
        random
    ))
}

/// Removes its directory on drop.
#[derive(Debug)]
pub struct CleanupGuard(pub PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Create a scratch directory and its cleanup guard.
pub fn scratch(tag: &str) -> (PathBuf, CleanupGuard) {
    let dir = temp_dir(tag);
    fs::create_dir_all(&dir).unwrap();
    (dir.clone(), CleanupGuard(dir))
}

/// Write `content` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// Record Builders
// ============================================================================

/// Survey ping with `beams` beams of increasing depth.
pub fn survey_ping(time: f64, lon: f64, lat: f64, beams: usize) -> Record {
    Record::Survey(SurveyPing {
        time,
        position: Position::new(lon, lat),
        heading: 47.5,
        speed: 8.2,
        sensor_depth: 4.25,
        heave: -0.12,
        beams: (0..beams)
            .map(|i| Beam {
                depth: Some(2000.0 + i as f64 * 1.5),
                amplitude: Some(20.0 + i as f64),
                across_track: (i as f64 - beams as f64 / 2.0) * 12.5,
                along_track: 0.25,
                flag: Flag::default(),
            })
            .collect(),
    })
}

/// One record of every kind.
pub fn mixed_records() -> Vec<Record> {
    let mut flagged = survey_ping(1_000_000_010.0, -62.5, -58.25, 5);
    if let Some(ping) = flagged.as_survey_mut() {
        ping.beams[1].flag = Flag::changed_by(FlagState::FlaggedManual, "mbedit", 1_700_000_000.0);
        ping.beams[3].depth = None;
        ping.beams[3].flag = Flag::new(FlagState::Null);
    }
    vec![
        Record::comment("Survey NBP0209 leg 2"),
        survey_ping(1_000_000_000.0, -62.4, -58.2, 5),
        Record::Nav(NavFix {
            time: 1_000_000_005.0,
            position: Position::new(-62.45, -58.22),
            heading: 48.0,
            speed: 8.0,
            sensor_depth: 4.2,
        }),
        Record::SensorAux(SensorAux {
            time: 1_000_000_006.0,
            sensor: "svp".to_string(),
            values: vec![1480.5, 1479.25],
        }),
        flagged,
    ]
}

/// Text of a 120-byte MGD77 data record (type 5) with the given depth.
pub fn mgd77_record(survey: &str, depth_decimeters: u32) -> String {
    let mut line = String::new();
    line.push('5');
    line.push_str(&format!("{survey:<8}"));
    line.push_str("+00");
    line.push_str("2004");
    line.push_str("0312");
    line.push_str("08");
    line.push_str("30000");
    line.push_str("-5812000");
    line.push_str("-06240000");
    line.push('1');
    line.push_str("999999");
    line.push_str(&format!("{depth_decimeters:06}"));
    while line.len() < 120 {
        line.push('9');
    }
    line
}
