// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Round-trip tests through sessions for the built-in codecs.

mod common;

use common::{mgd77_record, mixed_records, scratch, survey_ping, write_file};
use swathio::io::{Direction, ReadMode, SessionOptions, SwathSession};
use swathio::{FlagState, Record, RecordKind, SwathError};

fn write_all(path: &std::path::Path, format: i32, records: &[Record]) {
    let mut session =
        SwathSession::open(path, format, Direction::Write, &SessionOptions::default()).unwrap();
    for record in records {
        session.write_record(record).unwrap();
    }
    session.close().unwrap();
}

fn read_all(path: &std::path::Path, format: i32) -> Vec<Record> {
    let mut session =
        SwathSession::open(path, format, Direction::Read, &SessionOptions::default()).unwrap();
    session
        .records(ReadMode::Strict)
        .collect::<swathio::Result<Vec<_>>>()
        .unwrap()
}

// ============================================================================
// Lossless Format
// ============================================================================

#[test]
fn test_ldeoih_preserves_every_kind() {
    let (dir, _guard) = scratch("rt_ldeoih");
    let path = dir.join("line0001.mb71");
    let records = mixed_records();
    write_all(&path, 71, &records);
    assert_eq!(read_all(&path, 71), records);
}

#[test]
fn test_ldeoih_preserves_flag_provenance() {
    let (dir, _guard) = scratch("rt_provenance");
    let path = dir.join("flags.mb71");
    let records = mixed_records();
    write_all(&path, 71, &records);

    let back = read_all(&path, 71);
    let ping = back[4].as_survey().unwrap();
    assert_eq!(ping.beams[1].flag.state, FlagState::FlaggedManual);
    let provenance = ping.beams[1].flag.provenance.as_ref().unwrap();
    assert_eq!(provenance.tool, "mbedit");
    assert_eq!(ping.beams[3].depth, None);
}

#[test]
fn test_ldeoih_skips_corrupt_record() {
    let (dir, _guard) = scratch("rt_corrupt");
    let path = dir.join("corrupt.mb71");
    let records = vec![
        survey_ping(10.0, 1.0, 2.0, 3),
        survey_ping(11.0, 1.0, 2.0, 3),
        survey_ping(12.0, 1.0, 2.0, 3),
    ];
    write_all(&path, 71, &records);

    let mut bytes = std::fs::read(&path).unwrap();
    let record_len = bytes.len() / 3;
    bytes[record_len + 20] ^= 0x55;
    std::fs::write(&path, &bytes).unwrap();

    let mut session =
        SwathSession::open(&path, 71, Direction::Read, &SessionOptions::default()).unwrap();
    let times: Vec<f64> = session
        .records(ReadMode::Skip)
        .map(|r| r.unwrap().time().unwrap())
        .collect();
    assert_eq!(times, vec![10.0, 12.0]);
    assert!(session.stats().records_skipped >= 1);

    let mut strict =
        SwathSession::open(&path, 71, Direction::Read, &SessionOptions::default()).unwrap();
    strict.read_next_record(ReadMode::Strict).unwrap();
    match strict.read_next_record(ReadMode::Strict) {
        Err(SwathError::RecordDecodeError { offset, .. }) => assert_eq!(offset, record_len as u64),
        other => panic!("expected decode error, got {other:?}"),
    }
}

// ============================================================================
// Lossy Text Formats
// ============================================================================

#[test]
fn test_mgd77_to_ldeoih_and_back() {
    let (dir, _guard) = scratch("rt_mgd77");
    let mut text = String::new();
    for depth in [30125u32, 30250, 999999] {
        text.push_str(&mgd77_record("NBP0209 ", depth));
        text.push_str("\r\n");
    }
    let input = write_file(&dir, "NBP0209.a77", &text);

    let records = read_all(&input, 173);
    assert_eq!(records.len(), 3);
    let first = records[0].as_survey().unwrap();
    assert!((first.position.lon + 62.4).abs() < 1e-9);
    assert!((first.position.lat + 58.12).abs() < 1e-9);
    assert_eq!(first.beams[0].depth, Some(3012.5));
    assert_eq!(
        records[2].as_survey().unwrap().beams[0].flag.state,
        FlagState::Null
    );

    let binary = dir.join("NBP0209.mb71");
    write_all(&binary, 71, &records);
    assert_eq!(read_all(&binary, 71), records);

    let output = dir.join("copy.a77");
    write_all(&output, 173, &read_all(&binary, 71));
    let again = read_all(&output, 173);
    assert_eq!(again.len(), 3);
    assert_eq!(again[1].as_survey().unwrap().beams[0].depth, Some(3025.0));
}

#[test]
fn test_xyz_writes_usable_beams_only() {
    let (dir, _guard) = scratch("rt_xyz");
    let path = dir.join("soundings.xyz");
    let mut ping = survey_ping(0.0, 10.5, -20.25, 3);
    if let Some(p) = ping.as_survey_mut() {
        p.beams[1].flag.state = FlagState::FlaggedFilter;
    }
    write_all(&path, 162, &[Record::comment("grid input"), ping]);

    let records = read_all(&path, 162);
    let kinds: Vec<RecordKind> = records.iter().map(Record::kind).collect();
    assert_eq!(
        kinds,
        vec![RecordKind::Comment, RecordKind::Survey, RecordKind::Survey]
    );
    assert_eq!(records[2].as_survey().unwrap().beams[0].depth, Some(2003.0));
}

#[test]
fn test_lonflip_applied_on_read() {
    let (dir, _guard) = scratch("rt_lonflip");
    let path = write_file(&dir, "east.xyz", "190.0 10.0 50.0\n-10.0 10.0 60.0\n");
    let options = SessionOptions {
        lonflip: "positive".parse().unwrap(),
        ..SessionOptions::default()
    };
    let mut session = SwathSession::open(&path, 162, Direction::Read, &options).unwrap();
    let lons: Vec<f64> = session
        .records(ReadMode::Strict)
        .map(|r| r.unwrap().position().unwrap().lon)
        .collect();
    assert_eq!(lons, vec![190.0, 350.0]);
}
