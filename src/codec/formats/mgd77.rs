// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MGD77 underway geophysics records (ids 161 and 173).
//!
//! Fixed 120-character records. Format 161 packs them back to back; format
//! 173 terminates each with CRLF. Record type is the first character:
//!
//! - `1`, `4`: header records, carried as [`UnsupportedRecord`]
//! - `#`: comment
//! - `3`: data record with a two-digit year and 5-digit timezone
//! - `5`: data record with a four-digit year and 3-digit timezone
//!
//! Only navigation and bathymetry map onto the canonical model; magnetics,
//! gravity and seismic columns are dropped on read and written as nulls.

use crate::codec::{ByteCursor, Capabilities, DecodeError, EncodeError, SwathCodec};
use crate::core::time::{calendar, epoch_seconds};
use crate::core::{
    Beam, Flag, FlagState, Position, Record, RecordKind, SurveyPing, UnsupportedRecord,
};

/// Length of one MGD77 record, excluding any line terminator.
pub const RECORD_LEN: usize = 120;

/// Label used for pass-through header records.
pub const HEADER_LABEL: &str = "mgd77_header";

const NULL_FIELD: i64 = 999_999;

/// Codec for MGD77 data.
pub struct Mgd77Codec {
    crlf: bool,
    survey_id: [u8; 8],
    caps: Capabilities,
}

impl Mgd77Codec {
    /// `crlf` selects the line-terminated variant.
    pub fn new(crlf: bool) -> Self {
        Self {
            crlf,
            survey_id: *b"        ",
            caps: Capabilities {
                kinds: vec![
                    RecordKind::Comment,
                    RecordKind::Survey,
                    RecordKind::Unsupported,
                ],
                lossless: false,
                beam_flagging: false,
                text: true,
            },
        }
    }

    /// Survey identifier from the last data record read, reused on write.
    pub fn survey_id(&self) -> String {
        String::from_utf8_lossy(&self.survey_id).trim_end().to_string()
    }

    fn parse_data(&mut self, line: &[u8]) -> Result<Record, DecodeError> {
        let four_digit_year = line[0] == b'5';
        self.survey_id.copy_from_slice(&line[1..9]);

        let mut shift = 9;
        let (year, month, day, hour, minutes) = if four_digit_year {
            let _timezone = int_field(line, &mut shift, 3);
            let year = int_field(line, &mut shift, 4).unwrap_or(0) as i32;
            (
                year,
                int_field(line, &mut shift, 2),
                int_field(line, &mut shift, 2),
                int_field(line, &mut shift, 2),
                int_field(line, &mut shift, 5),
            )
        } else {
            let _timezone = int_field(line, &mut shift, 5).map(|tz| tz / 100);
            let year = fix_y2k(int_field(line, &mut shift, 2).unwrap_or(0) as i32);
            (
                year,
                int_field(line, &mut shift, 2),
                int_field(line, &mut shift, 2),
                int_field(line, &mut shift, 2),
                int_field(line, &mut shift, 5),
            )
        };

        let thousandths = minutes.unwrap_or(0);
        let minute = thousandths / 1000;
        let second = (thousandths - 1000 * minute) as f64 * 60.0 / 1000.0;
        let time = epoch_seconds(
            year,
            month.unwrap_or(1) as u32,
            day.unwrap_or(1) as u32,
            hour.unwrap_or(0) as u32,
            minute as u32,
            second,
        )
        .ok_or_else(|| DecodeError::Malformed(format!("invalid date {year}-{month:?}-{day:?}")))?;

        let lat = signed_field(line, &mut shift, 8).unwrap_or(0) as f64 * 1e-5;
        let lon = signed_field(line, &mut shift, 9).unwrap_or(0) as f64 * 1e-5;
        let _nav_type = int_field(line, &mut shift, 1);
        let _travel_time = int_field(line, &mut shift, 6);
        let bath = int_field(line, &mut shift, 6).map(|v| v as f64 * 0.1);

        let beam = match bath {
            Some(depth) if depth > 0.0 && depth < 99_999.9 => Beam::with_depth(depth),
            _ => Beam {
                flag: Flag::new(FlagState::Null),
                ..Beam::default()
            },
        };

        Ok(Record::Survey(SurveyPing {
            time,
            position: Position::new(lon, lat),
            beams: vec![beam],
            ..SurveyPing::default()
        }))
    }

    fn write_data(&self, ping: &SurveyPing, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        let cal = calendar(ping.time)
            .ok_or_else(|| EncodeError::Invalid(format!("invalid time {}", ping.time)))?;
        let mut line = String::with_capacity(RECORD_LEN);
        line.push('5');
        line.push_str(&String::from_utf8_lossy(&self.survey_id));
        line.push_str("000");
        line.push_str(&format!(
            "{:04}{:02}{:02}{:02}",
            cal.year, cal.month, cal.day, cal.hour
        ));
        let thousandths =
            (f64::from(cal.minute) * 1000.0 + cal.second / 60.0 * 1000.0).round() as i64;
        line.push_str(&format!("{:05}", thousandths.min(59_999)));
        push_signed(&mut line, ping.position.lat, 8);
        push_signed(&mut line, ping.position.lon, 9);
        line.push('1');

        match nadir_depth(ping) {
            Some(depth) => {
                line.push_str(&format!("{NULL_FIELD:06}"));
                line.push_str(&format!("{:06}", (depth * 10.0).round() as i64));
            }
            None => {
                line.push_str(&format!("{NULL_FIELD:06}{NULL_FIELD:06}"));
            }
        }
        // bathymetry correction and type
        line.push_str("999");
        // magnetics, gravity, seismic and nav quality
        for width in [6usize, 6, 6, 1, 5, 6, 7, 6, 5, 5, 6, 1] {
            line.push_str(&"9".repeat(width));
        }

        self.emit(line.as_bytes(), out)
    }

    fn emit(&self, record: &[u8], out: &mut Vec<u8>) -> Result<(), EncodeError> {
        if record.len() != RECORD_LEN {
            return Err(EncodeError::Invalid(format!(
                "MGD77 record must be {RECORD_LEN} bytes, got {}",
                record.len()
            )));
        }
        out.extend_from_slice(record);
        if self.crlf {
            out.extend_from_slice(b"\r\n");
        }
        Ok(())
    }
}

impl SwathCodec for Mgd77Codec {
    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn decode(&mut self, cursor: &mut ByteCursor<'_>) -> Result<Option<Record>, DecodeError> {
        cursor.skip_line_endings();
        if cursor.is_at_end() {
            return Ok(None);
        }
        let start = cursor.position();
        let line = cursor.read_bytes(RECORD_LEN)?;

        let result = match line[0] {
            b'1' | b'4' => Ok(Record::Unsupported(UnsupportedRecord {
                label: HEADER_LABEL.to_string(),
                data: line.to_vec(),
            })),
            b'#' => Ok(Record::comment(
                String::from_utf8_lossy(&line[1..]).trim_end(),
            )),
            b'3' | b'5' => self.parse_data(line),
            other => Err(DecodeError::Malformed(format!(
                "unknown MGD77 record type {:?}",
                other as char
            ))),
        };
        if result.is_err() {
            cursor.seek(start);
        }
        result.map(Some)
    }

    fn encode(&mut self, record: &Record, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        match record {
            Record::Comment { text } => {
                let mut line = Vec::with_capacity(RECORD_LEN);
                line.push(b'#');
                let body = text.as_bytes();
                line.extend_from_slice(&body[..body.len().min(RECORD_LEN - 1)]);
                line.resize(RECORD_LEN, b' ');
                self.emit(&line, out)
            }
            Record::Survey(ping) => self.write_data(ping, out),
            Record::Unsupported(raw) if raw.label == HEADER_LABEL => self.emit(&raw.data, out),
            Record::Unsupported(raw) => Err(EncodeError::Invalid(format!(
                "cannot write foreign record {:?} as MGD77",
                raw.label
            ))),
            other => Err(EncodeError::UnsupportedKind(other.kind())),
        }
    }

    fn resync(&mut self, cursor: &mut ByteCursor<'_>) {
        let skip = cursor.remaining().min(RECORD_LEN);
        let _ = cursor.skip(skip);
        cursor.skip_line_endings();
    }
}

/// Two-digit years before 62 belong to the 2000s.
fn fix_y2k(year: i32) -> i32 {
    if year < 62 {
        year + 2000
    } else {
        year + 1900
    }
}

/// Parse a fixed-width integer column and advance `shift` past it.
///
/// Blank or non-numeric columns yield `None`.
fn int_field(line: &[u8], shift: &mut usize, width: usize) -> Option<i64> {
    let end = (*shift + width).min(line.len());
    let field = line.get(*shift..end)?;
    *shift = end;
    std::str::from_utf8(field).ok()?.trim().parse().ok()
}

/// Like [`int_field`], but a leading `-` consumes one column of the width.
fn signed_field(line: &[u8], shift: &mut usize, width: usize) -> Option<i64> {
    if line.get(*shift) == Some(&b'-') {
        *shift += 1;
        int_field(line, shift, width - 1).map(|v| -v)
    } else {
        int_field(line, shift, width)
    }
}

fn push_signed(line: &mut String, degrees: f64, width: usize) {
    let scaled = (degrees * 1e5).round() as i64;
    if scaled < 0 {
        line.push('-');
        line.push_str(&format!("{:0w$}", -scaled, w = width - 1));
    } else {
        line.push_str(&format!("{:0w$}", scaled, w = width));
    }
}

/// Depth of the usable beam closest to nadir.
fn nadir_depth(ping: &SurveyPing) -> Option<f64> {
    ping.beams
        .iter()
        .filter(|b| b.flag.state.is_usable())
        .filter_map(|b| b.depth.map(|d| (b.across_track.abs(), d)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, d)| d)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Type-5 record: survey 08040005, 2002-09-14 17:45:30, 62.25S 170.5W,
    /// depth 3012.5 m.
    fn type5_record() -> Vec<u8> {
        let mut line = String::new();
        line.push('5');
        line.push_str("08040005");
        line.push_str("000");
        line.push_str("2002091417");
        line.push_str("45500");
        line.push_str("-6225000");
        line.push_str("-17050000");
        line.push('1');
        line.push_str("040165");
        line.push_str("030125");
        line.push_str("599");
        line.push_str(&"9".repeat(60));
        assert_eq!(line.len(), RECORD_LEN);
        line.into_bytes()
    }

    #[test]
    fn test_decode_type5() {
        let mut codec = Mgd77Codec::new(false);
        let data = type5_record();
        let mut cursor = ByteCursor::new(&data);
        let record = codec.decode(&mut cursor).unwrap().unwrap();
        let ping = record.as_survey().unwrap();
        assert_eq!(
            ping.time,
            epoch_seconds(2002, 9, 14, 17, 45, 30.0).unwrap()
        );
        assert!((ping.position.lat + 62.25).abs() < 1e-9);
        assert!((ping.position.lon + 170.5).abs() < 1e-9);
        assert!((ping.beams[0].depth.unwrap() - 3012.5).abs() < 1e-9);
        assert_eq!(codec.survey_id(), "08040005");
        assert_eq!(codec.decode(&mut cursor).unwrap(), None);
    }

    #[test]
    fn test_decode_crlf_with_header_and_comment() {
        let mut data = Vec::new();
        let mut header = b"4".to_vec();
        header.resize(RECORD_LEN, b' ');
        data.extend_from_slice(&header);
        data.extend_from_slice(b"\r\n");
        let mut comment = b"#processed with swathio".to_vec();
        comment.resize(RECORD_LEN, b' ');
        data.extend_from_slice(&comment);
        data.extend_from_slice(b"\r\n");
        data.extend(type5_record());
        data.extend_from_slice(b"\r\n");

        let mut codec = Mgd77Codec::new(true);
        let mut cursor = ByteCursor::new(&data);
        let kinds: Vec<RecordKind> = std::iter::from_fn(|| codec.decode(&mut cursor).unwrap())
            .map(|r| r.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![RecordKind::Unsupported, RecordKind::Comment, RecordKind::Survey]
        );
    }

    #[test]
    fn test_null_bathymetry() {
        let mut data = type5_record();
        data[51..57].copy_from_slice(b"999999");
        let mut codec = Mgd77Codec::new(false);
        let mut cursor = ByteCursor::new(&data);
        let record = codec.decode(&mut cursor).unwrap().unwrap();
        let beam = &record.as_survey().unwrap().beams[0];
        assert_eq!(beam.depth, None);
        assert_eq!(beam.flag.state, FlagState::Null);
    }

    #[test]
    fn test_two_digit_year() {
        let mut line = String::from("3");
        line.push_str("SURVEY01");
        line.push_str("-0500");
        line.push_str("99123123");
        line.push_str("59000");
        line.push_str("01000000");
        line.push_str("002000000");
        line.push('1');
        line.push_str("999999999999999");
        line.push_str(&"9".repeat(60));
        assert_eq!(line.len(), RECORD_LEN);

        let mut codec = Mgd77Codec::new(false);
        let mut cursor = ByteCursor::new(line.as_bytes());
        let ping = codec.decode(&mut cursor).unwrap().unwrap();
        let cal = calendar(ping.time().unwrap()).unwrap();
        assert_eq!((cal.year, cal.month, cal.day, cal.hour), (1999, 12, 31, 23));
        assert_eq!(cal.minute, 59);
    }

    #[test]
    fn test_encode_then_decode_keeps_nav_and_depth() {
        let mut reader = Mgd77Codec::new(true);
        let data = type5_record();
        let mut cursor = ByteCursor::new(&data);
        let original = reader.decode(&mut cursor).unwrap().unwrap();

        let mut out = Vec::new();
        reader.encode(&original, &mut out).unwrap();
        assert_eq!(out.len(), RECORD_LEN + 2);
        assert_eq!(&out[RECORD_LEN..], b"\r\n");

        let mut again = Mgd77Codec::new(true);
        let mut cursor = ByteCursor::new(&out);
        let decoded = again.decode(&mut cursor).unwrap().unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_unknown_type_rewinds() {
        let mut data = type5_record();
        data[0] = b'X';
        let mut codec = Mgd77Codec::new(false);
        let mut cursor = ByteCursor::new(&data);
        assert!(codec.decode(&mut cursor).is_err());
        assert_eq!(cursor.position(), 0);
        codec.resync(&mut cursor);
        assert!(cursor.is_at_end());
    }
}
