// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Plain ASCII sounding tables (ids 162, 163, 168, 169).
//!
//! One sounding per line, three numeric columns separated by whitespace or
//! commas. Lines starting with `#` are comments. Each sounding decodes to a
//! single-beam survey record with time zero; encoding writes one line per
//! usable beam at the ping position, so round trips are lossy.

use std::io::Write as _;

use crate::codec::{ByteCursor, Capabilities, DecodeError, EncodeError, SwathCodec};
use crate::core::{Beam, Position, Record, RecordKind, SurveyPing};

/// Column layout of an ASCII table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XyzLayout {
    /// `lon lat depth`
    LonLatDepth,
    /// `lat lon depth`
    LatLonDepth,
    /// `lon lat topography`, topography = -depth
    LonLatTopo,
    /// `lat lon topography`
    LatLonTopo,
}

impl XyzLayout {
    fn lat_first(self) -> bool {
        matches!(self, XyzLayout::LatLonDepth | XyzLayout::LatLonTopo)
    }

    fn topography(self) -> bool {
        matches!(self, XyzLayout::LonLatTopo | XyzLayout::LatLonTopo)
    }
}

/// Codec for ASCII sounding tables.
pub struct XyzCodec {
    layout: XyzLayout,
    caps: Capabilities,
}

impl XyzCodec {
    pub fn new(layout: XyzLayout) -> Self {
        Self {
            layout,
            caps: Capabilities {
                kinds: vec![RecordKind::Comment, RecordKind::Survey],
                lossless: false,
                beam_flagging: false,
                text: true,
            },
        }
    }

    pub fn layout(&self) -> XyzLayout {
        self.layout
    }

    fn parse_line(&self, line: &str) -> Result<Record, DecodeError> {
        let fields: Vec<f64> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f64>()
                    .map_err(|_| DecodeError::Malformed(format!("not a number: {s:?}")))
            })
            .collect::<Result<_, _>>()?;
        if fields.len() < 3 {
            return Err(DecodeError::Malformed(format!(
                "expected 3 columns, found {}",
                fields.len()
            )));
        }

        let (lon, lat) = if self.layout.lat_first() {
            (fields[1], fields[0])
        } else {
            (fields[0], fields[1])
        };
        let depth = if self.layout.topography() {
            -fields[2]
        } else {
            fields[2]
        };

        Ok(Record::Survey(SurveyPing {
            position: Position::new(lon, lat),
            beams: vec![Beam::with_depth(depth)],
            ..SurveyPing::default()
        }))
    }
}

impl SwathCodec for XyzCodec {
    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn decode(&mut self, cursor: &mut ByteCursor<'_>) -> Result<Option<Record>, DecodeError> {
        loop {
            let start = cursor.position();
            let Some(raw) = cursor.read_line() else {
                return Ok(None);
            };
            let line = String::from_utf8_lossy(raw);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(text) = line.strip_prefix('#') {
                return Ok(Some(Record::comment(text.trim_start())));
            }
            return match self.parse_line(line) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    cursor.seek(start);
                    Err(e)
                }
            };
        }
    }

    fn encode(&mut self, record: &Record, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        let io_err = |e: std::io::Error| EncodeError::Invalid(e.to_string());
        match record {
            Record::Comment { text } => {
                for line in text.lines() {
                    writeln!(out, "# {line}").map_err(io_err)?;
                }
                Ok(())
            }
            Record::Survey(ping) => {
                let (first, second) = if self.layout.lat_first() {
                    (ping.position.lat, ping.position.lon)
                } else {
                    (ping.position.lon, ping.position.lat)
                };
                for beam in &ping.beams {
                    let Some(depth) = beam.depth else { continue };
                    if !beam.flag.state.is_usable() {
                        continue;
                    }
                    let value = if self.layout.topography() {
                        -depth
                    } else {
                        depth
                    };
                    writeln!(out, "{first:.7}\t{second:.7}\t{value:.3}").map_err(io_err)?;
                }
                Ok(())
            }
            other => Err(EncodeError::UnsupportedKind(other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Flag, FlagState};

    fn decode_all(codec: &mut XyzCodec, data: &[u8]) -> Vec<Record> {
        let mut cursor = ByteCursor::new(data);
        let mut out = Vec::new();
        while let Some(record) = codec.decode(&mut cursor).unwrap() {
            out.push(record);
        }
        out
    }

    #[test]
    fn test_decode_lon_lat_depth() {
        let mut codec = XyzCodec::new(XyzLayout::LonLatDepth);
        let records = decode_all(&mut codec, b"# header\n\n-170.5 -62.25 3012.5\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record::comment("header"));
        let ping = records[1].as_survey().unwrap();
        assert_eq!(ping.position, Position::new(-170.5, -62.25));
        assert_eq!(ping.beams[0].depth, Some(3012.5));
    }

    #[test]
    fn test_decode_lat_first_topography() {
        let mut codec = XyzCodec::new(XyzLayout::LatLonTopo);
        let records = decode_all(&mut codec, b"10.0,20.0,-55.5\r\n");
        let ping = records[0].as_survey().unwrap();
        assert_eq!(ping.position, Position::new(20.0, 10.0));
        assert_eq!(ping.beams[0].depth, Some(55.5));
    }

    #[test]
    fn test_malformed_line_rewinds() {
        let mut codec = XyzCodec::new(XyzLayout::LonLatDepth);
        let data = b"1 2 x\n3 4 5\n";
        let mut cursor = ByteCursor::new(data);
        assert!(codec.decode(&mut cursor).is_err());
        assert_eq!(cursor.position(), 0);
        codec.resync(&mut cursor);
        let ping = codec.decode(&mut cursor).unwrap().unwrap();
        assert_eq!(ping.as_survey().unwrap().beams[0].depth, Some(5.0));
    }

    #[test]
    fn test_encode_skips_flagged_and_null_beams() {
        let mut codec = XyzCodec::new(XyzLayout::LonLatTopo);
        let ping = Record::Survey(SurveyPing {
            position: Position::new(1.0, 2.0),
            beams: vec![
                Beam::with_depth(100.0),
                Beam {
                    depth: Some(200.0),
                    flag: Flag::new(FlagState::FlaggedFilter),
                    ..Beam::default()
                },
                Beam::default(),
            ],
            ..SurveyPing::default()
        });
        let mut out = Vec::new();
        codec.encode(&ping, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1.0000000\t2.0000000\t-100.000\n"
        );
    }

    #[test]
    fn test_encode_rejects_nav() {
        let mut codec = XyzCodec::new(XyzLayout::LonLatDepth);
        let mut out = Vec::new();
        assert_eq!(
            codec.encode(&Record::Nav(Default::default()), &mut out),
            Err(EncodeError::UnsupportedKind(RecordKind::Nav))
        );
    }
}
