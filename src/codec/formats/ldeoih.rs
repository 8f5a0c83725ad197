// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Generic in-house swath format (id 71).
//!
//! Binary, big-endian, one framed record at a time:
//!
//! ```text
//! +-------+------+----------+-------------+---------+--------+
//! | "LH"  | kind | reserved | payload len | payload | crc32  |
//! | 2 B   | u8   | u8       | u32         | N bytes | u32    |
//! +-------+------+----------+-------------+---------+--------+
//! ```
//!
//! The CRC covers the payload only. The payload stores every field of the
//! canonical model, flags and provenance included, so round trips are
//! lossless for all record kinds.

use byteorder::{BigEndian, WriteBytesExt};

use crate::codec::{ByteCursor, Capabilities, DecodeError, EncodeError, SwathCodec};
use crate::core::{
    Beam, Flag, FlagState, NavFix, Position, Provenance, Record, RecordKind, SensorAux,
    SurveyPing, UnsupportedRecord,
};

/// Frame sync bytes.
pub const SYNC: [u8; 2] = *b"LH";

const FRAME_HEADER_LEN: usize = 8;

const KIND_COMMENT: u8 = 1;
const KIND_SURVEY: u8 = 2;
const KIND_NAV: u8 = 3;
const KIND_SENSOR_AUX: u8 = 4;
const KIND_UNSUPPORTED: u8 = 5;

const HAS_DEPTH: u8 = 0x01;
const HAS_AMPLITUDE: u8 = 0x02;
const HAS_PROVENANCE: u8 = 0x04;

/// Codec for the in-house binary format.
pub struct LdeoihCodec {
    caps: Capabilities,
}

impl LdeoihCodec {
    pub fn new() -> Self {
        Self {
            caps: Capabilities {
                kinds: RecordKind::ALL.to_vec(),
                lossless: true,
                beam_flagging: true,
                text: false,
            },
        }
    }
}

impl Default for LdeoihCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl SwathCodec for LdeoihCodec {
    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn decode(&mut self, cursor: &mut ByteCursor<'_>) -> Result<Option<Record>, DecodeError> {
        if cursor.is_at_end() {
            return Ok(None);
        }
        let start = cursor.position();
        let result = decode_frame(cursor);
        if result.is_err() {
            cursor.seek(start);
        }
        result.map(Some)
    }

    fn encode(&mut self, record: &Record, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        let mut payload = Vec::new();
        let kind = match record {
            Record::Comment { text } => {
                payload.extend_from_slice(text.as_bytes());
                KIND_COMMENT
            }
            Record::Survey(ping) => {
                write_survey(&mut payload, ping)?;
                KIND_SURVEY
            }
            Record::Nav(nav) => {
                write_nav(&mut payload, nav)?;
                KIND_NAV
            }
            Record::SensorAux(aux) => {
                write_time(&mut payload, aux.time)?;
                write_short_string(&mut payload, &aux.sensor)?;
                write_len(&mut payload, aux.values.len())?;
                for value in &aux.values {
                    payload.write_f64::<BigEndian>(*value).map_err(io_err)?;
                }
                KIND_SENSOR_AUX
            }
            Record::Unsupported(raw) => {
                write_short_string(&mut payload, &raw.label)?;
                payload.extend_from_slice(&raw.data);
                KIND_UNSUPPORTED
            }
        };

        let payload_len = u32::try_from(payload.len())
            .map_err(|_| EncodeError::Invalid("record larger than 4 GiB".to_string()))?;
        out.extend_from_slice(&SYNC);
        out.push(kind);
        out.push(0);
        out.write_u32::<BigEndian>(payload_len).map_err(io_err)?;
        out.extend_from_slice(&payload);
        out.write_u32::<BigEndian>(crc32fast::hash(&payload))
            .map_err(io_err)?;
        Ok(())
    }

    fn resync(&mut self, cursor: &mut ByteCursor<'_>) {
        let next = cursor
            .find_from(cursor.position() + 1, &SYNC)
            .unwrap_or(cursor.len());
        cursor.seek(next);
    }
}

fn io_err(e: std::io::Error) -> EncodeError {
    EncodeError::Invalid(e.to_string())
}

fn decode_frame(cursor: &mut ByteCursor<'_>) -> Result<Record, DecodeError> {
    if cursor.remaining() < FRAME_HEADER_LEN {
        return Err(DecodeError::Truncated {
            needed: FRAME_HEADER_LEN,
            available: cursor.remaining(),
        });
    }
    let sync = cursor.read_bytes(2)?;
    if sync != SYNC {
        return Err(DecodeError::Malformed(format!(
            "bad sync bytes {:02x}{:02x}",
            sync[0], sync[1]
        )));
    }
    let kind = cursor.read_u8()?;
    let _reserved = cursor.read_u8()?;
    let payload_len = cursor.read_u32::<BigEndian>()? as usize;
    let payload = cursor.read_bytes(payload_len)?;
    let stored = cursor.read_u32::<BigEndian>()?;
    let computed = crc32fast::hash(payload);
    if stored != computed {
        return Err(DecodeError::Checksum { stored, computed });
    }

    let mut body = ByteCursor::new(payload);
    let record = match kind {
        KIND_COMMENT => Record::Comment {
            text: String::from_utf8(payload.to_vec())
                .map_err(|e| DecodeError::Malformed(format!("comment is not UTF-8: {e}")))?,
        },
        KIND_SURVEY => Record::Survey(read_survey(&mut body)?),
        KIND_NAV => Record::Nav(read_nav(&mut body)?),
        KIND_SENSOR_AUX => {
            let time = body.read_f64::<BigEndian>()?;
            let sensor = body.read_short_string::<BigEndian>()?;
            let count = body.read_u32::<BigEndian>()? as usize;
            let mut values = Vec::with_capacity(count.min(body.remaining() / 8));
            for _ in 0..count {
                values.push(body.read_f64::<BigEndian>()?);
            }
            Record::SensorAux(SensorAux {
                time,
                sensor,
                values,
            })
        }
        KIND_UNSUPPORTED => {
            let label = body.read_short_string::<BigEndian>()?;
            Record::Unsupported(UnsupportedRecord {
                label,
                data: body.rest().to_vec(),
            })
        }
        other => {
            return Err(DecodeError::Malformed(format!(
                "unknown record kind {other}"
            )))
        }
    };
    Ok(record)
}

fn read_position(body: &mut ByteCursor<'_>) -> Result<Position, DecodeError> {
    Ok(Position {
        lon: body.read_f64::<BigEndian>()?,
        lat: body.read_f64::<BigEndian>()?,
    })
}

fn read_nav(body: &mut ByteCursor<'_>) -> Result<NavFix, DecodeError> {
    Ok(NavFix {
        time: body.read_f64::<BigEndian>()?,
        position: read_position(body)?,
        heading: body.read_f64::<BigEndian>()?,
        speed: body.read_f64::<BigEndian>()?,
        sensor_depth: body.read_f64::<BigEndian>()?,
    })
}

fn read_survey(body: &mut ByteCursor<'_>) -> Result<SurveyPing, DecodeError> {
    let time = body.read_f64::<BigEndian>()?;
    let position = read_position(body)?;
    let heading = body.read_f64::<BigEndian>()?;
    let speed = body.read_f64::<BigEndian>()?;
    let sensor_depth = body.read_f64::<BigEndian>()?;
    let heave = body.read_f64::<BigEndian>()?;
    let count = body.read_u32::<BigEndian>()? as usize;

    let mut beams = Vec::with_capacity(count.min(body.remaining() / 34));
    for _ in 0..count {
        let presence = body.read_u8()?;
        let depth = body.read_f64::<BigEndian>()?;
        let amplitude = body.read_f64::<BigEndian>()?;
        let across_track = body.read_f64::<BigEndian>()?;
        let along_track = body.read_f64::<BigEndian>()?;
        let code = body.read_u8()?;
        let state = FlagState::from_code(code)
            .ok_or_else(|| DecodeError::Malformed(format!("unknown flag code {code}")))?;
        let provenance = if presence & HAS_PROVENANCE != 0 {
            let changed_at = body.read_f64::<BigEndian>()?;
            let tool = body.read_short_string::<BigEndian>()?;
            Some(Provenance { tool, changed_at })
        } else {
            None
        };
        beams.push(Beam {
            depth: (presence & HAS_DEPTH != 0).then_some(depth),
            amplitude: (presence & HAS_AMPLITUDE != 0).then_some(amplitude),
            across_track,
            along_track,
            flag: Flag { state, provenance },
        });
    }

    Ok(SurveyPing {
        time,
        position,
        heading,
        speed,
        sensor_depth,
        heave,
        beams,
    })
}

fn write_time(out: &mut Vec<u8>, time: f64) -> Result<(), EncodeError> {
    out.write_f64::<BigEndian>(time).map_err(io_err)
}

fn write_len(out: &mut Vec<u8>, len: usize) -> Result<(), EncodeError> {
    let len = u32::try_from(len)
        .map_err(|_| EncodeError::Invalid(format!("count {len} exceeds u32")))?;
    out.write_u32::<BigEndian>(len).map_err(io_err)
}

fn write_short_string(out: &mut Vec<u8>, s: &str) -> Result<(), EncodeError> {
    let len = u16::try_from(s.len())
        .map_err(|_| EncodeError::Invalid(format!("string of {} bytes too long", s.len())))?;
    out.write_u16::<BigEndian>(len).map_err(io_err)?;
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

fn write_nav(out: &mut Vec<u8>, nav: &NavFix) -> Result<(), EncodeError> {
    for value in [
        nav.time,
        nav.position.lon,
        nav.position.lat,
        nav.heading,
        nav.speed,
        nav.sensor_depth,
    ] {
        out.write_f64::<BigEndian>(value).map_err(io_err)?;
    }
    Ok(())
}

fn write_survey(out: &mut Vec<u8>, ping: &SurveyPing) -> Result<(), EncodeError> {
    for value in [
        ping.time,
        ping.position.lon,
        ping.position.lat,
        ping.heading,
        ping.speed,
        ping.sensor_depth,
        ping.heave,
    ] {
        out.write_f64::<BigEndian>(value).map_err(io_err)?;
    }
    write_len(out, ping.beams.len())?;
    for beam in &ping.beams {
        let mut presence = 0u8;
        if beam.depth.is_some() {
            presence |= HAS_DEPTH;
        }
        if beam.amplitude.is_some() {
            presence |= HAS_AMPLITUDE;
        }
        if beam.flag.provenance.is_some() {
            presence |= HAS_PROVENANCE;
        }
        out.push(presence);
        out.write_f64::<BigEndian>(beam.depth.unwrap_or(0.0))
            .map_err(io_err)?;
        out.write_f64::<BigEndian>(beam.amplitude.unwrap_or(0.0))
            .map_err(io_err)?;
        out.write_f64::<BigEndian>(beam.across_track)
            .map_err(io_err)?;
        out.write_f64::<BigEndian>(beam.along_track)
            .map_err(io_err)?;
        out.push(beam.flag.state.code());
        if let Some(provenance) = &beam.flag.provenance {
            out.write_f64::<BigEndian>(provenance.changed_at)
                .map_err(io_err)?;
            write_short_string(out, &provenance.tool)?;
        }
    }
    Ok(())
}
