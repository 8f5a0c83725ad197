// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Persistent edit log.
//!
//! File layout, big-endian:
//!
//! ```text
//! "SWEDIT01"
//! u32 event count
//! per event:
//!     f64 timestamp
//!     u32 beam
//!     u8  previous state code
//!     u8  new state code
//!     f64 applied_at
//!     u16 tool length, tool bytes (UTF-8)
//! u32 CRC-32 of everything after the magic
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{BigEndian, WriteBytesExt};
use tracing::debug;

use crate::codec::{ByteCursor, DecodeError};
use crate::core::{time, FlagState, Result, SwathError};

use super::engine::BeamStates;
use super::event::EditEvent;

/// Magic bytes at the start of every edit file.
pub const EDIT_LOG_MAGIC: &[u8; 8] = b"SWEDIT01";

/// Append-only list of edit events, ordered by application time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditLog {
    events: Vec<EditEvent>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event, keeping the log ordered by `applied_at`.
    ///
    /// Events with equal application times keep insertion order.
    pub fn append(&mut self, event: EditEvent) {
        let at = self
            .events
            .partition_point(|e| e.applied_at <= event.applied_at);
        self.events.insert(at, event);
    }

    /// Change one beam in `states` and log the change.
    ///
    /// The previous state is read from `states`; the application time is now,
    /// or just after the last logged event if the clock is behind it.
    pub fn record(
        &mut self,
        states: &mut BeamStates,
        timestamp: f64,
        beam: usize,
        new: FlagState,
        tool: &str,
    ) -> Result<&EditEvent> {
        let mut applied_at = time::now();
        if let Some(last) = self.events.last() {
            if applied_at < last.applied_at {
                applied_at = last.applied_at;
            }
        }
        let event = EditEvent {
            timestamp,
            beam,
            previous: states.state(timestamp, beam),
            new,
            tool: tool.to_string(),
            applied_at,
        };
        states.apply(&event)?;
        self.events.push(event);
        let index = self.events.len() - 1;
        Ok(&self.events[index])
    }

    pub fn events(&self) -> &[EditEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Write the log to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let body = self.encode_body(path)?;
        let file = File::create(path).map_err(|e| SwathError::unable_to_open_file(path, e))?;
        let mut out = BufWriter::new(file);
        let io_err = |e| SwathError::io(format!("writing edit log {}", path.display()), e);
        out.write_all(EDIT_LOG_MAGIC).map_err(io_err)?;
        out.write_all(&body).map_err(io_err)?;
        out.write_u32::<BigEndian>(crc32fast::hash(&body))
            .map_err(io_err)?;
        out.flush().map_err(io_err)?;
        debug!(path = %path.display(), events = self.events.len(), "saved edit log");
        Ok(())
    }

    /// Read a log written by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// `UnableToOpenFile` if the file cannot be read, `EditLog` if it is not
    /// a valid edit log.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| SwathError::unable_to_open_file(path, e))?;
        let log = Self::decode(&data).map_err(|e| SwathError::edit_log(path, e.to_string()))?;
        debug!(path = %path.display(), events = log.events.len(), "loaded edit log");
        Ok(log)
    }

    fn encode_body(&self, path: &Path) -> Result<Vec<u8>> {
        let invalid = |reason: String| SwathError::edit_log(path, reason);
        let mut body = Vec::with_capacity(4 + self.events.len() * 32);
        let count = u32::try_from(self.events.len())
            .map_err(|_| invalid("too many events".to_string()))?;
        // Writes into a Vec cannot fail.
        let _ = body.write_u32::<BigEndian>(count);
        for event in &self.events {
            let beam = u32::try_from(event.beam)
                .map_err(|_| invalid(format!("beam index {} out of range", event.beam)))?;
            let tool = event.tool.as_bytes();
            let tool_len = u16::try_from(tool.len())
                .map_err(|_| invalid(format!("tool name of {} bytes too long", tool.len())))?;
            let _ = body.write_f64::<BigEndian>(event.timestamp);
            let _ = body.write_u32::<BigEndian>(beam);
            let _ = body.write_u8(event.previous.code());
            let _ = body.write_u8(event.new.code());
            let _ = body.write_f64::<BigEndian>(event.applied_at);
            let _ = body.write_u16::<BigEndian>(tool_len);
            body.extend_from_slice(tool);
        }
        Ok(body)
    }

    fn decode(data: &[u8]) -> std::result::Result<Self, DecodeError> {
        let mut cursor = ByteCursor::new(data);
        if cursor.read_bytes(EDIT_LOG_MAGIC.len())? != EDIT_LOG_MAGIC {
            return Err(DecodeError::Malformed("not an edit log".to_string()));
        }
        let body_start = cursor.position();

        let count = cursor.read_u32::<BigEndian>()? as usize;
        let mut events = Vec::with_capacity(count.min(cursor.remaining() / 24));
        for _ in 0..count {
            let timestamp = cursor.read_f64::<BigEndian>()?;
            let beam = cursor.read_u32::<BigEndian>()? as usize;
            let previous = state(cursor.read_u8()?)?;
            let new = state(cursor.read_u8()?)?;
            let applied_at = cursor.read_f64::<BigEndian>()?;
            let tool = cursor.read_short_string::<BigEndian>()?;
            events.push(EditEvent {
                timestamp,
                beam,
                previous,
                new,
                tool,
                applied_at,
            });
        }

        let body_end = cursor.position();
        let stored = cursor.read_u32::<BigEndian>()?;
        let computed = crc32fast::hash(&data[body_start..body_end]);
        if stored != computed {
            return Err(DecodeError::Checksum { stored, computed });
        }
        if !cursor.is_at_end() {
            return Err(DecodeError::Malformed(format!(
                "{} trailing bytes",
                cursor.remaining()
            )));
        }
        if events.windows(2).any(|w| w[1].applied_at < w[0].applied_at) {
            return Err(DecodeError::Malformed(
                "events not ordered by application time".to_string(),
            ));
        }
        Ok(Self { events })
    }
}

fn state(code: u8) -> std::result::Result<FlagState, DecodeError> {
    FlagState::from_code(code)
        .ok_or_else(|| DecodeError::Malformed(format!("unknown flag state code {code}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "swathio_editlog_{}_{:?}_{}",
            std::process::id(),
            std::thread::current().id(),
            name
        ))
    }

    fn event(applied_at: f64, beam: usize) -> EditEvent {
        EditEvent {
            timestamp: 1_000.25,
            beam,
            previous: FlagState::Good,
            new: FlagState::FlaggedManual,
            tool: "mbedit".to_string(),
            applied_at,
        }
    }

    #[test]
    fn test_append_keeps_time_order() {
        let mut log = EditLog::new();
        log.append(event(3.0, 0));
        log.append(event(1.0, 1));
        log.append(event(3.0, 2));
        log.append(event(2.0, 3));
        let beams: Vec<usize> = log.events().iter().map(|e| e.beam).collect();
        assert_eq!(beams, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_record_applies_and_logs() {
        let mut log = EditLog::new();
        let mut states = BeamStates::new();
        let event = log
            .record(&mut states, 50.0, 7, FlagState::FlaggedFilter, "mbclean")
            .unwrap()
            .clone();
        assert_eq!(event.previous, FlagState::Good);
        assert_eq!(states.state(50.0, 7), FlagState::FlaggedFilter);

        log.record(&mut states, 50.0, 7, FlagState::Good, "mbedit")
            .unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[1].previous, FlagState::FlaggedFilter);
        assert!(log.events()[1].applied_at >= log.events()[0].applied_at);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("save.swedit");
        let mut log = EditLog::new();
        log.append(event(10.0, 4));
        log.append(EditEvent {
            tool: String::new(),
            new: FlagState::Null,
            ..event(11.0, 5)
        });
        log.save(&path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], EDIT_LOG_MAGIC);
        assert_eq!(EditLog::load(&path).unwrap(), log);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_rejects_corruption() {
        let path = temp_path("corrupt.swedit");
        let mut log = EditLog::new();
        log.append(event(10.0, 4));
        log.save(&path).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        bytes[14] ^= 0xff;
        fs::write(&path, &bytes).unwrap();
        assert!(matches!(EditLog::load(&path), Err(SwathError::EditLog { .. })));

        fs::write(&path, b"NOTALOG!").unwrap();
        assert!(matches!(EditLog::load(&path), Err(SwathError::EditLog { .. })));
        fs::remove_file(&path).ok();

        assert!(matches!(
            EditLog::load(temp_path("missing.swedit")),
            Err(SwathError::UnableToOpenFile { .. })
        ));
    }
}
