// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Open / read / write / close lifecycle for one data file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, warn, Span};

use crate::codec::{ByteCursor, SwathCodec};
use crate::config::DEFAULT_TOOL;
use crate::core::{FlagState, FormatId, Record, Result, SwathError};
use crate::format::{global_registry, FormatDescriptor, FormatRegistry};
use crate::transform::{normalize_record, LonflipPolicy, TimestampMonitor};

use super::source::MappedSource;

/// Whether a session reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Read => "read",
            Direction::Write => "write",
        }
    }
}

/// Reaction to a record that fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    /// Log, resync and continue.
    #[default]
    Skip,
    /// Fail; the session is unusable afterwards.
    Strict,
}

/// Per-session context.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub lonflip: LonflipPolicy,
    /// Mode used by [`SwathSession::records`] callers that don't pick one.
    pub read_mode: ReadMode,
    pub tool: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            lonflip: LonflipPolicy::default(),
            read_mode: ReadMode::default(),
            tool: DEFAULT_TOOL.to_string(),
        }
    }
}

/// Counters kept while a session runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub records_read: u64,
    pub records_skipped: u64,
    pub records_written: u64,
    pub bytes_written: u64,
    pub time_regressions: u64,
}

enum Channel {
    Reader {
        source: MappedSource,
        offset: usize,
    },
    Writer {
        out: BufWriter<File>,
        buffer: Vec<u8>,
    },
    Closed,
}

/// One open data file.
///
/// A session owns its file handle and its codec instance; nothing is shared
/// with other sessions.
pub struct SwathSession {
    path: PathBuf,
    descriptor: FormatDescriptor,
    codec: Box<dyn SwathCodec>,
    direction: Direction,
    options: SessionOptions,
    channel: Channel,
    unusable: bool,
    stats: SessionStats,
    monitor: TimestampMonitor,
    span: Span,
}

impl SwathSession {
    /// Open `path` as `format` against the global registry.
    ///
    /// The format is validated before any file I/O.
    ///
    /// # Errors
    ///
    /// `IllegalFormatIdentifier`, `CodecUnavailable` or `UnableToOpenFile`.
    pub fn open(
        path: impl AsRef<Path>,
        format: impl Into<FormatId>,
        direction: Direction,
        options: &SessionOptions,
    ) -> Result<Self> {
        Self::open_with_registry(global_registry(), path, format, direction, options)
    }

    pub fn open_with_registry(
        registry: &FormatRegistry,
        path: impl AsRef<Path>,
        format: impl Into<FormatId>,
        direction: Direction,
        options: &SessionOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let format = format.into();
        let descriptor = registry.lookup(format)?.clone();
        let codec = registry.codec_for(format)?;

        let channel = match direction {
            Direction::Read => Channel::Reader {
                source: MappedSource::open(path)?,
                offset: 0,
            },
            Direction::Write => {
                let file =
                    File::create(path).map_err(|e| SwathError::unable_to_open_file(path, e))?;
                Channel::Writer {
                    out: BufWriter::new(file),
                    buffer: Vec::new(),
                }
            }
        };

        let span = debug_span!(
            "session",
            path = %path.display(),
            format = format.value(),
            direction = direction.as_str()
        );
        span.in_scope(|| debug!(name = %descriptor.name, "session opened"));

        Ok(Self {
            path: path.to_path_buf(),
            descriptor,
            codec,
            direction,
            options: options.clone(),
            channel,
            unusable: false,
            stats: SessionStats::default(),
            monitor: TimestampMonitor::new(),
            span,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FormatId {
        self.descriptor.id
    }

    pub fn descriptor(&self) -> &FormatDescriptor {
        &self.descriptor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            time_regressions: self.monitor.regressions(),
            ..self.stats
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.channel, Channel::Closed)
    }

    /// Decode the next record, `Ok(None)` at end of file.
    ///
    /// Positions are normalised with the session's lonflip policy. For
    /// formats that store no beam flags, beams come back Good, or Null when
    /// they carry no depth.
    ///
    /// # Errors
    ///
    /// Under [`ReadMode::Strict`] a bad record yields `RecordDecodeError` and
    /// every later call `SessionUnusable`. Reading a write session fails
    /// `WrongDirection`.
    pub fn read_next_record(&mut self, mode: ReadMode) -> Result<Option<Record>> {
        if self.unusable {
            return Err(SwathError::SessionUnusable {
                path: self.path.clone(),
            });
        }
        let _guard = self.span.enter();

        let (source, offset) = match &mut self.channel {
            Channel::Reader { source, offset } => (source, offset),
            Channel::Writer { .. } => {
                return Err(SwathError::WrongDirection {
                    path: self.path.clone(),
                    operation: "read",
                })
            }
            Channel::Closed => return Ok(None),
        };

        let mut cursor = ByteCursor::new(source.data());
        cursor.seek(*offset);

        loop {
            let start = cursor.position();
            match self.codec.decode(&mut cursor) {
                Ok(Some(mut record)) => {
                    *offset = cursor.position();
                    normalize_record(&mut record, self.options.lonflip);
                    if !self.descriptor.beam_flagging {
                        assign_default_flags(&mut record);
                    }
                    if let Some(time) = record.time() {
                        self.monitor.observe(time);
                    }
                    self.stats.records_read += 1;
                    return Ok(Some(record));
                }
                Ok(None) => {
                    *offset = cursor.position();
                    return Ok(None);
                }
                Err(e) => {
                    let error = SwathError::decode(&self.path, start as u64, e.to_string());
                    match mode {
                        ReadMode::Strict => {
                            *offset = start;
                            self.unusable = true;
                            return Err(error);
                        }
                        ReadMode::Skip => {
                            warn!(offset = start, error = %e, "skipping undecodable record");
                            self.stats.records_skipped += 1;
                            cursor.seek(start);
                            self.codec.resync(&mut cursor);
                            if cursor.position() <= start {
                                cursor.seek(start + 1);
                            }
                            *offset = cursor.position();
                        }
                    }
                }
            }
        }
    }

    /// Encode and write one record.
    ///
    /// # Errors
    ///
    /// `WrongDirection` on a read session, `UnsupportedRecordKind` if the
    /// format cannot store the record, `RecordEncodeError` if the codec
    /// rejects it.
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let _guard = self.span.enter();
        let (out, buffer) = match &mut self.channel {
            Channel::Writer { out, buffer } => (out, buffer),
            Channel::Reader { .. } => {
                return Err(SwathError::WrongDirection {
                    path: self.path.clone(),
                    operation: "write",
                })
            }
            Channel::Closed => {
                return Err(SwathError::SessionUnusable {
                    path: self.path.clone(),
                })
            }
        };

        let kind = record.kind();
        if !self.codec.capabilities().supports(kind) {
            return Err(SwathError::UnsupportedRecordKind {
                format: self.descriptor.id,
                kind,
            });
        }

        buffer.clear();
        self.codec
            .encode(record, buffer)
            .map_err(|e| SwathError::encode(&self.path, e.to_string()))?;
        out.write_all(buffer)
            .map_err(|e| SwathError::io(format!("writing {}", self.path.display()), e))?;
        self.stats.records_written += 1;
        self.stats.bytes_written += buffer.len() as u64;
        Ok(())
    }

    /// Iterate records with `mode`.
    pub fn records(&mut self, mode: ReadMode) -> Records<'_> {
        Records {
            session: self,
            mode,
            done: false,
        }
    }

    /// Flush and release the file. Later calls do nothing.
    pub fn close(&mut self) -> Result<()> {
        let channel = std::mem::replace(&mut self.channel, Channel::Closed);
        let _guard = self.span.enter();
        match channel {
            Channel::Closed => Ok(()),
            Channel::Reader { .. } => {
                debug!(
                    records = self.stats.records_read,
                    skipped = self.stats.records_skipped,
                    "session closed"
                );
                Ok(())
            }
            Channel::Writer { mut out, mut buffer } => {
                buffer.clear();
                self.codec
                    .finish(&mut buffer)
                    .map_err(|e| SwathError::encode(&self.path, e.to_string()))?;
                out.write_all(&buffer)
                    .and_then(|_| out.flush())
                    .map_err(|e| SwathError::io(format!("flushing {}", self.path.display()), e))?;
                self.stats.bytes_written += buffer.len() as u64;
                debug!(records = self.stats.records_written, "session closed");
                Ok(())
            }
        }
    }
}

impl Drop for SwathSession {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(path = %self.path.display(), error = %e, "error closing session");
        }
    }
}

impl std::fmt::Debug for SwathSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwathSession")
            .field("path", &self.path)
            .field("format", &self.descriptor.id)
            .field("direction", &self.direction)
            .field("closed", &self.is_closed())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Iterator over a session's records. Fused after the first error.
pub struct Records<'s> {
    session: &'s mut SwathSession,
    mode: ReadMode,
    done: bool,
}

impl Iterator for Records<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.session.read_next_record(self.mode).transpose();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

impl std::iter::FusedIterator for Records<'_> {}

fn assign_default_flags(record: &mut Record) {
    if let Some(ping) = record.as_survey_mut() {
        for beam in &mut ping.beams {
            beam.flag.state = if beam.depth.is_some() {
                FlagState::Good
            } else {
                FlagState::Null
            };
            beam.flag.provenance = None;
        }
    }
}
