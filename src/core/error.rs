// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for swathio.
//!
//! A single error enum covers every layer:
//! - Format registry and filename inference
//! - Datalist resolution
//! - Session open, read, write and close
//! - Edit replay and edit-log persistence
//!
//! End of input is never an error; readers return `Ok(None)`.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use super::flag::FlagState;
use super::format_id::FormatId;
use super::record::RecordKind;

/// Errors raised by swathio operations.
#[derive(Debug, thiserror::Error)]
pub enum SwathError {
    /// A datalist manifest could not be opened.
    #[error("Unable to open data list file: {}", .path.display())]
    UnableToOpenDataListFile { path: PathBuf },

    /// A data file could not be opened or created.
    #[error("Unable to open file {}", .path.display())]
    UnableToOpenFile { path: PathBuf, reason: String },

    /// The id is not in the registry.
    #[error("Illegal format identifier: {0}")]
    IllegalFormatIdentifier(FormatId),

    /// No filename rule matched.
    #[error("unable to infer format from filename {}", .path.display())]
    UnableToInferFormat { path: PathBuf },

    /// A manifest references itself, directly or through other manifests.
    #[error("data list cycle detected: {} is already being expanded", .path.display())]
    DataListCycleDetected { path: PathBuf },

    /// Manifests nest deeper than the configured limit.
    #[error("data list nesting exceeds {limit} levels at {}", .path.display())]
    DataListDepthExceeded { path: PathBuf, limit: usize },

    /// A codec rejected the bytes at `offset`.
    #[error("record decode error in {} at offset {offset}: {reason}", .path.display())]
    RecordDecodeError {
        path: PathBuf,
        offset: u64,
        reason: String,
    },

    /// A codec could not encode a record.
    #[error("record encode error in {}: {reason}", .path.display())]
    RecordEncodeError { path: PathBuf, reason: String },

    /// The format cannot represent this kind of record.
    #[error("format {format} does not support {kind} records")]
    UnsupportedRecordKind { format: FormatId, kind: RecordKind },

    /// An edit event's expected prior state does not match the current state.
    #[error(
        "stale edit at time {timestamp:.6} beam {beam}: expected {expected}, found {found}"
    )]
    StaleEditConflict {
        timestamp: f64,
        beam: usize,
        expected: FlagState,
        found: FlagState,
    },

    /// The format is catalogued but no codec is installed for it.
    #[error("no codec available for format {0}")]
    CodecUnavailable(FormatId),

    /// Two descriptors were registered under one id.
    #[error("format identifier {0} registered twice")]
    DuplicateFormatIdentifier(FormatId),

    /// A strict-mode failure poisoned the session.
    #[error("session on {} is no longer usable after a failed read", .path.display())]
    SessionUnusable { path: PathBuf },

    /// Read called on a write session, or the reverse.
    #[error("session on {} is not open for {operation}", .path.display())]
    WrongDirection {
        path: PathBuf,
        operation: &'static str,
    },

    /// An edit log could not be read or written.
    #[error("edit log {}: {reason}", .path.display())]
    EditLog { path: PathBuf, reason: String },

    /// Invalid engine configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Other I/O failure.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl SwathError {
    pub fn unable_to_open_datalist(path: impl Into<PathBuf>) -> Self {
        SwathError::UnableToOpenDataListFile { path: path.into() }
    }

    pub fn unable_to_open_file(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        SwathError::UnableToOpenFile {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn illegal_format(id: impl Into<FormatId>) -> Self {
        SwathError::IllegalFormatIdentifier(id.into())
    }

    pub fn unable_to_infer(path: impl AsRef<Path>) -> Self {
        SwathError::UnableToInferFormat {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn decode(path: impl Into<PathBuf>, offset: u64, reason: impl Into<String>) -> Self {
        SwathError::RecordDecodeError {
            path: path.into(),
            offset,
            reason: reason.into(),
        }
    }

    pub fn encode(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SwathError::RecordEncodeError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn edit_log(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SwathError::EditLog {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        SwathError::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit status for this error class.
    ///
    /// 2 for missing or unreadable inputs, 3 for registry and initialisation
    /// failures, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            SwathError::UnableToOpenDataListFile { .. }
            | SwathError::UnableToOpenFile { .. }
            | SwathError::DataListCycleDetected { .. }
            | SwathError::DataListDepthExceeded { .. } => 2,
            SwathError::IllegalFormatIdentifier(_)
            | SwathError::UnableToInferFormat { .. }
            | SwathError::CodecUnavailable(_)
            | SwathError::DuplicateFormatIdentifier(_)
            | SwathError::Config(_) => 3,
            _ => 1,
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            SwathError::UnableToOpenDataListFile { path }
            | SwathError::UnableToInferFormat { path }
            | SwathError::DataListCycleDetected { path }
            | SwathError::SessionUnusable { path } => {
                vec![("path", path.display().to_string())]
            }
            SwathError::UnableToOpenFile { path, reason }
            | SwathError::RecordEncodeError { path, reason }
            | SwathError::EditLog { path, reason } => vec![
                ("path", path.display().to_string()),
                ("reason", reason.clone()),
            ],
            SwathError::IllegalFormatIdentifier(id)
            | SwathError::CodecUnavailable(id)
            | SwathError::DuplicateFormatIdentifier(id) => vec![("format", id.to_string())],
            SwathError::DataListDepthExceeded { path, limit } => vec![
                ("path", path.display().to_string()),
                ("limit", limit.to_string()),
            ],
            SwathError::RecordDecodeError {
                path,
                offset,
                reason,
            } => vec![
                ("path", path.display().to_string()),
                ("offset", offset.to_string()),
                ("reason", reason.clone()),
            ],
            SwathError::UnsupportedRecordKind { format, kind } => vec![
                ("format", format.to_string()),
                ("kind", kind.to_string()),
            ],
            SwathError::StaleEditConflict {
                timestamp,
                beam,
                expected,
                found,
            } => vec![
                ("timestamp", timestamp.to_string()),
                ("beam", beam.to_string()),
                ("expected", expected.to_string()),
                ("found", found.to_string()),
            ],
            SwathError::WrongDirection { path, operation } => vec![
                ("path", path.display().to_string()),
                ("operation", (*operation).to_string()),
            ],
            SwathError::Config(reason) => vec![("reason", reason.clone())],
            SwathError::Io { context, source } => vec![
                ("context", context.clone()),
                ("source", source.to_string()),
            ],
        }
    }
}

/// Result type for swathio operations.
pub type Result<T> = std::result::Result<T, SwathError>;

/// Terminal error report in the traditional two-part layout:
///
/// ```text
/// MBIO Error returned from function <name>:
/// <message>
///
/// Program <NAME> Terminated
/// ```
pub struct ErrorReport<'a> {
    pub program: &'a str,
    pub function: &'a str,
    pub error: &'a SwathError,
}

impl<'a> ErrorReport<'a> {
    pub fn new(program: &'a str, function: &'a str, error: &'a SwathError) -> Self {
        Self {
            program,
            function,
            error,
        }
    }
}

impl fmt::Display for ErrorReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "MBIO Error returned from function <{}>:",
            self.function
        )?;
        writeln!(f, "{}", self.error)?;
        writeln!(f)?;
        write!(f, "Program <{}> Terminated", self.program)
    }
}
