// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout swathio.
//!
//! - [`SwathError`] - Error handling and terminal reports
//! - [`FormatId`] - Numeric format identifiers
//! - [`Record`] - Canonical record model
//! - [`Flag`] - Per-beam quality flags

pub mod error;
pub mod flag;
pub mod format_id;
pub mod record;
pub mod time;

pub use error::{ErrorReport, Result, SwathError};
pub use flag::{Flag, FlagState, Provenance};
pub use format_id::FormatId;
pub use record::{
    Beam, NavFix, Position, Record, RecordKind, SensorAux, SurveyPing, UnsupportedRecord,
};
