// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # swathio
//!
//! Format-abstraction engine for swath sonar and bathymetry survey data.
//!
//! Vendor formats are decoded into one canonical streaming record model so
//! downstream tools never need to know where the data came from:
//! - **Format registry** mapping numeric format ids to codecs in [`format`]
//! - **Codec interface** and built-in codecs in [`codec`]
//! - **Record model** with per-beam quality flags in [`core`]
//! - **Datalist resolution** of nested manifests in [`datalist`]
//! - **Sessions** streaming records from and to files in [`io`]
//! - **Edit engine** with replayable flag edits in [`edit`]
//!
//! ## Architecture
//!
//! - `core/` - errors, format ids, records, flags, time helpers
//! - `codec/` - `SwathCodec` trait, byte cursor, built-in formats
//! - `format/` - descriptors, catalog, filename detection, registry
//! - `transform/` - longitude normalisation and timestamp checks
//! - `datalist/` - manifest grammar and depth-first resolver
//! - `io/` - memory-mapped sources and the session lifecycle
//! - `edit/` - edit events, replay, edit logs, overlays
//!
//! ## Example: Reading every file of a datalist
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use swathio::datalist::{DatalistResolver, ResolveOptions};
//! use swathio::io::{Direction, ReadMode, SessionOptions, SwathSession};
//!
//! let options = SessionOptions::default();
//! for entry in DatalistResolver::open(None, ResolveOptions::default())? {
//!     let entry = entry?;
//!     let mut session = SwathSession::open(&entry.path, entry.format, Direction::Read, &options)?;
//!     for record in session.records(ReadMode::Skip) {
//!         println!("{:?}", record?.kind());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use core::{
    Beam, Flag, FlagState, FormatId, Position, Record, RecordKind, Result, SurveyPing, SwathError,
};

// Codec interface and built-in codecs
pub mod codec;

pub use codec::{ByteCursor, Capabilities, CodecFactory, SwathCodec};

// Format registry
pub mod format;

pub use format::{global_registry, FormatDescriptor, FormatRegistry};

// Coordinate and time normalisation
pub mod transform;

// Datalist resolution
pub mod datalist;

pub use datalist::{DataSourceEntry, DatalistResolver, ResolveOptions};

// Sessions
pub mod io;

pub use io::{Direction, ReadMode, SessionOptions, SwathSession};

// Edit engine
pub mod edit;

pub use edit::{replay, replay_within, BeamStates, EditEvent, EditLog, EditOverlay};

// Configuration
pub mod config;

pub use config::EngineConfig;
