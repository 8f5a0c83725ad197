// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Session layer: open a data file with a codec and stream records.
//!
//! # Example
//!
//! ```rust,no_run
//! use swathio::io::{Direction, ReadMode, SessionOptions, SwathSession};
//!
//! let options = SessionOptions::default();
//! let mut session = SwathSession::open("line0001.mb71", 71, Direction::Read, &options)?;
//! while let Some(record) = session.read_next_record(ReadMode::Skip)? {
//!     println!("{}", record.kind());
//! }
//! session.close()?;
//! # Ok::<(), swathio::SwathError>(())
//! ```

pub mod session;
pub mod source;

pub use session::{Direction, ReadMode, Records, SessionOptions, SessionStats, SwathSession};
pub use source::MappedSource;
