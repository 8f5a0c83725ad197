// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Beam flag editing.
//!
//! Edits are never written into records in place. Each change is an
//! [`EditEvent`] appended to an [`EditLog`]; the current state of every beam
//! is derived by [`replay`]ing events over a base [`BeamStates`], and an
//! [`EditOverlay`] applies that state to records as they stream past.
//!
//! # Example
//!
//! ```
//! use swathio::core::FlagState;
//! use swathio::edit::{replay, BeamStates, EditLog};
//!
//! let mut states = BeamStates::new();
//! let mut log = EditLog::new();
//! log.record(&mut states, 1_000.0, 12, FlagState::FlaggedManual, "mbedit")?;
//!
//! let replayed = replay(&BeamStates::new(), log.events())?;
//! assert_eq!(replayed.state(1_000.0, 12), FlagState::FlaggedManual);
//! # Ok::<(), swathio::SwathError>(())
//! ```

pub mod engine;
pub mod event;
pub mod log;
pub mod overlay;

pub use engine::{replay, replay_within, snap_events, BeamStates};
pub use event::{BeamKey, EditEvent};
pub use log::{EditLog, EDIT_LOG_MAGIC};
pub use overlay::EditOverlay;

/// Default ping-time matching window, seconds.
pub const DEFAULT_TIME_TOLERANCE: f64 = 0.00011;
