// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Per-beam quality flags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary quality state of a beam. Exactly one state holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagState {
    /// Usable sounding.
    #[default]
    Good,
    /// Rejected by a person in an editor.
    FlaggedManual,
    /// Rejected by an automatic filter.
    FlaggedFilter,
    /// Rejected by the acquisition system.
    FlaggedSensor,
    /// Value synthesised from neighbouring beams.
    Interpolated,
    /// No value present.
    Null,
}

impl FlagState {
    /// All states, in wire-code order.
    pub const ALL: [FlagState; 6] = [
        FlagState::Good,
        FlagState::FlaggedManual,
        FlagState::FlaggedFilter,
        FlagState::FlaggedSensor,
        FlagState::Interpolated,
        FlagState::Null,
    ];

    /// Compact code used by binary encodings.
    pub fn code(self) -> u8 {
        match self {
            FlagState::Good => 0,
            FlagState::FlaggedManual => 1,
            FlagState::FlaggedFilter => 2,
            FlagState::FlaggedSensor => 3,
            FlagState::Interpolated => 4,
            FlagState::Null => 5,
        }
    }

    /// Inverse of [`FlagState::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Whether the beam has been rejected by any party.
    pub fn is_flagged(self) -> bool {
        matches!(
            self,
            FlagState::FlaggedManual | FlagState::FlaggedFilter | FlagState::FlaggedSensor
        )
    }

    /// Whether the beam carries a usable value.
    pub fn is_usable(self) -> bool {
        matches!(self, FlagState::Good | FlagState::Interpolated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlagState::Good => "good",
            FlagState::FlaggedManual => "flagged_manual",
            FlagState::FlaggedFilter => "flagged_filter",
            FlagState::FlaggedSensor => "flagged_sensor",
            FlagState::Interpolated => "interpolated",
            FlagState::Null => "null",
        }
    }
}

impl fmt::Display for FlagState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who last changed a flag, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Name of the tool that applied the change.
    pub tool: String,
    /// Time the change was applied, seconds since the Unix epoch.
    pub changed_at: f64,
}

/// A beam flag: primary state plus optional provenance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Flag {
    pub state: FlagState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

impl Flag {
    /// Flag with the given state and no provenance.
    pub fn new(state: FlagState) -> Self {
        Self {
            state,
            provenance: None,
        }
    }

    /// Flag set by `tool` at `changed_at`.
    pub fn changed_by(state: FlagState, tool: impl Into<String>, changed_at: f64) -> Self {
        Self {
            state,
            provenance: Some(Provenance {
                tool: tool.into(),
                changed_at,
            }),
        }
    }

    /// Compare primary states only, ignoring provenance.
    pub fn same_state(&self, other: &Flag) -> bool {
        self.state == other.state
    }
}

impl From<FlagState> for Flag {
    fn from(state: FlagState) -> Self {
        Flag::new(state)
    }
}
