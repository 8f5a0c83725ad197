// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Numeric format identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Numeric identifier of an on-disk swath format.
///
/// Identifiers are sparse and stable across releases. The value `-1` is
/// reserved as the datalist marker and is never a registered format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatId(pub i32);

impl FormatId {
    /// Marker for a nested datalist manifest.
    pub const DATALIST: FormatId = FormatId(-1);

    /// Marker for an image list (recognised, never opened).
    pub const IMAGELIST: FormatId = FormatId(-2);

    /// Raw numeric value.
    #[inline]
    pub fn value(self) -> i32 {
        self.0
    }

    /// Whether this id refers to a nested manifest rather than a data file.
    #[inline]
    pub fn is_datalist(self) -> bool {
        self == Self::DATALIST
    }
}

impl From<i32> for FormatId {
    fn from(value: i32) -> Self {
        FormatId(value)
    }
}

impl From<FormatId> for i32 {
    fn from(id: FormatId) -> Self {
        id.0
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FormatId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<i32>().map(FormatId)
    }
}
