// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format descriptors.

use std::fmt;

use serde::Serialize;

use crate::codec::Capabilities;
use crate::core::{FormatId, RecordKind};

/// Physical storage of a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Storage {
    Binary,
    Text,
}

/// Byte order of multi-byte binary fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    Big,
    Little,
    NotApplicable,
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ByteOrder::Big => "big-endian",
            ByteOrder::Little => "little-endian",
            ByteOrder::NotApplicable => "n/a",
        })
    }
}

/// Immutable description of one on-disk format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatDescriptor {
    pub id: FormatId,
    /// Short name, e.g. `MBLDEOIH`.
    pub name: String,
    /// Sonar system or data family, e.g. `SeaBeam`.
    pub family: String,
    pub description: String,
    pub storage: Storage,
    pub byte_order: ByteOrder,
    /// Record kinds the format can hold.
    pub kinds: Vec<RecordKind>,
    pub lossless: bool,
    pub beam_flagging: bool,
}

impl FormatDescriptor {
    /// Start a descriptor with survey, nav and comment kinds and no
    /// round-trip guarantees.
    pub fn new(
        id: impl Into<FormatId>,
        name: impl Into<String>,
        family: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            family: family.into(),
            description: description.into(),
            storage: Storage::Binary,
            byte_order: ByteOrder::Big,
            kinds: vec![RecordKind::Comment, RecordKind::Survey, RecordKind::Nav],
            lossless: false,
            beam_flagging: false,
        }
    }

    pub fn storage(mut self, storage: Storage) -> Self {
        self.storage = storage;
        if storage == Storage::Text {
            self.byte_order = ByteOrder::NotApplicable;
        }
        self
    }

    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn kinds(mut self, kinds: &[RecordKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    /// Take record kinds and round-trip flags from a codec.
    pub fn with_capabilities(mut self, caps: &Capabilities) -> Self {
        self.kinds = caps.kinds.clone();
        self.lossless = caps.lossless;
        self.beam_flagging = caps.beam_flagging;
        self
    }

    pub fn supports(&self, kind: RecordKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_text(&self) -> bool {
        self.storage == Storage::Text
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MBIO Data Format ID:  {}\nFormat name:          MBF_{}\nInformal Description: {}\nAttributes:           {}, {}, {}",
            self.id,
            self.name,
            self.description,
            self.family,
            match self.storage {
                Storage::Binary => "binary",
                Storage::Text => "ascii",
            },
            self.byte_order,
        )
    }
}
