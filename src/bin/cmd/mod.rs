// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod copy;
mod datalist;
mod edits;
mod formats;
mod info;

pub use copy::CopyCmd;
pub use datalist::DatalistCmd;
pub use edits::EditsCmd;
pub use formats::FormatsCmd;
pub use info::InfoCmd;
