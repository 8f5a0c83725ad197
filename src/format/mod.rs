// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format registry: descriptors, the built-in catalog, codec lookup and
//! filename inference.

pub mod catalog;
pub mod descriptor;
pub mod detection;
pub mod registry;

pub use descriptor::{ByteOrder, FormatDescriptor, Storage};
pub use detection::{infer_candidate, FormatDetector, SuffixDetector};
pub use registry::{global_registry, FormatRegistry, RegistryBuilder};
