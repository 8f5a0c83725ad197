// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Datalist resolution.
//!
//! A datalist is a text manifest naming data files and, recursively, other
//! manifests. [`DatalistResolver`] expands a tree of manifests depth-first
//! into a flat stream of [`DataSourceEntry`] values, pulling one line at a
//! time so that arbitrarily long lists never load into memory.
//!
//! # Example
//!
//! ```rust,no_run
//! use swathio::datalist::{DatalistResolver, ResolveOptions};
//!
//! let resolver = DatalistResolver::open(Some("survey.mb-1".as_ref()), ResolveOptions::default())?;
//! for entry in resolver {
//!     let entry = entry?;
//!     println!("{} {} {}", entry.path.display(), entry.format, entry.weight);
//! }
//! # Ok::<(), swathio::SwathError>(())
//! ```

pub mod parser;
pub mod resolver;

pub use resolver::DatalistResolver;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::FormatId;

/// Default weight for entries that give none.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Default nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 25;

/// Default manifest name when the caller supplies none.
pub const DEFAULT_DATALIST: &str = "datalist.mb-1";

/// One resolved data file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSourceEntry {
    pub path: PathBuf,
    pub format: FormatId,
    /// Positive weight, default 1.0.
    pub weight: f64,
    /// Manifest that listed the file.
    pub manifest: PathBuf,
    /// 1-based line within `manifest`.
    pub line: usize,
    /// Nesting depth of `manifest`; the root manifest is 0.
    pub depth: usize,
    /// Whether a processed file replaced the listed one.
    pub processed: bool,
}

/// Whether to substitute processed output files for raw ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessedPreference {
    /// Let `$PROCESSED` / `$RAW` directives decide; raw if none.
    #[default]
    Unset,
    #[serde(alias = "yes")]
    Processed,
    #[serde(alias = "no")]
    Raw,
}

/// Resolver settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveOptions {
    pub look_processed: ProcessedPreference,
    /// Skip missing or empty files and unopenable nested manifests with a
    /// warning instead of failing.
    pub skip_unreadable: bool,
    pub max_depth: usize,
    /// Manifest opened when the caller gives no path.
    pub default_datalist: PathBuf,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            look_processed: ProcessedPreference::Unset,
            skip_unreadable: false,
            max_depth: DEFAULT_MAX_DEPTH,
            default_datalist: PathBuf::from(DEFAULT_DATALIST),
        }
    }
}
