// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format inference from filenames.
//!
//! Swath files carry no common magic number, so the format is guessed from
//! the filename: first the `.mb<N>` convention, then a table of vendor
//! suffixes. Matching is case-insensitive and the first rule wins.
//!
//! # Example
//!
//! ```
//! use swathio::format::detection::infer_candidate;
//! use swathio::FormatId;
//!
//! assert_eq!(infer_candidate("NBP0209.snipped.a77"), Some(FormatId(173)));
//! assert_eq!(infer_candidate("line0001.mb71"), Some(FormatId(71)));
//! assert_eq!(infer_candidate("datalist.mb-1"), Some(FormatId::DATALIST));
//! ```

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::core::FormatId;

/// Current ids for the legacy single-digit format numbers 1 through 9.
pub const LEGACY_ALIASES: [(i32, i32); 9] = [
    (1, 11),
    (2, 12),
    (3, 13),
    (4, 14),
    (5, 21),
    (6, 22),
    (7, 23),
    (8, 24),
    (9, 71),
];

/// Vendor suffixes, lower case, in match order.
const SUFFIX_RULES: &[(&str, i32)] = &[
    (".nve", 166),
    (".fnv", 166),
    (".fbt", 71),
    (".ffb", 71),
    (".ffa", 71),
    (".ffs", 71),
    (".dls", -1),
    (".rec", 41),
    (".xse", 94),
    ("_raw.all", 56),
    ("-raw.all", 56),
    (".all", 56),
    (".kmall", 261),
    (".merged", 151),
    (".hal", 83),
    ("tibr.txt", 165),
    ("docr.txt", 165),
    ("vnta.txt", 165),
    ("ptlo.txt", 165),
    ("wfly.txt", 165),
    (".hs", 21),
    (".fsw", 182),
    (".xtf", 84),
    (".mgd77", 161),
    (".a77", 173),
    (".m77t", 174),
    (".segy", 160),
    (".so", 53),
    (".mbb", 75),
    (".mbg", 75),
    (".nvi", 167),
    (".six", 181),
    (".sda", 181),
    (".xyz", 162),
    (".yxz", 163),
    (".xyt", 168),
    (".yxt", 169),
    (".b93", 164),
    (".mst", 131),
    (".jsf", 132),
    (".btyw", 64),
    (".btywt", 64),
    (".gsf", 121),
    (".s7k", 88),
    (".7k", 88),
    (".83p", 191),
    (".r2rnav", 172),
    (".hsx", 201),
    (".sxi", 221),
    (".sxp", 222),
    (".nwsf", 241),
    (".000", 241),
];

fn mb_suffix() -> &'static Regex {
    static MB_SUFFIX: OnceLock<Regex> = OnceLock::new();
    MB_SUFFIX.get_or_init(|| {
        Regex::new(r"(?i)\.mb(-?\d{1,3})$").expect("static regex is valid")
    })
}

fn na_suffix() -> &'static Regex {
    static NA_SUFFIX: OnceLock<Regex> = OnceLock::new();
    NA_SUFFIX.get_or_init(|| Regex::new(r"(?i)\.na\d$").expect("static regex is valid"))
}

/// Map a legacy single-digit id to its current id.
pub fn resolve_alias(id: i32) -> Option<i32> {
    LEGACY_ALIASES
        .iter()
        .find(|(old, _)| *old == id)
        .map(|(_, new)| *new)
}

/// Guess a format id from the filename alone.
///
/// The result is not checked against any registry.
pub fn infer_candidate(path: impl AsRef<Path>) -> Option<FormatId> {
    let name = path.as_ref().file_name()?.to_string_lossy().to_string();

    if let Some(caps) = mb_suffix().captures(&name) {
        let raw: i32 = caps[1].parse().ok()?;
        if let Some(current) = resolve_alias(raw) {
            info!(
                file = %name,
                legacy = raw,
                current,
                "mapping legacy format id"
            );
            return Some(FormatId(current));
        }
        return Some(FormatId(raw));
    }

    if na_suffix().is_match(&name) {
        return Some(FormatId(166));
    }

    let lower = name.to_ascii_lowercase();
    SUFFIX_RULES
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix) && lower.len() > suffix.len())
        .map(|&(_, id)| FormatId(id))
}

/// Pluggable filename-based format inference.
pub trait FormatDetector: Send + Sync {
    /// Guess the format of `path`, or `None` when no rule applies.
    fn detect(&self, path: &Path) -> Option<FormatId>;
}

/// Suffix-table detector used by the built-in registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixDetector;

impl FormatDetector for SuffixDetector {
    fn detect(&self, path: &Path) -> Option<FormatId> {
        infer_candidate(path)
    }
}
