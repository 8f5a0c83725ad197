// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Line grammar for datalist manifests.
//!
//! ```text
//! # comment
//! $PROCESSED | $RAW | $NOLOCALWEIGHT
//! <path> [<format> | = ] [<weight>]
//! ```
//!
//! Fields are whitespace separated; tokens after the weight are ignored.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::core::FormatId;

/// Manifest-level switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Prefer processed output files.
    Processed,
    /// Use files as listed.
    Raw,
    /// Inherited weights override weights given on entry lines.
    NoLocalWeight,
    /// Unrecognised `$` line.
    Unknown(String),
}

/// Format column of an entry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatField {
    /// Absent or `=`.
    Infer,
    Explicit(FormatId),
    /// Present but not an integer.
    Unparsable(String),
}

/// Weight column of an entry line.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightField {
    Absent,
    Value(f64),
    Unparsable(String),
}

/// One parsed entry line.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryLine {
    pub path: String,
    pub format: FormatField,
    pub weight: WeightField,
}

/// A meaningful manifest line.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestLine {
    Directive(Directive),
    Entry(EntryLine),
}

/// Parse one manifest line. Blank lines and comments yield `None`.
pub fn parse_line(line: &str) -> Option<ManifestLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    if line.starts_with('$') {
        let directive = if line.starts_with("$PROCESSED") {
            Directive::Processed
        } else if line.starts_with("$RAW") {
            Directive::Raw
        } else if line.starts_with("$NOLOCALWEIGHT") {
            Directive::NoLocalWeight
        } else {
            Directive::Unknown(line.to_string())
        };
        return Some(ManifestLine::Directive(directive));
    }

    let mut tokens = line.split_whitespace();
    let path = tokens.next()?.to_string();
    let format = match tokens.next() {
        None | Some("=") => FormatField::Infer,
        Some(token) => match token.parse::<FormatId>() {
            Ok(id) => FormatField::Explicit(id),
            Err(_) => FormatField::Unparsable(token.to_string()),
        },
    };
    let weight = match tokens.next() {
        None => WeightField::Absent,
        Some(token) => match token.parse::<f64>() {
            Ok(value) => WeightField::Value(value),
            Err(_) => WeightField::Unparsable(token.to_string()),
        },
    };

    Some(ManifestLine::Entry(EntryLine {
        path,
        format,
        weight,
    }))
}

/// Resolve `path` relative to the directory of the manifest naming it.
pub fn resolve_relative(manifest_dir: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() || manifest_dir.as_os_str().is_empty() {
        candidate.to_path_buf()
    } else {
        manifest_dir.join(candidate)
    }
}

fn mb_name() -> &'static Regex {
    static MB_NAME: OnceLock<Regex> = OnceLock::new();
    MB_NAME.get_or_init(|| Regex::new(r"^(.+)\.mb(\d+)$").expect("static regex is valid"))
}

/// Conventional processed-output name for a raw file:
/// `<root>.mb<N>` becomes `<root>p.mb<N>`.
///
/// Returns `None` for names outside the convention or already processed.
pub fn processed_name(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let caps = mb_name().captures(name)?;
    let root = &caps[1];
    if root.ends_with('p') {
        return None;
    }
    Some(path.with_file_name(format!("{root}p.mb{}", &caps[2])))
}
