// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Depth-first manifest expansion.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::{FormatId, Result, SwathError};
use crate::format::{global_registry, FormatRegistry};

use super::parser::{self, Directive, EntryLine, FormatField, ManifestLine, WeightField};
use super::{DataSourceEntry, ProcessedPreference, ResolveOptions, DEFAULT_WEIGHT};

/// One open manifest on the traversal stack.
struct Frame {
    path: PathBuf,
    canonical: PathBuf,
    dir: PathBuf,
    lines: Lines<BufReader<File>>,
    line: usize,
    depth: usize,
    look_processed: ProcessedPreference,
    local_weight: bool,
    /// Weight handed down from the parent entry, if any.
    inherited_weight: Option<f64>,
}

/// Streaming datalist resolver.
///
/// Only the chain of manifests from the root to the current one is open at
/// any time. Yields entries in depth-first order and stops for good after the
/// first error.
pub struct DatalistResolver<'r> {
    registry: &'r FormatRegistry,
    options: ResolveOptions,
    stack: Vec<Frame>,
    in_flight: HashSet<PathBuf>,
    failed: bool,
}

impl DatalistResolver<'static> {
    /// Open `path`, or the configured default manifest, against the global
    /// registry.
    ///
    /// # Errors
    ///
    /// `UnableToOpenDataListFile` if the root manifest cannot be opened.
    pub fn open(path: Option<&Path>, options: ResolveOptions) -> Result<Self> {
        Self::open_with_registry(global_registry(), path, options)
    }
}

impl<'r> DatalistResolver<'r> {
    pub fn open_with_registry(
        registry: &'r FormatRegistry,
        path: Option<&Path>,
        options: ResolveOptions,
    ) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| options.default_datalist.clone());

        let mut resolver = Self {
            registry,
            stack: Vec::new(),
            in_flight: HashSet::new(),
            failed: false,
            options,
        };

        let frame = resolver
            .open_frame(&path, 0, resolver.options.look_processed, true, None)
            .map_err(|_| SwathError::unable_to_open_datalist(&path))?;
        resolver.push(frame);
        Ok(resolver)
    }

    /// Next resolved file, `Ok(None)` once every manifest is exhausted.
    pub fn next_entry(&mut self) -> Result<Option<DataSourceEntry>> {
        if self.failed {
            return Ok(None);
        }
        let result = self.advance();
        if result.is_err() {
            self.failed = true;
            self.close_all();
        }
        result
    }

    /// Drain the remaining entries.
    pub fn collect_entries(mut self) -> Result<Vec<DataSourceEntry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Number of manifests currently open.
    pub fn open_manifests(&self) -> usize {
        self.stack.len()
    }

    /// Release every open manifest early.
    pub fn close(mut self) {
        self.close_all();
    }

    fn advance(&mut self) -> Result<Option<DataSourceEntry>> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                return Ok(None);
            };

            let text = match frame.lines.next() {
                None => {
                    self.pop();
                    continue;
                }
                Some(Err(e)) => {
                    return Err(SwathError::io(
                        format!("reading datalist {}", frame.path.display()),
                        e,
                    ))
                }
                Some(Ok(text)) => text,
            };
            frame.line += 1;

            match parser::parse_line(&text) {
                None => {}
                Some(ManifestLine::Directive(directive)) => apply_directive(frame, directive),
                Some(ManifestLine::Entry(entry)) => {
                    if let Some(resolved) = self.handle_entry(entry)? {
                        return Ok(Some(resolved));
                    }
                }
            }
        }
    }

    fn handle_entry(&mut self, entry: EntryLine) -> Result<Option<DataSourceEntry>> {
        let Some(frame) = self.stack.last() else {
            return Ok(None);
        };
        let path = parser::resolve_relative(&frame.dir, &entry.path);
        let manifest = frame.path.clone();
        let line = frame.line;
        let depth = frame.depth;
        let look_processed = frame.look_processed;
        let local_weight = frame.local_weight;
        let inherited = frame.inherited_weight;

        let format = match entry.format {
            FormatField::Explicit(id) => id,
            FormatField::Infer => match self.infer(&path) {
                Some(id) => id?,
                None => return Ok(None),
            },
            FormatField::Unparsable(token) => {
                warn!(
                    manifest = %manifest.display(),
                    line,
                    token = %token,
                    "format field is not an integer; inferring from filename"
                );
                match self.infer(&path) {
                    Some(id) => id?,
                    None => return Ok(None),
                }
            }
        };

        let local = match entry.weight {
            WeightField::Absent => None,
            WeightField::Value(w) if w > 0.0 && w.is_finite() => Some(w),
            WeightField::Value(w) => {
                warn!(
                    manifest = %manifest.display(),
                    line,
                    weight = w,
                    "non-positive weight ignored"
                );
                None
            }
            WeightField::Unparsable(token) => {
                warn!(
                    manifest = %manifest.display(),
                    line,
                    token = %token,
                    "unparsable weight ignored"
                );
                None
            }
        };

        if format.is_datalist() {
            let child_weight = match (local, inherited) {
                (Some(w), None) => Some(w),
                (Some(w), Some(_)) if local_weight => Some(w),
                (_, parent) => parent,
            };
            self.descend(&path, depth + 1, look_processed, local_weight, child_weight)?;
            return Ok(None);
        }

        if !self.registry.contains(format) {
            return Err(SwathError::IllegalFormatIdentifier(format));
        }

        let weight = match (inherited, local) {
            (Some(parent), _) if !local_weight => parent,
            (Some(parent), None) => parent,
            (_, Some(w)) => w,
            (None, None) => DEFAULT_WEIGHT,
        };

        let mut path = path;
        let mut processed = false;
        if look_processed == ProcessedPreference::Processed {
            if let Some(candidate) = parser::processed_name(&path).filter(|p| is_nonempty_file(p)) {
                debug!(
                    raw = %path.display(),
                    processed = %candidate.display(),
                    "using processed file"
                );
                path = candidate;
                processed = true;
            }
        }

        if self.options.skip_unreadable && !is_nonempty_file(&path) {
            warn!(
                manifest = %manifest.display(),
                line,
                path = %path.display(),
                "skipping missing or empty data file"
            );
            return Ok(None);
        }

        Ok(Some(DataSourceEntry {
            path,
            format,
            weight,
            manifest,
            line,
            depth,
            processed,
        }))
    }

    /// Filename inference for one entry. `None` means the entry is skipped.
    fn infer(&self, path: &Path) -> Option<Result<FormatId>> {
        match self.registry.infer_from_path(path) {
            Ok(id) => Some(Ok(id)),
            Err(e) if self.options.skip_unreadable => {
                warn!(path = %path.display(), error = %e, "skipping entry with unknown format");
                None
            }
            Err(e) => Some(Err(e)),
        }
    }

    fn descend(
        &mut self,
        path: &Path,
        depth: usize,
        look_processed: ProcessedPreference,
        local_weight: bool,
        inherited_weight: Option<f64>,
    ) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(SwathError::DataListDepthExceeded {
                path: path.to_path_buf(),
                limit: self.options.max_depth,
            });
        }

        match self.open_frame(path, depth, look_processed, local_weight, inherited_weight) {
            Ok(frame) => {
                self.push(frame);
                Ok(())
            }
            Err(e @ SwathError::DataListCycleDetected { .. }) => Err(e),
            Err(_) if self.options.skip_unreadable => {
                warn!(path = %path.display(), "skipping unreadable nested datalist");
                Ok(())
            }
            Err(_) => Err(SwathError::unable_to_open_datalist(path)),
        }
    }

    fn open_frame(
        &self,
        path: &Path,
        depth: usize,
        look_processed: ProcessedPreference,
        local_weight: bool,
        inherited_weight: Option<f64>,
    ) -> Result<Frame> {
        let canonical = fs::canonicalize(path)
            .map_err(|e| SwathError::io(format!("resolving {}", path.display()), e))?;
        if self.in_flight.contains(&canonical) {
            return Err(SwathError::DataListCycleDetected {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)
            .map_err(|e| SwathError::io(format!("opening {}", path.display()), e))?;
        debug!(path = %path.display(), depth, "opened datalist");

        Ok(Frame {
            path: path.to_path_buf(),
            dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            canonical,
            lines: BufReader::new(file).lines(),
            line: 0,
            depth,
            look_processed,
            local_weight,
            inherited_weight,
        })
    }

    fn push(&mut self, frame: Frame) {
        self.in_flight.insert(frame.canonical.clone());
        self.stack.push(frame);
    }

    fn pop(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.in_flight.remove(&frame.canonical);
            debug!(path = %frame.path.display(), lines = frame.line, "closed datalist");
        }
    }

    fn close_all(&mut self) {
        while !self.stack.is_empty() {
            self.pop();
        }
    }
}

impl Iterator for DatalistResolver<'_> {
    type Item = Result<DataSourceEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

impl std::iter::FusedIterator for DatalistResolver<'_> {}

/// `$PROCESSED` and `$RAW` only take effect while the preference is unset.
fn apply_directive(frame: &mut Frame, directive: Directive) {
    match directive {
        Directive::Processed => {
            if frame.look_processed == ProcessedPreference::Unset {
                frame.look_processed = ProcessedPreference::Processed;
            }
        }
        Directive::Raw => {
            if frame.look_processed == ProcessedPreference::Unset {
                frame.look_processed = ProcessedPreference::Raw;
            }
        }
        Directive::NoLocalWeight => frame.local_weight = false,
        Directive::Unknown(text) => {
            debug!(
                manifest = %frame.path.display(),
                line = frame.line,
                directive = %text,
                "ignoring directive"
            );
        }
    }
}

fn is_nonempty_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct TempTree(PathBuf);

    impl TempTree {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "swathio_resolver_{}_{}_{:?}",
                tag,
                std::process::id(),
                std::thread::current().id()
            ));
            let _ = fs::remove_dir_all(&dir);
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.0.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            let mut f = File::create(&path).unwrap();
            f.write_all(content.as_bytes()).unwrap();
            path
        }
    }

    impl Drop for TempTree {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn resolve(root: &Path, options: ResolveOptions) -> Result<Vec<DataSourceEntry>> {
        DatalistResolver::open(Some(root), options)?.collect_entries()
    }

    #[test]
    fn test_flat_list_with_defaults() {
        let tree = TempTree::new("flat");
        let root = tree.write(
            "list.mb-1",
            "# survey\n\na.mb71 71\nb.mb71 71 3.0\nc.a77\n",
        );
        let entries = resolve(&root, ResolveOptions::default()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].path, tree.0.join("a.mb71"));
        assert_eq!(entries[0].weight, 1.0);
        assert_eq!(entries[0].line, 3);
        assert_eq!(entries[1].weight, 3.0);
        assert_eq!(entries[2].format, FormatId(173));
        assert!(entries.iter().all(|e| e.depth == 0 && !e.processed));
    }

    #[test]
    fn test_nested_weight_inheritance() {
        let tree = TempTree::new("nested");
        tree.write("sub/inner.mb-1", "x.mb71 71\ny.mb71 71 5.0\n");
        let root = tree.write("outer.mb-1", "sub/inner.mb-1 -1 2.0\nz.mb71 71\n");

        let entries = resolve(&root, ResolveOptions::default()).unwrap();
        let weights: Vec<f64> = entries.iter().map(|e| e.weight).collect();
        // inherited weight applies where no local weight is given
        assert_eq!(weights, vec![2.0, 5.0, 1.0]);
        assert_eq!(entries[0].path, tree.0.join("sub").join("x.mb71"));
        assert_eq!(entries[0].depth, 1);
        assert_eq!(entries[2].depth, 0);
    }

    #[test]
    fn test_no_local_weight() {
        let tree = TempTree::new("nolocal");
        tree.write("inner.mb-1", "x.mb71 71 5.0\n");
        let root = tree.write("outer.mb-1", "$NOLOCALWEIGHT\ninner.mb-1 -1 2.0\n");

        let entries = resolve(&root, ResolveOptions::default()).unwrap();
        assert_eq!(entries[0].weight, 2.0);
    }

    #[test]
    fn test_processed_substitution() {
        let tree = TempTree::new("processed");
        tree.write("raw.mb71", "raw");
        tree.write("rawp.mb71", "processed");
        tree.write("other.mb71", "raw");
        let root = tree.write("list.mb-1", "$PROCESSED\nraw.mb71 71\nother.mb71 71\n");

        let entries = resolve(&root, ResolveOptions::default()).unwrap();
        assert_eq!(entries[0].path, tree.0.join("rawp.mb71"));
        assert!(entries[0].processed);
        assert_eq!(entries[1].path, tree.0.join("other.mb71"));
        assert!(!entries[1].processed);

        let options = ResolveOptions {
            look_processed: ProcessedPreference::Raw,
            ..ResolveOptions::default()
        };
        let entries = resolve(&root, options).unwrap();
        assert!(!entries[0].processed);
    }

    #[test]
    fn test_cycle_detected() {
        let tree = TempTree::new("cycle");
        tree.write("b.mb-1", "a.mb-1 -1\n");
        let root = tree.write("a.mb-1", "first.mb71 71\nb.mb-1 -1\n");

        let mut resolver = DatalistResolver::open(Some(&root), ResolveOptions::default()).unwrap();
        assert!(resolver.next_entry().unwrap().is_some());
        assert!(matches!(
            resolver.next_entry(),
            Err(SwathError::DataListCycleDetected { .. })
        ));
        assert!(resolver.next_entry().unwrap().is_none());
        assert_eq!(resolver.open_manifests(), 0);
    }

    #[test]
    fn test_depth_limit() {
        let tree = TempTree::new("depth");
        tree.write("l2.mb-1", "leaf.mb71 71\n");
        tree.write("l1.mb-1", "l2.mb-1 -1\n");
        let root = tree.write("l0.mb-1", "l1.mb-1 -1\n");

        let options = ResolveOptions {
            max_depth: 1,
            ..ResolveOptions::default()
        };
        assert!(matches!(
            resolve(&root, options),
            Err(SwathError::DataListDepthExceeded { limit: 1, .. })
        ));
        assert_eq!(resolve(&root, ResolveOptions::default()).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_root() {
        let err = DatalistResolver::open(
            Some(Path::new("/nonexistent/swathio/list.mb-1")),
            ResolveOptions::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, SwathError::UnableToOpenDataListFile { .. }));
    }

    #[test]
    fn test_skip_unreadable() {
        let tree = TempTree::new("skip");
        tree.write("present.mb71", "data");
        let root = tree.write(
            "list.mb-1",
            "missing.mb71 71\nmissing.mb-1 -1\npresent.mb71 71\nnoformat.zzz\n",
        );

        assert!(matches!(
            resolve(&root, ResolveOptions::default()),
            Err(SwathError::UnableToOpenDataListFile { .. })
        ));

        let options = ResolveOptions {
            skip_unreadable: true,
            ..ResolveOptions::default()
        };
        let entries = resolve(&root, options).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, tree.0.join("present.mb71"));
    }

    #[test]
    fn test_unregistered_explicit_format() {
        let tree = TempTree::new("illegal");
        let root = tree.write("list.mb-1", "a.mb71 9999\n");
        assert!(matches!(
            resolve(&root, ResolveOptions::default()),
            Err(SwathError::IllegalFormatIdentifier(FormatId(9999)))
        ));
    }
}
