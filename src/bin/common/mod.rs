// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use swathio::core::time::format_epoch;
use swathio::core::ErrorReport;
use swathio::datalist::{DataSourceEntry, DatalistResolver, ProcessedPreference};
use swathio::{global_registry, EngineConfig, FormatId, SwathError};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Program name shown in terminal error reports.
pub const PROGRAM: &str = "swathio";

/// Print `error` the traditional way and return the process exit status.
pub fn report_error(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<SwathError>() {
        Some(err) => {
            eprintln!("{}", ErrorReport::new(PROGRAM, function_name(err), err));
            err.exit_code()
        }
        None => {
            eprintln!("Error: {error:#}");
            1
        }
    }
}

/// Library entry point that reports each error kind.
pub fn function_name(error: &SwathError) -> &'static str {
    match error {
        SwathError::UnableToOpenDataListFile { .. }
        | SwathError::DataListCycleDetected { .. }
        | SwathError::DataListDepthExceeded { .. } => "DatalistResolver::next_entry",
        SwathError::IllegalFormatIdentifier(_) => "FormatRegistry::lookup",
        SwathError::UnableToInferFormat { .. } => "FormatRegistry::infer_from_path",
        SwathError::CodecUnavailable(_) => "FormatRegistry::codec_for",
        SwathError::DuplicateFormatIdentifier(_) => "RegistryBuilder::register",
        SwathError::UnableToOpenFile { .. } => "SwathSession::open",
        SwathError::RecordDecodeError { .. } | SwathError::SessionUnusable { .. } => {
            "SwathSession::read_next_record"
        }
        SwathError::RecordEncodeError { .. }
        | SwathError::UnsupportedRecordKind { .. }
        | SwathError::WrongDirection { .. } => "SwathSession::write_record",
        SwathError::StaleEditConflict { .. } => "replay",
        SwathError::EditLog { .. } => "EditLog::load",
        SwathError::Config(_) => "EngineConfig::load",
        SwathError::Io { .. } => "std::io",
    }
}

/// Datalist options shared by the commands that resolve manifests.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct ResolveArgs {
    /// Prefer processed output files
    #[arg(long, conflicts_with = "raw")]
    pub processed: bool,

    /// Use files exactly as listed
    #[arg(long)]
    pub raw: bool,

    /// Skip missing files and unreadable nested datalists
    #[arg(long)]
    pub skip_unreadable: bool,
}

/// Expand `input` into data files.
///
/// With an explicit non-datalist `format` the input is a single file; with
/// no input at all the configured default datalist is resolved.
pub fn resolve_inputs(
    input: Option<&Path>,
    format: Option<FormatId>,
    args: &ResolveArgs,
    config: &EngineConfig,
) -> Result<Vec<DataSourceEntry>> {
    let format = match (input, format) {
        (_, Some(format)) => Some(format),
        (Some(path), None) => Some(global_registry().infer_from_path(path)?),
        (None, None) => None,
    };

    if let (Some(path), Some(format)) = (input, format) {
        if !format.is_datalist() {
            global_registry().lookup(format)?;
            return Ok(vec![single_entry(path, format)]);
        }
    }

    // Collected up front: callers fan files out over a thread pool and size
    // the progress bar by the file count.
    Ok(open_datalist(input, args, config)?.collect_entries()?)
}

/// Open `input`, or the configured default datalist, for lazy resolution.
pub fn open_datalist(
    input: Option<&Path>,
    args: &ResolveArgs,
    config: &EngineConfig,
) -> Result<DatalistResolver<'static>> {
    let mut options = config.resolve_options();
    if args.processed {
        options.look_processed = ProcessedPreference::Processed;
    } else if args.raw {
        options.look_processed = ProcessedPreference::Raw;
    }
    options.skip_unreadable |= args.skip_unreadable;

    Ok(DatalistResolver::open(input, options)?)
}

fn single_entry(path: &Path, format: FormatId) -> DataSourceEntry {
    DataSourceEntry {
        path: path.to_path_buf(),
        format,
        weight: 1.0,
        manifest: PathBuf::new(),
        line: 0,
        depth: 0,
        processed: false,
    }
}

/// Format for `path`: the explicit id if given, else inferred from the name.
pub fn file_format(path: &Path, format: Option<FormatId>) -> Result<FormatId> {
    let format = match format {
        Some(format) => format,
        None => global_registry().infer_from_path(path)?,
    };
    global_registry().lookup(format)?;
    Ok(format)
}

/// Render an epoch time, or a dash when absent.
pub fn format_time(time: Option<f64>) -> String {
    time.map_or_else(|| "-".to_string(), format_epoch)
}

/// Progress bar wrapper for consistent progress reporting.
pub struct ProgressBar {
    inner: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    /// Create a new progress bar; hidden unless stderr is a terminal.
    pub fn new(total: u64, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let inner = if std::io::stderr().is_terminal() {
            let pb = indicatif::ProgressBar::new(total);
            if let Ok(style) = indicatif::ProgressStyle::default_bar().template(
                "{spinner:.green} {prefix} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
            ) {
                pb.set_style(style.progress_chars("=>-"));
            }
            pb.set_prefix(prefix);
            Some(pb)
        } else {
            None
        };

        Self { inner }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(pb) = &self.inner {
            pb.inc(delta);
        }
    }

    /// Finish the progress bar with a message.
    pub fn finish_with_message(&self, msg: String) {
        if let Some(pb) = &self.inner {
            pb.finish_with_message(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names() {
        let err = SwathError::unable_to_open_datalist("datalist.mb-1");
        assert_eq!(function_name(&err), "DatalistResolver::next_entry");
        let err = SwathError::IllegalFormatIdentifier(FormatId(5));
        assert_eq!(function_name(&err), "FormatRegistry::lookup");
    }

    #[test]
    fn test_report_exit_codes() {
        let err = anyhow::Error::new(SwathError::CodecUnavailable(FormatId(121)));
        assert_eq!(report_error(&err), 3);
        let err = anyhow::anyhow!("plain failure");
        assert_eq!(report_error(&err), 1);
    }

    #[test]
    fn test_single_file_input() {
        let entries = resolve_inputs(
            Some(Path::new("line.a77")),
            None,
            &ResolveArgs::default(),
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].format, FormatId(173));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(None), "-");
        assert_eq!(format_time(Some(0.0)), "1970-01-01 00:00:00.000 UTC");
    }
}
