// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Info command - stream files and summarise their contents.

use std::path::PathBuf;

use clap::Args;
use rayon::prelude::*;
use serde::Serialize;

use crate::common::{format_time, resolve_inputs, ProgressBar, ResolveArgs, Result};
use swathio::datalist::DataSourceEntry;
use swathio::io::{Direction, ReadMode, SwathSession};
use swathio::{EngineConfig, FormatId, Record, SessionOptions};

/// Summarise files.
#[derive(Args, Clone, Debug)]
pub struct InfoCmd {
    /// Data file or datalist (default datalist from configuration)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Format id of INPUT, -1 for a datalist (inferred from the name if omitted)
    #[arg(short = 'f', long, allow_negative_numbers = true)]
    format: Option<FormatId>,

    #[command(flatten)]
    resolve: ResolveArgs,

    /// Fail on the first undecodable record
    #[arg(long)]
    strict: bool,

    /// Worker threads (default: one per core)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Counts and extents for one file.
#[derive(Debug, Clone, Default, Serialize)]
struct FileSummary {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<FormatId>,
    comments: u64,
    survey: u64,
    nav: u64,
    sensor_aux: u64,
    unsupported: u64,
    beams: u64,
    good_beams: u64,
    flagged_beams: u64,
    null_beams: u64,
    skipped: u64,
    time_regressions: u64,
    time: Option<(f64, f64)>,
    lon: Option<(f64, f64)>,
    lat: Option<(f64, f64)>,
    depth: Option<(f64, f64)>,
}

impl FileSummary {
    fn add(&mut self, record: &Record) {
        match record {
            Record::Comment { .. } => self.comments += 1,
            Record::Survey(ping) => {
                self.survey += 1;
                for beam in &ping.beams {
                    self.beams += 1;
                    if beam.flag.state.is_usable() {
                        self.good_beams += 1;
                        if let Some(depth) = beam.depth {
                            widen(&mut self.depth, depth);
                        }
                    } else if beam.flag.state.is_flagged() {
                        self.flagged_beams += 1;
                    } else {
                        self.null_beams += 1;
                    }
                }
            }
            Record::Nav(_) => self.nav += 1,
            Record::SensorAux(_) => self.sensor_aux += 1,
            Record::Unsupported(_) => self.unsupported += 1,
        }
        if let Some(time) = record.time() {
            widen(&mut self.time, time);
        }
        if let Some(position) = record.position() {
            widen(&mut self.lon, position.lon);
            widen(&mut self.lat, position.lat);
        }
    }

    fn merge(&mut self, other: &FileSummary) {
        self.comments += other.comments;
        self.survey += other.survey;
        self.nav += other.nav;
        self.sensor_aux += other.sensor_aux;
        self.unsupported += other.unsupported;
        self.beams += other.beams;
        self.good_beams += other.good_beams;
        self.flagged_beams += other.flagged_beams;
        self.null_beams += other.null_beams;
        self.skipped += other.skipped;
        self.time_regressions += other.time_regressions;
        for (mine, theirs) in [
            (&mut self.time, other.time),
            (&mut self.lon, other.lon),
            (&mut self.lat, other.lat),
            (&mut self.depth, other.depth),
        ] {
            if let Some((lo, hi)) = theirs {
                widen(mine, lo);
                widen(mine, hi);
            }
        }
    }

    fn records(&self) -> u64 {
        self.comments + self.survey + self.nav + self.sensor_aux + self.unsupported
    }
}

fn widen(range: &mut Option<(f64, f64)>, value: f64) {
    if !value.is_finite() {
        return;
    }
    *range = Some(match *range {
        Some((lo, hi)) => (lo.min(value), hi.max(value)),
        None => (value, value),
    });
}

fn summarize(
    entry: &DataSourceEntry,
    options: &SessionOptions,
    mode: ReadMode,
) -> swathio::Result<FileSummary> {
    let mut session = SwathSession::open(&entry.path, entry.format, Direction::Read, options)?;
    let mut summary = FileSummary {
        path: entry.path.clone(),
        format: Some(entry.format),
        ..FileSummary::default()
    };
    while let Some(record) = session.read_next_record(mode)? {
        summary.add(&record);
    }
    let stats = session.stats();
    summary.skipped = stats.records_skipped;
    summary.time_regressions = stats.time_regressions;
    session.close()?;
    Ok(summary)
}

impl InfoCmd {
    pub fn run(self, config: &EngineConfig) -> Result<()> {
        let entries = resolve_inputs(self.input.as_deref(), self.format, &self.resolve, config)?;
        let options = config.session_options();
        let mode = if self.strict {
            ReadMode::Strict
        } else {
            options.read_mode
        };

        let progress = ProgressBar::new(entries.len() as u64, "info");
        let work = || {
            entries
                .par_iter()
                .map(|entry| {
                    let summary = summarize(entry, &options, mode);
                    progress.inc(1);
                    summary
                })
                .collect::<Vec<_>>()
        };
        let results = match self.jobs {
            Some(jobs) => rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()?
                .install(work),
            None => work(),
        };
        progress.finish_with_message(format!("{} files", entries.len()));

        let summaries = results.into_iter().collect::<swathio::Result<Vec<_>>>()?;
        let mut total = FileSummary::default();
        for summary in &summaries {
            total.merge(summary);
        }

        if self.json {
            let report = serde_json::json!({ "files": summaries, "total": total });
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        for summary in &summaries {
            print_summary(summary);
            println!();
        }
        if summaries.len() > 1 {
            println!("=== Total: {} files ===", summaries.len());
            print_counts(&total);
        }
        Ok(())
    }
}

fn print_summary(summary: &FileSummary) {
    println!("=== {} ===", summary.path.display());
    if let Some(format) = summary.format {
        println!("Format: {format}");
    }
    print_counts(summary);
}

fn print_counts(summary: &FileSummary) {
    println!("Records: {}", summary.records());
    println!("  Survey: {}", summary.survey);
    println!("  Navigation: {}", summary.nav);
    println!("  Comments: {}", summary.comments);
    println!("  Sensor: {}", summary.sensor_aux);
    println!("  Unsupported: {}", summary.unsupported);
    println!(
        "Beams: {} ({} good, {} flagged, {} null)",
        summary.beams, summary.good_beams, summary.flagged_beams, summary.null_beams
    );
    if summary.skipped > 0 {
        println!("Skipped records: {}", summary.skipped);
    }
    if summary.time_regressions > 0 {
        println!("Time regressions: {}", summary.time_regressions);
    }
    if let Some((start, end)) = summary.time {
        println!("Start: {}", format_time(Some(start)));
        println!("End: {}", format_time(Some(end)));
    }
    if let (Some((west, east)), Some((south, north))) = (summary.lon, summary.lat) {
        println!("Longitude: {west:.6} to {east:.6}");
        println!("Latitude: {south:.6} to {north:.6}");
    }
    if let Some((min, max)) = summary.depth {
        println!("Depth: {min:.3} to {max:.3} m");
    }
}
