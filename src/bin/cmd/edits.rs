// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Edits command - replay an edit log against a file.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::common::{file_format, Result};
use swathio::edit::{replay_within, BeamStates, EditLog, EditOverlay};
use swathio::io::{Direction, SwathSession};
use swathio::{EngineConfig, FormatId};

/// Replay an edit log.
#[derive(Args, Clone, Debug)]
pub struct EditsCmd {
    /// Data file the edits were made against
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Edit log file
    #[arg(value_name = "EDITS")]
    edits: PathBuf,

    /// Input format id (inferred from the name if omitted)
    #[arg(short = 'f', long)]
    format: Option<FormatId>,

    /// Write the edited records to this file, in the input format
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Ping time matching window in seconds
    #[arg(long)]
    tolerance: Option<f64>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct EditReport {
    events: usize,
    beams: usize,
    flagged_before: usize,
    flagged_after: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    beams_changed: Option<usize>,
}

impl EditsCmd {
    pub fn run(self, config: &EngineConfig) -> Result<()> {
        let format = file_format(&self.input, self.format)?;
        let options = config.session_options();
        let log = EditLog::load(&self.edits)?;

        let mut base = BeamStates::new();
        {
            let mut session = SwathSession::open(&self.input, format, Direction::Read, &options)?;
            while let Some(record) = session.read_next_record(options.read_mode)? {
                base.capture_record(&record);
            }
            session.close()?;
        }

        let tolerance = self.tolerance.unwrap_or(config.edit_time_tolerance);
        let states = replay_within(&base, log.events(), tolerance)?;
        let mut report = EditReport {
            events: log.len(),
            beams: states.len(),
            flagged_before: base.flagged().count(),
            flagged_after: states.flagged().count(),
            beams_changed: None,
        };

        if let Some(output) = &self.output {
            let overlay = EditOverlay::with_tolerance(&base, log.events(), tolerance)?;
            let mut reader = SwathSession::open(&self.input, format, Direction::Read, &options)?;
            let mut writer = SwathSession::open(output, format, Direction::Write, &options)?;
            let mut changed = 0;
            while let Some(mut record) = reader.read_next_record(options.read_mode)? {
                changed += overlay.apply(&mut record)?;
                writer.write_record(&record)?;
            }
            reader.close()?;
            writer.close()?;
            report.beams_changed = Some(changed);
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("=== {} ===", self.input.display());
        println!("Edit events: {}", report.events);
        println!("Beams: {}", report.beams);
        println!("Flagged before: {}", report.flagged_before);
        println!("Flagged after: {}", report.flagged_after);
        if let (Some(output), Some(changed)) = (&self.output, report.beams_changed) {
            println!("Wrote {} ({} beams changed)", output.display(), changed);
        }
        Ok(())
    }
}
