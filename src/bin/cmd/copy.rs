// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Copy command - convert a file between formats.

use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use crate::common::{file_format, Result};
use swathio::io::{Direction, ReadMode, SwathSession};
use swathio::{EngineConfig, FormatId};

/// Convert a file.
#[derive(Args, Clone, Debug)]
pub struct CopyCmd {
    /// Input file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Input format id (inferred from the name if omitted)
    #[arg(short = 'i', long)]
    input_format: Option<FormatId>,

    /// Output format id (inferred from the name if omitted)
    #[arg(short = 'o', long)]
    output_format: Option<FormatId>,

    /// Fail on the first undecodable record
    #[arg(long)]
    strict: bool,
}

impl CopyCmd {
    pub fn run(self, config: &EngineConfig) -> Result<()> {
        let input_format = file_format(&self.input, self.input_format)?;
        let output_format = file_format(&self.output, self.output_format)?;
        let options = config.session_options();
        let mode = if self.strict {
            ReadMode::Strict
        } else {
            options.read_mode
        };

        let mut reader = SwathSession::open(&self.input, input_format, Direction::Read, &options)?;
        let mut writer =
            SwathSession::open(&self.output, output_format, Direction::Write, &options)?;

        let mut dropped = 0u64;
        while let Some(record) = reader.read_next_record(mode)? {
            if !writer.descriptor().supports(record.kind()) {
                debug!(kind = %record.kind(), "record kind not representable in output format");
                dropped += 1;
                continue;
            }
            writer.write_record(&record)?;
        }
        reader.close()?;
        writer.close()?;

        let read = reader.stats();
        let written = writer.stats();
        println!(
            "Copied {} records from {} [{}] to {} [{}]",
            written.records_written,
            self.input.display(),
            input_format,
            self.output.display(),
            output_format
        );
        if dropped > 0 {
            println!("Dropped {dropped} records the output format cannot store");
        }
        if read.records_skipped > 0 {
            println!("Skipped {} undecodable records", read.records_skipped);
        }
        Ok(())
    }
}
