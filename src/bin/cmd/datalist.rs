// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Datalist command - expand manifests into data files.

use std::path::PathBuf;

use clap::Args;

use crate::common::{open_datalist, ResolveArgs, Result};
use swathio::EngineConfig;

/// Expand a datalist.
#[derive(Args, Clone, Debug)]
pub struct DatalistCmd {
    /// Datalist to expand (default from configuration)
    #[arg(value_name = "DATALIST")]
    input: Option<PathBuf>,

    #[command(flatten)]
    resolve: ResolveArgs,

    /// Also print the manifest and line naming each file
    #[arg(long)]
    origin: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl DatalistCmd {
    pub fn run(self, config: &EngineConfig) -> Result<()> {
        let resolver = open_datalist(self.input.as_deref(), &self.resolve, config)?;

        if self.json {
            let entries = resolver.collect_entries()?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        // Printed as resolved so large trees start producing output at once.
        for entry in resolver {
            let entry = entry?;
            if self.origin {
                println!(
                    "{} {} {} # {}:{}",
                    entry.path.display(),
                    entry.format,
                    entry.weight,
                    entry.manifest.display(),
                    entry.line
                );
            } else {
                println!("{} {} {}", entry.path.display(), entry.format, entry.weight);
            }
        }
        Ok(())
    }
}
