// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # swathio CLI
//!
//! Command-line front end for the swath data engine.
//!
//! ## Usage
//!
//! ```sh
//! # List supported formats
//! swathio formats
//!
//! # Expand a datalist
//! swathio datalist survey.mb-1
//!
//! # Summarise every file of a datalist
//! swathio info survey.mb-1
//!
//! # Convert a file between formats
//! swathio copy line.a77 line.mb71
//!
//! # Replay an edit log against a file
//! swathio edits line.mb71 line.swedit --output edited.mb71
//! ```

mod cmd;
mod common;

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use cmd::{CopyCmd, DatalistCmd, EditsCmd, FormatsCmd, InfoCmd};
use common::Result;
use swathio::transform::LonflipPolicy;
use swathio::EngineConfig;

/// Exit status for malformed command lines.
const USAGE_EXIT_CODE: i32 = 9;

/// swathio - swath sonar data toolkit
///
/// Reads many vendor swath formats through one record model.
#[derive(Parser, Clone)]
#[command(name = "swathio")]
#[command(about = "Swath sonar data toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Longitude convention: negative, signed, positive, or -1/0/1
    #[arg(long, global = true, allow_hyphen_values = true)]
    lonflip: Option<LonflipPolicy>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// List supported formats
    Formats(FormatsCmd),

    /// Expand a datalist into its data files
    Datalist(DatalistCmd),

    /// Summarise files or every file of a datalist
    Info(InfoCmd),

    /// Convert a file from one format to another
    Copy(CopyCmd),

    /// Replay an edit log against a file
    Edits(EditsCmd),
}

impl Cli {
    fn run(self) -> Result<()> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        if let Some(lonflip) = self.lonflip {
            config.lonflip = lonflip;
        }

        match self.command {
            Commands::Formats(cmd) => cmd.run(&config),
            Commands::Datalist(cmd) => cmd.run(&config),
            Commands::Info(cmd) => cmd.run(&config),
            Commands::Copy(cmd) => cmd.run(&config),
            Commands::Edits(cmd) => cmd.run(&config),
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => USAGE_EXIT_CODE,
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    if let Err(e) = cli.run() {
        process::exit(common::report_error(&e));
    }
}
