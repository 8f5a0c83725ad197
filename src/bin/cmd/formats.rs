// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Formats command - list the format catalog.

use clap::Args;

use crate::common::Result;
use swathio::{global_registry, EngineConfig, FormatDescriptor, FormatId};

/// List supported formats.
#[derive(Args, Clone, Debug)]
pub struct FormatsCmd {
    /// Show the full description of one format
    #[arg(long, value_name = "ID", allow_negative_numbers = true)]
    id: Option<FormatId>,

    /// Only formats with a built-in codec
    #[arg(long)]
    codecs: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl FormatsCmd {
    pub fn run(self, _config: &EngineConfig) -> Result<()> {
        let registry = global_registry();

        if let Some(id) = self.id {
            let desc = registry.lookup(id)?;
            if self.json {
                println!("{}", serde_json::to_string_pretty(desc)?);
            } else {
                println!("{desc}");
                println!(
                    "Codec:                {}",
                    if registry.has_codec(id) { "built-in" } else { "none" }
                );
            }
            return Ok(());
        }

        let formats: Vec<&FormatDescriptor> = registry
            .list_supported()
            .into_iter()
            .filter(|d| !self.codecs || registry.has_codec(d.id))
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&formats)?);
            return Ok(());
        }

        println!("Supported swath data formats:");
        println!();
        for desc in &formats {
            println!(
                "  {:>4}  {:<9} {:<6} {}{}",
                desc.id,
                desc.name,
                if desc.is_text() { "ascii" } else { "binary" },
                desc.description,
                if registry.has_codec(desc.id) { "  [codec]" } else { "" },
            );
        }
        println!();
        println!("{} formats", formats.len());
        Ok(())
    }
}
