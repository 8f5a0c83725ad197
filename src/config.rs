// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Engine configuration.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! default_datalist = "datalist.mb-1"
//! lonflip = "signed"          # negative | signed | positive
//! read_mode = "skip"          # skip | strict
//! look_processed = "unset"    # unset | yes | no
//! skip_unreadable = false
//! max_datalist_depth = 25
//! edit_time_tolerance = 0.00011
//! tool = "swathio"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{Result, SwathError};
use crate::datalist::{ProcessedPreference, ResolveOptions, DEFAULT_DATALIST, DEFAULT_MAX_DEPTH};
use crate::edit::DEFAULT_TIME_TOLERANCE;
use crate::io::{ReadMode, SessionOptions};
use crate::transform::LonflipPolicy;

/// Tool name written into edit provenance by default.
pub const DEFAULT_TOOL: &str = "swathio";

/// Defaults shared by every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Manifest opened when no datalist path is given.
    pub default_datalist: PathBuf,
    pub lonflip: LonflipPolicy,
    pub read_mode: ReadMode,
    pub look_processed: ProcessedPreference,
    pub skip_unreadable: bool,
    pub max_datalist_depth: usize,
    /// Seconds within which an edit's ping time matches a record.
    pub edit_time_tolerance: f64,
    pub tool: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_datalist: PathBuf::from(DEFAULT_DATALIST),
            lonflip: LonflipPolicy::default(),
            read_mode: ReadMode::default(),
            look_processed: ProcessedPreference::default(),
            skip_unreadable: false,
            max_datalist_depth: DEFAULT_MAX_DEPTH,
            edit_time_tolerance: DEFAULT_TIME_TOLERANCE,
            tool: DEFAULT_TOOL.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load a TOML configuration file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Config` if it is not valid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => {
                SwathError::Config(format!("{} is not valid UTF-8", path.display()))
            }
            _ => SwathError::io(format!("reading config {}", path.display()), e),
        })?;
        Self::from_toml_str(&text)
            .map_err(|e| SwathError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SwathError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_datalist_depth == 0 {
            return Err(SwathError::Config(
                "max_datalist_depth must be at least 1".to_string(),
            ));
        }
        if !(self.edit_time_tolerance.is_finite() && self.edit_time_tolerance >= 0.0) {
            return Err(SwathError::Config(format!(
                "edit_time_tolerance must be a non-negative number, got {}",
                self.edit_time_tolerance
            )));
        }
        Ok(())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            lonflip: self.lonflip,
            read_mode: self.read_mode,
            tool: self.tool.clone(),
        }
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            look_processed: self.look_processed,
            skip_unreadable: self.skip_unreadable,
            max_depth: self.max_datalist_depth,
            default_datalist: self.default_datalist.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_fields_parse() {
        let config = EngineConfig::from_toml_str(
            r#"
            default_datalist = "survey.mb-1"
            lonflip = "positive"
            read_mode = "strict"
            look_processed = "yes"
            skip_unreadable = true
            max_datalist_depth = 4
            edit_time_tolerance = 0.5
            tool = "mbclean"
            "#,
        )
        .unwrap();
        assert_eq!(config.lonflip, LonflipPolicy::ForcePositive);
        assert_eq!(config.read_mode, ReadMode::Strict);
        assert_eq!(config.look_processed, ProcessedPreference::Processed);

        let resolve = config.resolve_options();
        assert_eq!(resolve.max_depth, 4);
        assert!(resolve.skip_unreadable);
        assert_eq!(resolve.default_datalist, PathBuf::from("survey.mb-1"));

        let session = config.session_options();
        assert_eq!(session.tool, "mbclean");
        assert_eq!(session.read_mode, ReadMode::Strict);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            EngineConfig::from_toml_str("lonflip = \"sideways\""),
            Err(SwathError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("max_datalist_depth = 0"),
            Err(SwathError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("max_datalist_depth = [1"),
            Err(SwathError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            EngineConfig::load("/nonexistent/swathio.toml"),
            Err(SwathError::Io { .. })
        ));
    }
}
