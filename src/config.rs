//! Configuration types for httptape

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{RecorderError, Result};

/// Recorder mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Replay a recorded entry when one matches, otherwise perform the
    /// request and record it
    #[default]
    Auto,
    /// Only replay; a miss fails with `NoRecordedEntry` and never touches
    /// the network
    ReplayOnly,
    /// Always perform the request and record it, overwriting the file on
    /// the first write
    Record,
    /// Perform every request without reading or writing the file; entries
    /// stay available through `Recorder::lookup`
    Passthrough,
}

impl Mode {
    /// All modes, in discriminant order
    pub const ALL: [Mode; 4] = [Mode::Auto, Mode::ReplayOnly, Mode::Record, Mode::Passthrough];

    /// Whether stored entries are consulted before going live
    #[must_use]
    pub fn replays(self) -> bool {
        matches!(self, Mode::Auto | Mode::ReplayOnly)
    }

    /// Whether live round-trips are written to disk
    #[must_use]
    pub fn persists(self) -> bool {
        matches!(self, Mode::Auto | Mode::Record)
    }

    /// Whether the backing file is read at all
    #[must_use]
    pub fn uses_disk(self) -> bool {
        !matches!(self, Mode::Passthrough)
    }

    /// Name used in config files
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::ReplayOnly => "replay_only",
            Mode::Record => "record",
            Mode::Passthrough => "passthrough",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RecorderError;

    fn from_str(s: &str) -> Result<Self> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| RecorderError::Config(format!("Unsupported mode: {s:?}")))
    }
}

impl TryFrom<u8> for Mode {
    type Error = RecorderError;

    fn try_from(value: u8) -> Result<Self> {
        Mode::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| RecorderError::Config(format!("Unsupported mode: {value}")))
    }
}

/// Recorder configuration, loadable from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecorderConfig {
    /// Operating mode
    #[serde(default)]
    pub mode: Mode,
    /// Backing recording file; `.yml` is appended when missing
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Request headers removed before recording
    #[serde(default)]
    pub redact_request_headers: Vec<String>,
    /// Response headers removed before recording
    #[serde(default)]
    pub redact_response_headers: Vec<String>,
}

impl RecorderConfig {
    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed, or is invalid
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RecorderError::Config(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| RecorderError::Config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<()> {
        match &self.path {
            None if self.mode.uses_disk() => {
                return Err(RecorderError::Config(format!(
                    "A recording path is required in {} mode",
                    self.mode
                )));
            }
            Some(path) if path.as_os_str().is_empty() => {
                return Err(RecorderError::Config(
                    "Recording path cannot be empty".to_string(),
                ));
            }
            _ => {}
        }

        let names = self
            .redact_request_headers
            .iter()
            .chain(&self.redact_response_headers);
        for (i, name) in names.enumerate() {
            if name.trim().is_empty() {
                return Err(RecorderError::Config(format!(
                    "Redacted header {i}: name cannot be empty"
                )));
            }
        }

        Ok(())
    }
}
