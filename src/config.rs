//! Configuration management for the finger counter and emotion demo

use crate::constants::{
    DEFAULT_EMOTION_HISTORY, DEFAULT_FACE_BBOX_PADDING, DEFAULT_FINGER_HISTORY, DEFAULT_HYSTERESIS_FRAMES,
    DEFAULT_MAJORITY_FRACTION,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Finger counting configuration
    pub finger: FingerConfig,

    /// Emotion detection configuration
    pub emotion: EmotionConfig,

    /// Gesture recognition configuration
    pub gesture: GestureConfig,

    /// Landmark source configuration
    pub source: SourceConfig,

    /// Report output configuration
    pub output: OutputConfig,
}

/// Finger counting parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerConfig {
    /// Raw counts kept per hand side
    pub history_size: usize,

    /// Consecutive disagreeing frames needed to change a stable count
    pub hysteresis_frames: usize,
}

/// Emotion detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    /// Analyse faces at all
    pub enabled: bool,

    /// Raw labels the majority vote runs over
    pub history_size: usize,

    /// Pixels added around the face keypoints for the reported box
    pub bbox_padding: i32,

    /// Share of the window a majority is expected to reach (0.0-1.0)
    pub majority_fraction: f64,

    /// Keep the previous label when the majority falls short of the fraction
    pub hold_on_weak_majority: bool,
}

/// Gesture recognition parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Look for the L and gun hand shapes
    pub enabled: bool,
}

/// Where landmark frames come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// JSON lines on standard input
    #[default]
    Stdin,
    /// Recorded JSON lines file
    File,
    /// External perception helper
    Command,
}

/// Landmark source parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,

    /// Recorded stream, used with `file`
    pub path: Option<PathBuf>,

    /// Helper executable, used with `command`
    pub command: Option<String>,

    /// Helper arguments
    pub args: Vec<String>,
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Overlay labels as text
    #[default]
    Text,
    /// One JSON report per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(Error::ConfigError(format!("Unknown output format: {other}"))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Report output parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Add per-digit flags to the text overlay
    pub show_finger_states: bool,
}

impl Default for FingerConfig {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_FINGER_HISTORY,
            hysteresis_frames: DEFAULT_HYSTERESIS_FRAMES,
        }
    }
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            history_size: DEFAULT_EMOTION_HISTORY,
            bbox_padding: DEFAULT_FACE_BBOX_PADDING,
            majority_fraction: DEFAULT_MAJORITY_FRACTION,
            hold_on_weak_majority: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized or written
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.finger.history_size == 0 {
            return Err(Error::ConfigError(
                "Finger history size must be greater than 0".to_string(),
            ));
        }
        if self.finger.hysteresis_frames == 0 {
            return Err(Error::ConfigError(
                "Hysteresis frames must be greater than 0".to_string(),
            ));
        }

        if self.emotion.history_size == 0 {
            return Err(Error::ConfigError(
                "Emotion history size must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.emotion.majority_fraction) {
            return Err(Error::ConfigError(
                "Majority fraction must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.emotion.bbox_padding < 0 {
            return Err(Error::ConfigError("Face box padding must not be negative".to_string()));
        }

        match self.source.kind {
            SourceKind::File if self.source.path.is_none() => {
                return Err(Error::ConfigError("File source needs a path".to_string()));
            }
            SourceKind::Command if self.source.command.as_deref().map_or(true, str::is_empty) => {
                return Err(Error::ConfigError("Command source needs a command".to_string()));
            }
            _ => {}
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Finger Counter & Emotion Configuration

# Finger counting
finger:
  history_size: 5
  hysteresis_frames: 2

# Emotion detection
emotion:
  enabled: true
  history_size: 7
  bbox_padding: 20
  majority_fraction: 0.4
  hold_on_weak_majority: false

# Gesture recognition (L on the left hand, gun on the right)
gesture:
  enabled: false

# Landmark source: stdin, file or command
source:
  kind: stdin
  # path: "recordings/session.jsonl"
  # command: "python3"
  # args: ["landmark_helper.py"]

# Report output: text or json
output:
  format: text
  show_finger_states: false
"#;
