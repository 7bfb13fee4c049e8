//! Configuration sections and their compiled defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[generation]`: values that shape the note track and labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub bpm: f64,
    /// (numerator, denominator)
    pub time_signature: (u8, u8),
    pub base_pitch: u8,
    pub label_lead_silence: f64,
    pub label_trail_silence: f64,
    pub underscore_as_rest: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            time_signature: (4, 4),
            base_pitch: 64,
            label_lead_silence: 0.5,
            label_trail_silence: 0.5,
            underscore_as_rest: false,
        }
    }
}

/// `[output]`: where artifacts go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub midi_path: PathBuf,
    pub labels_path: PathBuf,
    pub write_labels: bool,
    /// "tsv" or "json"
    pub labels_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            midi_path: PathBuf::from("output.mid"),
            labels_path: PathBuf::from("labels.txt"),
            write_labels: true,
            labels_format: "tsv".to_string(),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive string
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
