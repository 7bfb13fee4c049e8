//! Configuration loading for lyricmidi.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins, key by key):
//! 1. `/etc/lyricmidi/config.toml` (system)
//! 2. `~/.config/lyricmidi/config.toml` (user)
//! 3. `./lyricmidi.toml`, or the path given with `--config`
//! 4. Environment variables (`LYRICMIDI_*`)
//!
//! # Example Config
//!
//! ```toml
//! [generation]
//! bpm = 120.0
//! time_signature = [4, 4]
//! base_pitch = 64
//! label_silence = 0.5          # sets lead and trail together
//! underscore_as_rest = false
//!
//! [output]
//! midi_path = "output.mid"
//! labels_path = "labels.txt"
//! write_labels = true
//! labels_format = "tsv"
//!
//! [logging]
//! log_level = "info"
//! ```

pub mod loader;
pub mod sections;

pub use loader::ConfigSources;
pub use sections::{GenerationConfig, LoggingConfig, OutputConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete lyricmidi configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LyricConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LyricConfig {
    /// Load configuration from all sources, with an optional explicit file
    /// replacing `./lyricmidi.toml`, and report where values came from.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = LyricConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::apply_file(&mut config, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        // Built by hand so the output reads like the example config
        let mut output = String::new();
        let generation = &self.generation;

        output.push_str("# lyricmidi configuration\n\n");

        output.push_str("[generation]\n");
        output.push_str(&format!("bpm = {:?}\n", generation.bpm));
        output.push_str(&format!(
            "time_signature = [{}, {}]\n",
            generation.time_signature.0, generation.time_signature.1
        ));
        output.push_str(&format!("base_pitch = {}\n", generation.base_pitch));
        output.push_str(&format!(
            "label_lead_silence = {:?}\n",
            generation.label_lead_silence
        ));
        output.push_str(&format!(
            "label_trail_silence = {:?}\n",
            generation.label_trail_silence
        ));
        output.push_str(&format!(
            "underscore_as_rest = {}\n",
            generation.underscore_as_rest
        ));

        output.push_str("\n[output]\n");
        output.push_str(&format!(
            "midi_path = {}\n",
            quoted(&self.output.midi_path.display().to_string())
        ));
        output.push_str(&format!(
            "labels_path = {}\n",
            quoted(&self.output.labels_path.display().to_string())
        ));
        output.push_str(&format!("write_labels = {}\n", self.output.write_labels));
        output.push_str(&format!(
            "labels_format = {}\n",
            quoted(&self.output.labels_format)
        ));

        output.push_str("\n[logging]\n");
        output.push_str(&format!("log_level = {}\n", quoted(&self.logging.log_level)));

        output
    }
}

/// A TOML string literal, escaped as needed.
fn quoted(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LyricConfig::default();
        assert_eq!(config.generation.bpm, 120.0);
        assert_eq!(config.generation.time_signature, (4, 4));
        assert_eq!(config.generation.base_pitch, 64);
        assert!(config.output.write_labels);
    }

    #[test]
    fn test_to_toml() {
        let config = LyricConfig::default();
        let toml = config.to_toml();
        assert!(toml.contains("[generation]"));
        assert!(toml.contains("[output]"));
        assert!(toml.contains("bpm = 120.0"));
        assert!(toml.contains("time_signature = [4, 4]"));
    }

    #[test]
    fn test_to_toml_escapes_strings() {
        let mut config = LyricConfig::default();
        config.output.midi_path = PathBuf::from(r#"out\takes\"final".mid"#);
        config.output.labels_path = PathBuf::from("labels 'a'.txt");
        config.logging.log_level = "lyricmidi=debug,\"odd\"".to_string();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("escaped.toml");
        std::fs::write(&path, config.to_toml()).unwrap();

        let mut loaded = LyricConfig::default();
        loader::apply_file(&mut loaded, &path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_to_toml_parses_back() {
        let mut config = LyricConfig::default();
        config.generation.bpm = 96.5;
        config.generation.underscore_as_rest = true;
        config.output.labels_format = "json".to_string();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.toml");
        std::fs::write(&path, config.to_toml()).unwrap();

        let mut loaded = LyricConfig::default();
        loader::apply_file(&mut loaded, &path).unwrap();
        assert_eq!(loaded, config);
    }
}
