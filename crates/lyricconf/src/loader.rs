//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, LyricConfig};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
/// Returns paths in load order (system, user, local/cli).
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/lyricmidi/config.toml");
    if system.exists() {
        files.push(system);
    }

    // XDG_CONFIG_HOME or ~/.config
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("lyricmidi/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("lyricmidi.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read a TOML file and overlay the keys it sets onto `config`.
pub fn apply_file(config: &mut LyricConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    apply_toml(config, &contents, path)
}

/// Overlay TOML text onto `config`. Keys that are absent keep their value.
fn apply_toml(config: &mut LyricConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let fields = Fields { path };

    if let Some(section) = fields.section(&table, "generation")? {
        let generation = &mut config.generation;
        if let Some(v) = fields.number(section, "bpm")? {
            generation.bpm = v;
        }
        if let Some(v) = section.get("time_signature") {
            generation.time_signature = fields.time_signature(v)?;
        }
        if let Some(v) = fields.small_int(section, "base_pitch")? {
            generation.base_pitch = v;
        }
        if let Some(v) = fields.number(section, "label_silence")? {
            generation.label_lead_silence = v;
            generation.label_trail_silence = v;
        }
        if let Some(v) = fields.number(section, "label_lead_silence")? {
            generation.label_lead_silence = v;
        }
        if let Some(v) = fields.number(section, "label_trail_silence")? {
            generation.label_trail_silence = v;
        }
        if let Some(v) = fields.boolean(section, "underscore_as_rest")? {
            generation.underscore_as_rest = v;
        }
    }

    if let Some(section) = fields.section(&table, "output")? {
        if let Some(v) = fields.string(section, "midi_path")? {
            config.output.midi_path = expand_path(&v);
        }
        if let Some(v) = fields.string(section, "labels_path")? {
            config.output.labels_path = expand_path(&v);
        }
        if let Some(v) = fields.boolean(section, "write_labels")? {
            config.output.write_labels = v;
        }
        if let Some(v) = fields.string(section, "labels_format")? {
            config.output.labels_format = v;
        }
    }

    if let Some(section) = fields.section(&table, "logging")? {
        if let Some(v) = fields.string(section, "log_level")? {
            config.logging.log_level = v;
        }
    }

    Ok(())
}

/// Typed lookups that report the offending file and key on mismatch.
struct Fields<'p> {
    path: &'p Path,
}

impl Fields<'_> {
    fn error(&self, message: String) -> ConfigError {
        ConfigError::Parse {
            path: self.path.to_path_buf(),
            message,
        }
    }

    fn section<'t>(
        &self,
        table: &'t toml::Table,
        name: &str,
    ) -> Result<Option<&'t toml::Table>, ConfigError> {
        match table.get(name) {
            None => Ok(None),
            Some(v) => v
                .as_table()
                .map(Some)
                .ok_or_else(|| self.error(format!("[{}] must be a table", name))),
        }
    }

    fn number(&self, table: &toml::Table, key: &str) -> Result<Option<f64>, ConfigError> {
        match table.get(key) {
            None => Ok(None),
            Some(toml::Value::Float(f)) => Ok(Some(*f)),
            Some(toml::Value::Integer(i)) => Ok(Some(*i as f64)),
            Some(_) => Err(self.error(format!("{} must be a number", key))),
        }
    }

    fn small_int(&self, table: &toml::Table, key: &str) -> Result<Option<u8>, ConfigError> {
        match table.get(key) {
            None => Ok(None),
            Some(v) => self.to_u8(v, key).map(Some),
        }
    }

    fn to_u8(&self, value: &toml::Value, key: &str) -> Result<u8, ConfigError> {
        value
            .as_integer()
            .and_then(|i| u8::try_from(i).ok())
            .ok_or_else(|| self.error(format!("{} must be an integer 0-255", key)))
    }

    fn boolean(&self, table: &toml::Table, key: &str) -> Result<Option<bool>, ConfigError> {
        match table.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_bool()
                .map(Some)
                .ok_or_else(|| self.error(format!("{} must be true or false", key))),
        }
    }

    fn string(&self, table: &toml::Table, key: &str) -> Result<Option<String>, ConfigError> {
        match table.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| self.error(format!("{} must be a string", key))),
        }
    }

    fn time_signature(&self, value: &toml::Value) -> Result<(u8, u8), ConfigError> {
        match value.as_array().map(|a| a.as_slice()) {
            Some([num, den]) => Ok((
                self.to_u8(num, "time_signature")?,
                self.to_u8(den, "time_signature")?,
            )),
            _ => Err(self.error(
                "time_signature must be a two-element array like [4, 4]".to_string(),
            )),
        }
    }
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut LyricConfig, sources: &mut ConfigSources) {
    apply_env_overrides_from(config, sources, env::vars());
}

/// Apply overrides from an explicit set of variables.
pub fn apply_env_overrides_from(
    config: &mut LyricConfig,
    sources: &mut ConfigSources,
    vars: impl IntoIterator<Item = (String, String)>,
) {
    let mut rust_log = None;

    for (key, value) in vars {
        let applied = match key.as_str() {
            "LYRICMIDI_BPM" => value.parse().map(|v| config.generation.bpm = v).is_ok(),
            "LYRICMIDI_BASE_PITCH" => value
                .parse()
                .map(|v| config.generation.base_pitch = v)
                .is_ok(),
            "LYRICMIDI_UNDERSCORE_AS_REST" => parse_bool(&value)
                .map(|v| config.generation.underscore_as_rest = v)
                .is_some(),
            "LYRICMIDI_LABEL_SILENCE" => value
                .parse()
                .map(|v: f64| {
                    config.generation.label_lead_silence = v;
                    config.generation.label_trail_silence = v;
                })
                .is_ok(),
            "LYRICMIDI_MIDI_PATH" => {
                config.output.midi_path = expand_path(&value);
                true
            }
            "LYRICMIDI_LABELS_PATH" => {
                config.output.labels_path = expand_path(&value);
                true
            }
            "LYRICMIDI_LOG_LEVEL" => {
                config.logging.log_level = value;
                true
            }
            // Applied last so it wins over LYRICMIDI_LOG_LEVEL
            "RUST_LOG" => {
                rust_log = Some(value);
                false
            }
            _ => false,
        };

        if applied {
            sources.env_overrides.push(key);
        }
    }

    if let Some(level) = rust_log {
        config.logging.log_level = level;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(stripped);
        }
        PathBuf::from(path)
    } else if let Some(stripped) = path.strip_prefix('$') {
        // $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            match env::var(var_name) {
                Ok(var_value) => PathBuf::from(var_value).join(&stripped[slash_pos + 1..]),
                Err(_) => PathBuf::from(path),
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::{GenerationConfig, OutputConfig};

    fn parse(toml: &str) -> Result<LyricConfig, ConfigError> {
        let mut config = LyricConfig::default();
        apply_toml(&mut config, toml, Path::new("test.toml"))?;
        Ok(config)
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path("~/test/path");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_absolute() {
        assert_eq!(expand_path("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = parse("[generation]\nbpm = 90\n").unwrap();
        assert_eq!(config.generation.bpm, 90.0);
        // Other values should be defaults
        assert_eq!(config.generation.base_pitch, 64);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
[generation]
bpm = 140.5
time_signature = [3, 8]
base_pitch = 60
label_lead_silence = 0.25
label_trail_silence = 0.75
underscore_as_rest = true

[output]
midi_path = "/tmp/song.mid"
labels_path = "/tmp/song.lab"
write_labels = false
labels_format = "json"

[logging]
log_level = "debug"
"#;
        let config = parse(toml).unwrap();

        assert_eq!(
            config.generation,
            GenerationConfig {
                bpm: 140.5,
                time_signature: (3, 8),
                base_pitch: 60,
                label_lead_silence: 0.25,
                label_trail_silence: 0.75,
                underscore_as_rest: true,
            }
        );
        assert_eq!(config.output.midi_path, PathBuf::from("/tmp/song.mid"));
        assert_eq!(config.output.labels_path, PathBuf::from("/tmp/song.lab"));
        assert!(!config.output.write_labels);
        assert_eq!(config.output.labels_format, "json");
        assert_eq!(config.logging.log_level, "debug");
    }

    #[test]
    fn test_label_silence_sets_both_sides() {
        let config = parse("[generation]\nlabel_silence = 0.3\n").unwrap();
        assert_eq!(config.generation.label_lead_silence, 0.3);
        assert_eq!(config.generation.label_trail_silence, 0.3);
    }

    #[test]
    fn test_later_files_overlay_earlier() {
        let mut config = LyricConfig::default();
        apply_toml(
            &mut config,
            "[generation]\nbpm = 100\nbase_pitch = 70\n",
            Path::new("a.toml"),
        )
        .unwrap();
        apply_toml(&mut config, "[generation]\nbpm = 80\n", Path::new("b.toml")).unwrap();

        assert_eq!(config.generation.bpm, 80.0);
        assert_eq!(config.generation.base_pitch, 70);
    }

    #[test]
    fn test_wrong_types_are_errors() {
        assert!(parse("[generation]\nbpm = \"fast\"\n").is_err());
        assert!(parse("[generation]\nbase_pitch = 300\n").is_err());
        assert!(parse("[generation]\ntime_signature = [4]\n").is_err());
        assert!(parse("generation = 5\n").is_err());
        assert!(parse("this is not toml").is_err());
    }

    #[test]
    fn test_apply_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = apply_file(&mut LyricConfig::default(), &path).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_cli_path_replaces_local() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[generation]\nbpm = 77\n").unwrap();

        let files = discover_config_files_with_override(Some(&path));
        assert_eq!(files.last(), Some(&path));

        let (config, sources) = LyricConfig::load_with_sources_from(Some(&path)).unwrap();
        assert!(sources.files.contains(&path));
        // Env may override bpm on a developer machine; only check when unset
        if env::var("LYRICMIDI_BPM").is_err() {
            assert_eq!(config.generation.bpm, 77.0);
        }
    }

    #[test]
    fn test_env_overrides() {
        let mut config = LyricConfig::default();
        let mut sources = ConfigSources::default();
        apply_env_overrides_from(
            &mut config,
            &mut sources,
            vars(&[
                ("RUST_LOG", "trace"),
                ("LYRICMIDI_BPM", "150"),
                ("LYRICMIDI_BASE_PITCH", "not-a-number"),
                ("LYRICMIDI_UNDERSCORE_AS_REST", "yes"),
                ("LYRICMIDI_LABEL_SILENCE", "0.2"),
                ("LYRICMIDI_LOG_LEVEL", "warn"),
                ("HOME", "/home/someone"),
            ]),
        );

        assert_eq!(config.generation.bpm, 150.0);
        assert_eq!(config.generation.base_pitch, 64);
        assert!(config.generation.underscore_as_rest);
        assert_eq!(config.generation.label_lead_silence, 0.2);
        assert_eq!(config.generation.label_trail_silence, 0.2);
        assert_eq!(config.logging.log_level, "trace");
        assert_eq!(
            sources.env_overrides,
            vec![
                "LYRICMIDI_BPM",
                "LYRICMIDI_UNDERSCORE_AS_REST",
                "LYRICMIDI_LABEL_SILENCE",
                "LYRICMIDI_LOG_LEVEL",
                "RUST_LOG",
            ]
        );
    }
}
