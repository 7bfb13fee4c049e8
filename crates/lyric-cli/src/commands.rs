//! CLI command implementations

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use lyricconf::{ConfigSources, GenerationConfig, LyricConfig};
use lyricmidi::labels::write_labels;
use lyricmidi::{max_label_silence, note_name, Label, LabelFormat, Settings};
use tracing::{info, warn};

/// Flags that override `[generation]` and `[output]` for one run.
#[derive(Args, Debug, Default, Clone)]
pub struct GenerationOverrides {
    /// MIDI output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Label output path
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// Skip writing the label file
    #[arg(long)]
    pub no_labels: bool,

    /// Label file format: tsv or json
    #[arg(long)]
    pub labels_format: Option<String>,

    /// Tempo in beats per minute
    #[arg(long)]
    pub bpm: Option<f64>,

    /// Time signature, e.g. 3/4
    #[arg(long)]
    pub time_signature: Option<String>,

    /// MIDI pitch for every note (0-127)
    #[arg(short, long)]
    pub pitch: Option<u8>,

    /// Label lead and trail silence in seconds
    #[arg(long)]
    pub label_silence: Option<f64>,

    /// Treat '_' as a rest
    #[arg(long)]
    pub rests: bool,
}

/// Map the config section onto generator settings.
pub fn settings_from(config: &GenerationConfig) -> Settings {
    Settings {
        bpm: config.bpm,
        time_sig_numerator: config.time_signature.0,
        time_sig_denominator: config.time_signature.1,
        base_pitch: config.base_pitch,
        label_lead_silence: config.label_lead_silence,
        label_trail_silence: config.label_trail_silence,
        underscore_as_rest: config.underscore_as_rest,
    }
}

/// Config settings with command-line flags applied on top.
pub fn resolve_settings(config: &LyricConfig, overrides: &GenerationOverrides) -> Result<Settings> {
    let mut settings = settings_from(&config.generation);

    if let Some(bpm) = overrides.bpm {
        settings.bpm = bpm;
    }
    if let Some(sig) = &overrides.time_signature {
        let (num, den) = parse_time_signature(sig)?;
        settings.time_sig_numerator = num;
        settings.time_sig_denominator = den;
    }
    if let Some(pitch) = overrides.pitch {
        settings.base_pitch = pitch;
    }
    if let Some(silence) = overrides.label_silence {
        settings = settings.with_label_silence(silence);
    }
    if overrides.rests {
        settings.underscore_as_rest = true;
    }

    Ok(settings)
}

/// Parse "N/D" into a time signature pair.
pub fn parse_time_signature(text: &str) -> Result<(u8, u8)> {
    let Some((num, den)) = text.split_once('/') else {
        bail!("Invalid time signature '{}': expected N/D, e.g. 3/4", text);
    };
    let num = num
        .trim()
        .parse()
        .with_context(|| format!("Invalid time signature numerator in '{}'", text))?;
    let den = den
        .trim()
        .parse()
        .with_context(|| format!("Invalid time signature denominator in '{}'", text))?;
    Ok((num, den))
}

/// Read a file, or stdin for "-".
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read text from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

/// Generate and write the MIDI file and (optionally) the label file
pub fn generate(config: &LyricConfig, input: &str, overrides: &GenerationOverrides) -> Result<()> {
    let settings = resolve_settings(config, overrides)?;
    let text = read_input(input)?;

    let suggested = max_label_silence(&settings, &text);
    if settings.label_lead_silence.max(settings.label_trail_silence) > suggested {
        warn!(
            lead = settings.label_lead_silence,
            trail = settings.label_trail_silence,
            suggested,
            "label silence is larger than the spacing between items; labels will be clamped"
        );
    }

    let output = lyricmidi::generate(&settings, &text).context("Failed to generate MIDI")?;
    info!(
        bpm = settings.bpm,
        pitch = %note_name(settings.base_pitch),
        notes = output.track.len(),
        "generated note track"
    );

    let midi_path = overrides
        .output
        .clone()
        .unwrap_or_else(|| config.output.midi_path.clone());
    std::fs::write(&midi_path, &output.midi)
        .with_context(|| format!("Failed to write {}", midi_path.display()))?;
    info!(path = %midi_path.display(), bytes = output.midi.len(), "wrote MIDI");

    let write_label_file = config.output.write_labels && !overrides.no_labels;
    if write_label_file {
        let format: LabelFormat = overrides
            .labels_format
            .as_deref()
            .unwrap_or(&config.output.labels_format)
            .parse()?;
        let labels_path = overrides
            .labels
            .clone()
            .unwrap_or_else(|| config.output.labels_path.clone());
        write_labels(&output.schedule.labels, format, &labels_path)
            .with_context(|| format!("Failed to write {}", labels_path.display()))?;
        info!(path = %labels_path.display(), %format, "wrote labels");
    }

    println!(
        "Total duration: {:.2} seconds",
        output.schedule.total_duration
    );
    if write_label_file {
        println!();
        print!("{}", preview_table(&output.schedule.labels));
    }

    Ok(())
}

/// Fixed-width start/end/text table of labels.
pub fn preview_table(labels: &[Label]) -> String {
    let mut out = format!("{:>4}  {:>9}  {:>9}  {}\n", "#", "start", "end", "text");
    for (i, label) in labels.iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:>9.3}  {:>9.3}  {}\n",
            i, label.start, label.end, label.text
        ));
    }
    out
}

/// Print each token's units, one token per line
pub fn tokenize(text: &str) {
    for token in text.split_whitespace() {
        let units = lyricmidi::tokenize(token);
        let rendered: Vec<&str> = units.iter().map(|u| u.as_str()).collect();
        println!(
            "{}\t{:?}\t{}",
            token,
            lyricmidi::classify(token),
            rendered.join(" | ")
        );
    }
}

/// Print the advisory maximum label silence for a text
pub fn hint(config: &LyricConfig, input: &str, rests: bool) -> Result<()> {
    let overrides = GenerationOverrides {
        rests,
        ..GenerationOverrides::default()
    };
    let settings = resolve_settings(config, &overrides)?;
    let text = read_input(input)?;

    println!(
        "Maximum label silence: {:.1} seconds",
        max_label_silence(&settings, &text)
    );
    Ok(())
}

/// Print the effective config and where it came from
pub fn show_config(config: &LyricConfig, sources: &ConfigSources) {
    for file in &sources.files {
        println!("# loaded: {}", file.display());
    }
    for var in &sources.env_overrides {
        println!("# env: {}", var);
    }
    print!("{}", config.to_toml());
}
