//! Lyric text to MIDI notes and aligned labels.
//!
//! Turns romaji, hiragana or katakana text into one note per phonetic unit
//! on a single timeline, plus a label per line or word for
//! singing-synthesizer alignment.
//!
//! # Example
//!
//! ```
//! use lyricmidi::{generate, Settings};
//!
//! let settings = Settings::default();
//! let output = generate(&settings, "あ\nいう\n").unwrap();
//!
//! assert_eq!(output.schedule.notes.len(), 3);
//! assert_eq!(output.schedule.labels[1].text, "いう");
//! assert_eq!(&output.midi[0..4], b"MThd");
//! ```

pub mod emit;
pub mod kana;
pub mod labels;
pub mod midi;
pub mod romaji;
pub mod schedule;
pub mod script;
pub mod settings;
pub mod unit;

pub use emit::{note_name, note_track, NoteEvent};
pub use labels::{to_tsv, LabelFormat, LabelWriter};
pub use schedule::{max_label_silence, schedule, Label, Schedule, ScheduledNote};
pub use script::{classify, tokenize, Script};
pub use settings::Settings;
pub use unit::Unit;

/// Errors from validation and output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("unknown label format: {0} (expected tsv or json)")]
    UnknownLabelFormat(String),

    #[error("note track does not fit in a MIDI file: {0}")]
    TickOverflow(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Result of a full generation run.
#[derive(Debug, Clone)]
pub struct Generation {
    pub schedule: Schedule,
    pub track: Vec<NoteEvent>,
    /// SMF format 0 bytes
    pub midi: Vec<u8>,
}

/// Validate settings, schedule `text`, and render the MIDI track.
pub fn generate(settings: &Settings, text: &str) -> Result<Generation> {
    settings.validate()?;

    let schedule = schedule::schedule(settings, text);
    let track = emit::note_track(&schedule.notes, settings);
    let midi = midi::to_midi(&track, settings)?;

    tracing::info!(
        notes = track.len(),
        labels = schedule.labels.len(),
        total_duration = schedule.total_duration,
        bytes = midi.len(),
        "rendered MIDI track"
    );

    Ok(Generation {
        schedule,
        track,
        midi,
    })
}
