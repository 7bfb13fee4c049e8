//! Scheduled notes to beat-based note-track entries.

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduledNote;
use crate::settings::Settings;

/// One note of the output track, timed in beats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: u8,
    pub start_beat: f64,
    pub duration_beat: f64,
    pub velocity: u8,
}

/// Convert scheduled notes to beats at the configured tempo.
pub fn note_track(notes: &[ScheduledNote], settings: &Settings) -> Vec<NoteEvent> {
    notes
        .iter()
        .map(|note| NoteEvent {
            pitch: note.pitch,
            start_beat: settings.seconds_to_beats(note.start),
            duration_beat: settings.seconds_to_beats(note.duration),
            velocity: note.velocity,
        })
        .collect()
}

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Scientific pitch name, e.g. 60 -> "C4".
pub fn note_name(pitch: u8) -> String {
    let name = NOTE_NAMES[(pitch % 12) as usize];
    let octave = (pitch / 12) as i8 - 1;
    format!("{}{}", name, octave)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{schedule, NOTE_DURATION};

    #[test]
    fn test_beats_follow_tempo() {
        for bpm in [60.0, 90.0, 120.0, 174.5] {
            let settings = Settings {
                bpm,
                ..Settings::default()
            };
            let schedule = schedule(&settings, "sa ku ra");
            let track = note_track(&schedule.notes, &settings);

            assert_eq!(track.len(), 3);
            for event in &track {
                assert_eq!(event.duration_beat, NOTE_DURATION * bpm / 60.0);
                assert!(event.duration_beat > 0.0);
            }
        }
    }

    #[test]
    fn test_start_beats() {
        let settings = Settings::default();
        let schedule = schedule(&settings, "あ\nいう");
        let starts: Vec<f64> = note_track(&schedule.notes, &settings)
            .iter()
            .map(|e| e.start_beat)
            .collect();
        assert_eq!(starts, vec![4.0, 12.0, 16.0]);
    }

    #[test]
    fn test_note_names() {
        assert_eq!(note_name(64), "E4");
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(21), "A0");
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(127), "G9");
    }
}
