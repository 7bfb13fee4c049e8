//! Timeline scheduling.
//!
//! Walks the text line by line and turns each line (or each word of a
//! line) into notes on a single timeline, with one label spanning the notes
//! of every item. All times are in seconds.
//!
//! A line that is one whitespace-free token longer than a character is a
//! *cluster*: it is sung as one item and gets one label carrying the line
//! as written. Any other line is a *word line*, and each word becomes its
//! own item and label.
//!
//! Labels never overlap: a label's start is pulled forward to the previous
//! label's end when its lead silence would reach back past it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::script;
use crate::settings::Settings;
use crate::unit::Unit;

/// Length of every sung note.
pub const NOTE_DURATION: f64 = 2.0;

/// Gap contributed by one rest marker. Shorter than a note.
pub const REST_DURATION: f64 = 0.5;

/// Silence before the first item and after each item.
pub const INTER_ITEM_SILENCE: f64 = 2.0;

/// Silence appended after the last item.
pub const FINAL_SILENCE: f64 = 2.0;

/// Note-on velocity for every note.
pub const VELOCITY: u8 = 100;

/// A note placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNote {
    pub start: f64,
    pub duration: f64,
    pub pitch: u8,
    pub velocity: u8,
}

impl ScheduledNote {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A text span aligned to the notes it annotates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub notes: Vec<ScheduledNote>,
    pub labels: Vec<Label>,
    /// Seconds, including trailing silence
    pub total_duration: f64,
}

/// How a non-blank line is scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// One token sung as a single labeled item
    Cluster(&'a str),
    /// Independently labeled words
    Words(Vec<&'a str>),
}

/// Classify a line, or `None` for a blank one.
pub fn classify_line(line: &str) -> Option<LineKind<'_>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.len() == 1 && trimmed.chars().count() > 1 {
        Some(LineKind::Cluster(trimmed))
    } else {
        Some(LineKind::Words(words))
    }
}

/// Schedule `text` into notes and labels.
///
/// Never fails. Settings are assumed valid (see [`Settings::validate`]).
/// Calling this twice with the same arguments gives identical results.
pub fn schedule(settings: &Settings, text: &str) -> Schedule {
    let mut timeline = Timeline::new(settings);

    for line in text.lines() {
        match classify_line(line) {
            None => continue,
            Some(LineKind::Cluster(token)) => {
                let units = timeline.playable(script::tokenize(token));
                timeline.schedule_item(&units, token.to_string());
            }
            Some(LineKind::Words(words)) => {
                for word in words {
                    let units = timeline.playable(script::tokenize(word));
                    let text = units.iter().map(Unit::as_str).collect();
                    timeline.schedule_item(&units, text);
                }
            }
        }
    }

    timeline.finish()
}

/// Rough upper bound for per-side label silence that keeps labels apart.
///
/// Half the smallest gap between consecutive items, never below 0.1 s.
/// With fewer than two items the lead-in silence is the only limit. This
/// is advice for picking a setting; `schedule` clamps labels regardless.
pub fn max_label_silence(settings: &Settings, text: &str) -> f64 {
    let bare = Settings {
        label_lead_silence: 0.0,
        label_trail_silence: 0.0,
        ..settings.clone()
    };
    let schedule = schedule(&bare, text);

    let smallest_gap = schedule
        .labels
        .windows(2)
        .map(|pair| pair[1].start - pair[0].end)
        .fold(None, |acc: Option<f64>, gap| {
            Some(acc.map_or(gap, |a| a.min(gap)))
        });

    match smallest_gap {
        Some(gap) => (gap / 2.0).max(0.1),
        None => INTER_ITEM_SILENCE,
    }
}

/// Per-call scheduling state: the cursor and everything emitted so far.
struct Timeline<'s> {
    settings: &'s Settings,
    cursor: f64,
    notes: Vec<ScheduledNote>,
    labels: Vec<Label>,
}

impl<'s> Timeline<'s> {
    fn new(settings: &'s Settings) -> Self {
        Timeline {
            settings,
            cursor: INTER_ITEM_SILENCE,
            notes: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Drop rest markers unless rests are enabled.
    fn playable(&self, units: Vec<Unit>) -> Vec<Unit> {
        if self.settings.underscore_as_rest {
            units
        } else {
            units.into_iter().filter(|u| !u.is_rest()).collect()
        }
    }

    /// Place one item's units and its label, then the inter-item silence.
    fn schedule_item(&mut self, units: &[Unit], text: String) {
        if units.is_empty() {
            return;
        }

        let item_start = self.cursor;
        let first_note = self.notes.len();
        // A rest right after a note is taken as that note's trailing gap,
        // so each marker adds exactly one REST_DURATION.
        let mut rest_taken = false;

        for (i, unit) in units.iter().enumerate() {
            match unit {
                Unit::Rest => {
                    if rest_taken {
                        rest_taken = false;
                    } else {
                        self.cursor += REST_DURATION;
                    }
                }
                Unit::Sung(_) => {
                    self.notes.push(ScheduledNote {
                        start: self.cursor,
                        duration: NOTE_DURATION,
                        pitch: self.settings.base_pitch,
                        velocity: VELOCITY,
                    });
                    self.cursor += NOTE_DURATION;

                    if units.get(i + 1).is_some_and(Unit::is_rest) {
                        self.cursor += REST_DURATION;
                        rest_taken = true;
                    }
                }
            }
        }

        debug!(
            text = %text,
            start = item_start,
            end = self.cursor,
            notes = self.notes.len() - first_note,
            "scheduled item"
        );

        self.push_label(item_start, text);
        self.cursor += INTER_ITEM_SILENCE;
    }

    fn push_label(&mut self, item_start: f64, text: String) {
        let mut start = (item_start - self.settings.label_lead_silence).max(0.0);
        if let Some(previous) = self.labels.last() {
            start = start.max(previous.end);
        }
        let end = self.cursor + self.settings.label_trail_silence;

        self.labels.push(Label { start, end, text });
    }

    fn finish(mut self) -> Schedule {
        // Empty runs still cover one label's worth of silence.
        let silences = self.settings.label_lead_silence + self.settings.label_trail_silence;
        let content_end = self.cursor.max(silences);
        let total_duration = content_end + FINAL_SILENCE;

        if let Some(last) = self.labels.last_mut() {
            last.end = last.end.min(total_duration - FINAL_SILENCE).max(last.start);
        }

        debug!(
            notes = self.notes.len(),
            labels = self.labels.len(),
            total_duration,
            "schedule complete"
        );

        Schedule {
            notes: self.notes,
            labels: self.labels,
            total_duration,
        }
    }
}
