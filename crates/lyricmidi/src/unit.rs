//! Phonetic units produced by the tokenizers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text form of the rest sentinel.
pub const REST_MARKER: char = '_';

/// One sung sound, or a rest marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// A syllable-sized piece of text, never empty
    Sung(String),
    /// `_` in the input
    Rest,
}

impl Unit {
    pub fn sung(text: impl Into<String>) -> Self {
        Unit::Sung(text.into())
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Unit::Rest)
    }

    /// The unit as it appears in label text.
    pub fn as_str(&self) -> &str {
        match self {
            Unit::Sung(text) => text,
            Unit::Rest => "_",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for Unit {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Render units as plain strings, mostly for display and tests.
pub fn unit_strings(units: &[Unit]) -> Vec<String> {
    units.iter().map(|u| u.as_str().to_string()).collect()
}
