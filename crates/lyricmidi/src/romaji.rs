//! Romaji tokenizer.
//!
//! Greedy longest-match-first over a fixed table of consonant clusters,
//! vowel pairs and common three-letter syllables. Anything the table does
//! not cover falls back to consonant+vowel pairs, then single letters.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::unit::{Unit, REST_MARKER};

const VOWELS: &str = "aiueo";
const CONSONANTS: &str = "bcdfghjklmnpqrstvwxyz";

/// Known combinations. Entries longer than three letters are kept for
/// completeness but can never match a three-letter window.
static COMBINATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // consonant clusters
        "ch", "sh", "ts", "th",
        // y-glides
        "ky", "gy", "ny", "hy", "ry", "ty",
        // w-glides
        "kw", "gw",
        "dz",
        // vowel pairs
        "ai", "ei", "oi", "ui", "au", "ou", "eu",
        // syllables
        "sui", "hui", "kui", "gui", "tsui", "chui",
        "ryu", "kyu", "gyu", "hyu", "nyu",
        "sha", "shi", "shu", "sho",
        "cha", "chi", "chu", "cho",
        "tsu", "tsa", "tsi", "tso",
    ]
    .into_iter()
    .collect()
});

fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

fn is_consonant(c: char) -> bool {
    CONSONANTS.contains(c)
}

fn is_combination(chars: &[char]) -> bool {
    let s: String = chars.iter().collect();
    COMBINATIONS.contains(s.as_str())
}

/// Split a romaji token into units. Case-insensitive; `_` becomes a rest.
pub fn tokenize(text: &str) -> Vec<Unit> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    let mut units = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == REST_MARKER {
            units.push(Unit::Rest);
            i += 1;
            continue;
        }

        if let Some(len) = match_at(&chars[i..]) {
            units.push(Unit::Sung(chars[i..i + len].iter().collect()));
            i += len;
            continue;
        }

        units.push(Unit::Sung(chars[i].to_string()));
        i += 1;
    }

    units
}

/// Length of the longest multi-letter unit starting at `rest[0]`, if any.
fn match_at(rest: &[char]) -> Option<usize> {
    if rest.len() >= 3 {
        let three = &rest[..3];
        if is_combination(three) {
            return Some(3);
        }
        if is_combination(&three[..2]) && is_vowel(three[2]) {
            return Some(3);
        }
    }

    if rest.len() >= 2 {
        let two = &rest[..2];
        if is_combination(two) {
            return Some(2);
        }
        if is_consonant(two[0]) && is_vowel(two[1]) {
            return Some(2);
        }
    }

    None
}
