//! Script classification for a single whitespace-free token.

use crate::unit::{Unit, REST_MARKER};
use crate::{kana, romaji};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// ASCII letters, optionally with `_` rest markers
    Romaji,
    /// Kana or anything else
    Kana,
}

/// Decide which tokenizer handles `token`.
///
/// A token is romaji when it has at least one ASCII letter and nothing but
/// ASCII letters and `_`. Everything else, mixed scripts included, is kana.
pub fn classify(token: &str) -> Script {
    let mut has_letter = false;
    for c in token.chars() {
        if c.is_ascii_alphabetic() {
            has_letter = true;
        } else if c != REST_MARKER {
            return Script::Kana;
        }
    }

    if has_letter {
        Script::Romaji
    } else {
        Script::Kana
    }
}

/// Tokenize with whichever tokenizer the token's script calls for.
pub fn tokenize(token: &str) -> Vec<Unit> {
    let units = match classify(token) {
        Script::Romaji => romaji::tokenize(token),
        Script::Kana => kana::tokenize(token),
    };
    tracing::trace!(token, units = units.len(), "tokenized");
    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::unit_strings;

    #[test]
    fn test_latin_is_romaji() {
        assert_eq!(classify("konnichiwa"), Script::Romaji);
        assert_eq!(classify("KyO"), Script::Romaji);
        assert_eq!(classify("ka_ki"), Script::Romaji);
    }

    #[test]
    fn test_kana_and_mixed_are_kana() {
        assert_eq!(classify("さくら"), Script::Kana);
        assert_eq!(classify("カタカナ"), Script::Kana);
        assert_eq!(classify("kaさ"), Script::Kana);
        assert_eq!(classify("la-la"), Script::Kana);
        assert_eq!(classify("ka1"), Script::Kana);
    }

    #[test]
    fn test_underscores_alone_are_kana() {
        assert_eq!(classify("__"), Script::Kana);
        assert_eq!(classify(""), Script::Kana);
    }

    #[test]
    fn test_tokenize_dispatches() {
        assert_eq!(unit_strings(&tokenize("shashi")), vec!["sha", "shi"]);
        assert_eq!(unit_strings(&tokenize("きゃく")), vec!["きゃ", "く"]);
        assert_eq!(unit_strings(&tokenize("a!")), vec!["a", "!"]);
    }
}
