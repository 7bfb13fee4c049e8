//! Kana tokenizer.
//!
//! Splits hiragana/katakana into sung units. Small kana fuse with the
//! character before them, a sokuon (small tsu) is absorbed into the
//! syllable that follows, and any other character stands alone. Unknown
//! characters are accepted as single units, so this never fails.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::unit::{Unit, REST_MARKER};

/// Small kana used for palatalized and contracted sounds.
static SMALL_KANA: LazyLock<HashSet<char>> =
    LazyLock::new(|| "ぁぃぅぇぉゃゅょゎァィゥェォャュョヮ".chars().collect());

/// Consonant doubling markers.
static SOKUON: LazyLock<HashSet<char>> = LazyLock::new(|| "っッ".chars().collect());

/// Small katakana, including the Ainu extension block.
static SMALL_KATAKANA: LazyLock<HashSet<char>> = LazyLock::new(|| {
    "ァィゥェォヵヶㇰㇱㇲㇳㇴㇵㇶㇷㇸㇹㇺㇻㇼㇽㇾㇿ"
        .chars()
        .collect()
});

pub fn is_small_kana(c: char) -> bool {
    SMALL_KANA.contains(&c)
}

pub fn is_sokuon(c: char) -> bool {
    SOKUON.contains(&c)
}

pub fn is_small_katakana(c: char) -> bool {
    SMALL_KATAKANA.contains(&c)
}

/// Split a kana (or unknown-script) token into units.
pub fn tokenize(text: &str) -> Vec<Unit> {
    let chars: Vec<char> = text.chars().collect();
    let mut units = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let current = chars[i];

        if current == REST_MARKER {
            units.push(Unit::Rest);
            i += 1;
            continue;
        }

        let Some(&next) = chars.get(i + 1) else {
            units.push(Unit::Sung(current.to_string()));
            break;
        };

        if is_small_kana(next) {
            units.push(Unit::Sung([current, next].iter().collect()));
            i += 2;
        } else if is_sokuon(current) && next != REST_MARKER {
            match chars.get(i + 2) {
                Some(&after) if is_small_kana(after) => {
                    units.push(Unit::Sung([next, after].iter().collect()));
                    i += 3;
                }
                _ => {
                    units.push(Unit::Sung(next.to_string()));
                    i += 2;
                }
            }
        } else if is_small_katakana(next) {
            units.push(Unit::Sung([current, next].iter().collect()));
            i += 2;
        } else {
            units.push(Unit::Sung(current.to_string()));
            i += 1;
        }
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::unit_strings;
    use pretty_assertions::assert_eq;

    fn split(text: &str) -> Vec<String> {
        unit_strings(&tokenize(text))
    }

    #[test]
    fn test_small_kana_fuses() {
        assert_eq!(split("きゃ"), vec!["きゃ"]);
        assert_eq!(split("しゅくだい"), vec!["しゅ", "く", "だ", "い"]);
        assert_eq!(split("ファイト"), vec!["ファ", "イ", "ト"]);
    }

    #[test]
    fn test_sokuon_absorbed() {
        assert_eq!(split("っか"), vec!["か"]);
        assert_eq!(split("がっこう"), vec!["が", "こ", "う"]);
        assert_eq!(split("ロケット"), vec!["ロ", "ケ", "ト"]);
    }

    #[test]
    fn test_sokuon_before_contracted_sound() {
        assert_eq!(split("っきゃ"), vec!["きゃ"]);
        assert_eq!(split("まっちゃ"), vec!["ま", "ちゃ"]);
    }

    #[test]
    fn test_trailing_sokuon_stands_alone() {
        assert_eq!(split("あっ"), vec!["あ", "っ"]);
    }

    #[test]
    fn test_sokuon_before_rest_stands_alone() {
        assert_eq!(
            tokenize("っ_か"),
            vec![Unit::sung("っ"), Unit::Rest, Unit::sung("か")]
        );
    }

    #[test]
    fn test_small_katakana_extension() {
        assert_eq!(split("トㇷ"), vec!["トㇷ"]);
        assert_eq!(split("カヵ"), vec!["カヵ"]);
    }

    #[test]
    fn test_unknown_characters_single_units() {
        assert_eq!(split("漢字!"), vec!["漢", "字", "!"]);
    }

    #[test]
    fn test_underscore_is_rest() {
        assert_eq!(
            tokenize("あ_い"),
            vec![Unit::sung("あ"), Unit::Rest, Unit::sung("い")]
        );
        assert_eq!(tokenize("_"), vec![Unit::Rest]);
    }

    #[test]
    fn test_empty() {
        assert!(tokenize("").is_empty());
    }
}
