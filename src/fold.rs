//! Character folding for Japanese search text.
//!
//! Each fold maps one character form onto a canonical one so that visually
//! equivalent spellings compare equal. Folds only touch fixed Unicode ranges;
//! anything outside them passes through unchanged.

use unicode_script::{Script, UnicodeScript};

/// Ideographic (full-width) space.
pub const IDEOGRAPHIC_SPACE: char = '\u{3000}';

const KATAKANA_FIRST: u32 = 0x30A1;
const KATAKANA_LAST: u32 = 0x30F6;
const KANA_OFFSET: u32 = 0x60;

const FULLWIDTH_OFFSET: u32 = 0xFEE0;

/// Fold a katakana character (ァ..ヶ) to its hiragana counterpart.
pub fn katakana_to_hiragana(c: char) -> char {
    let code = c as u32;
    if (KATAKANA_FIRST..=KATAKANA_LAST).contains(&code) {
        char::from_u32(code - KANA_OFFSET).unwrap_or(c)
    } else {
        c
    }
}

/// Fold a full-width digit or Latin letter to ASCII.
///
/// Full-width punctuation (！, ＃, ～ and friends) is not folded.
pub fn fullwidth_to_ascii(c: char) -> char {
    match c {
        '０'..='９' | 'Ａ'..='Ｚ' | 'ａ'..='ｚ' => {
            char::from_u32(c as u32 - FULLWIDTH_OFFSET).unwrap_or(c)
        }
        _ => c,
    }
}

/// Whitespace as browsers see it in `\s` and `trim()`: the byte order mark
/// counts, NEL (U+0085) does not.
pub fn is_search_whitespace(c: char) -> bool {
    match c {
        '\u{FEFF}' => true,
        '\u{0085}' => false,
        _ => c.is_whitespace(),
    }
}

/// Collapse runs of whitespace to a single space and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split(is_search_whitespace).filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Detect the first Japanese-script character in a string.
/// Returns None if there is no hiragana, katakana or kanji.
pub fn detect_japanese_script(s: &str) -> Option<Script> {
    s.chars()
        .map(|c| c.script())
        .find(|script| matches!(script, Script::Hiragana | Script::Katakana | Script::Han))
}

/// Map a script to a BCP 47 language tag.
/// Kanji is read as Japanese since everything we index is Japanese text.
pub fn script_to_lang(script: Script) -> &'static str {
    match script {
        Script::Hiragana | Script::Katakana | Script::Han => "ja",
        Script::Latin => "en",
        _ => "und",
    }
}
