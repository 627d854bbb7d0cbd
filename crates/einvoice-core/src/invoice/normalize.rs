//! Text canonicalization for strings pulled out of the PDF access layer.
//!
//! Downstream phrase matching is whitespace- and character-sensitive, so every
//! extracted string goes through [`normalize`] before any rule is applied.

use unicode_normalization::UnicodeNormalization;

use super::rules::patterns::{MULTI_SPACE, TRAILING_SPACE_BEFORE_NEWLINE};

/// Typographic variants folded to canonical ASCII (or Vietnamese) forms.
/// Entries map a single source character to its replacement; an empty
/// replacement removes the character.
const CHAR_FOLD_MAP: &[(char, &str)] = &[
    // Hyphens / dashes
    ('\u{2010}', "-"), // Hyphen
    ('\u{2011}', "-"), // Non-breaking hyphen
    ('\u{2012}', "-"), // Figure dash
    ('\u{2013}', "-"), // En dash
    ('\u{2014}', "-"), // Em dash
    ('\u{2212}', "-"), // Minus sign
    ('\u{00ad}', ""),  // Soft hyphen
    // Spaces
    ('\u{00a0}', " "), // No-break space
    ('\u{2000}', " "), // En quad
    ('\u{2001}', " "), // Em quad
    ('\u{2002}', " "), // En space
    ('\u{2003}', " "), // Em space
    ('\u{2004}', " "), // Three-per-em space
    ('\u{2005}', " "), // Four-per-em space
    ('\u{2006}', " "), // Six-per-em space
    ('\u{2007}', " "), // Figure space
    ('\u{2008}', " "), // Punctuation space
    ('\u{2009}', " "), // Thin space
    ('\u{200a}', " "), // Hair space
    // Zero width / invisible
    ('\u{200b}', ""), // Zero-width space
    ('\u{200c}', ""), // ZWNJ
    ('\u{200d}', ""), // ZWJ
    ('\u{2060}', ""), // Word joiner
    // Bullets
    ('\u{2022}', "*"), // Bullet
    ('\u{f0b7}', "*"), // Private-use bullet
    ('\u{f0d8}', "*"), // Private-use bullet
    ('\u{f0e0}', "*"), // Private-use bullet
    ('\u{25cf}', "*"), // Black circle
    ('\u{25a0}', "*"), // Solid square
    // Quotes
    ('\u{201c}', "\""),
    ('\u{201d}', "\""),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    // Vietnamese letter fixes: eth glyphs emitted for đ/Đ by some producers
    ('\u{00f0}', "đ"),
    ('\u{00d0}', "Đ"),
];

fn fold_char(c: char) -> Option<&'static str> {
    CHAR_FOLD_MAP
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// Control characters stripped from extracted text. Tab and newline carry
/// layout information and are preserved.
fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0b}'..='\u{1f}' | '\u{7f}')
}

/// Normalize a possibly-absent extracted string. Absent input yields an
/// empty string, never panics or errors.
pub fn normalize(input: Option<&str>) -> String {
    input.map(normalize_str).unwrap_or_default()
}

/// Canonicalize one extracted string: fold typographic variants, compose to
/// NFC, strip control characters, collapse space runs, and trim trailing
/// whitespace. Idempotent.
pub fn normalize_str(input: &str) -> String {
    let mut folded = String::with_capacity(input.len());
    for c in input.chars() {
        match fold_char(c) {
            Some(replacement) => folded.push_str(replacement),
            None => folded.push(c),
        }
    }

    // NFC merges decomposed diacritics so Vietnamese phrases compare equal.
    let composed: String = folded.nfc().collect();

    let stripped: String = composed.chars().filter(|c| !is_stripped_control(*c)).collect();

    let collapsed = MULTI_SPACE.replace_all(&stripped, " ");
    let collapsed = TRAILING_SPACE_BEFORE_NEWLINE.replace_all(&collapsed, "\n");

    collapsed.trim_end().replace('\u{00ad}', "")
}
