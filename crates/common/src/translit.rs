//! Offline transliteration between Roman and Devanagari name spellings.
//!
//! Devanagari is handled by hand so the inherent vowel comes out the way
//! Indian names are usually romanized ("रवि कुमार" -> "ravi kumar"). Every
//! other non-Latin script falls through to `deunicode`.

use deunicode::deunicode;
use unicode_script::{Script, UnicodeScript};

const VIRAMA: char = '\u{094D}';
const NUKTA: char = '\u{093C}';

/// True when every character is Latin, or script-neutral (digits,
/// punctuation, combining marks).
pub fn is_all_latin(s: &str) -> bool {
    s.chars().all(|c| {
        c.is_ascii()
            || matches!(c.script(), Script::Latin | Script::Common | Script::Inherited)
    })
}

/// The first non-Latin script in `s`, if any.
pub fn detect_non_latin_script(s: &str) -> Option<Script> {
    s.chars()
        .map(|c| c.script())
        .find(|script| !matches!(script, Script::Latin | Script::Common | Script::Inherited))
}

/// Romanize `s`. Whitespace is collapsed; case is left as produced.
pub fn to_latin(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let chars: Vec<char> = s.chars().filter(|&c| c != NUKTA).collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if let Some(latin) = consonant_to_latin(c) {
            out.push_str(latin);
            let next = chars.get(i + 1).copied();
            if next == Some(VIRAMA) {
                i += 1;
            } else if let Some(matra) = next.and_then(matra_to_latin) {
                out.push_str(matra);
                i += 1;
            } else if next.is_some_and(is_devanagari_letter) {
                // Inherent vowel, dropped at word end.
                out.push('a');
            }
        } else if let Some(latin) = vowel_to_latin(c) {
            out.push_str(latin);
        } else if let Some(latin) = sign_to_latin(c) {
            out.push_str(latin);
        } else if c == VIRAMA || matra_to_latin(c).is_some() {
            // Stray sign without a consonant.
        } else if c.is_ascii() {
            out.push(c);
        } else {
            out.push_str(&deunicode(&c.to_string()));
        }
        i += 1;
    }
    collapse_whitespace(&out)
}

/// Render a Roman spelling in Devanagari.
///
/// Greedy longest-match over a romanization table; consonant clusters get a
/// virama, and a trailing `a` on a consonant is the inherent vowel. Input is
/// expected lower-cased; anything outside the table passes through.
pub fn to_devanagari(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() * 3);
    let mut after_consonant = false;
    let mut i = 0;

    while i < chars.len() {
        if let Some((dev, len)) = longest_match(&chars[i..], ROMAN_CONSONANTS) {
            if after_consonant {
                out.push(VIRAMA);
            }
            out.push_str(dev);
            after_consonant = true;
            i += len;
        } else if let Some((idx, len)) = longest_vowel(&chars[i..]) {
            let (_, independent, matra) = ROMAN_VOWELS[idx];
            if after_consonant {
                out.push_str(matra);
            } else {
                out.push_str(independent);
            }
            after_consonant = false;
            i += len;
        } else {
            out.push(chars[i]);
            after_consonant = false;
            i += 1;
        }
    }
    out
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_devanagari_letter(c: char) -> bool {
    consonant_to_latin(c).is_some() || vowel_to_latin(c).is_some() || sign_to_latin(c).is_some()
}

fn consonant_to_latin(c: char) -> Option<&'static str> {
    Some(match c {
        'क' => "k",
        'ख' => "kh",
        'ग' => "g",
        'घ' => "gh",
        'ङ' => "n",
        'च' => "ch",
        'छ' => "chh",
        'ज' => "j",
        'झ' => "jh",
        'ञ' => "n",
        'ट' => "t",
        'ठ' => "th",
        'ड' => "d",
        'ढ' => "dh",
        'ण' => "n",
        'त' => "t",
        'थ' => "th",
        'द' => "d",
        'ध' => "dh",
        'न' => "n",
        'प' => "p",
        'फ' => "ph",
        'ब' => "b",
        'भ' => "bh",
        'म' => "m",
        'य' => "y",
        'र' => "r",
        'ल' => "l",
        'ळ' => "l",
        'व' => "v",
        'श' => "sh",
        'ष' => "sh",
        'स' => "s",
        'ह' => "h",
        _ => return None,
    })
}

fn vowel_to_latin(c: char) -> Option<&'static str> {
    Some(match c {
        'अ' | 'आ' => "a",
        'इ' | 'ई' => "i",
        'उ' | 'ऊ' => "u",
        'ऋ' => "ri",
        'ए' => "e",
        'ऐ' => "ai",
        'ओ' => "o",
        'औ' => "au",
        _ => return None,
    })
}

// Long vowels collapse to the short Roman letter; names are usually written
// "kumar", not "kumaar".
fn matra_to_latin(c: char) -> Option<&'static str> {
    Some(match c {
        'ा' => "a",
        'ि' | 'ी' => "i",
        'ु' | 'ू' => "u",
        'ृ' => "ri",
        'े' => "e",
        'ै' => "ai",
        'ो' => "o",
        'ौ' => "au",
        _ => return None,
    })
}

fn sign_to_latin(c: char) -> Option<&'static str> {
    Some(match c {
        'ं' | 'ँ' => "n",
        'ः' => "h",
        _ => return None,
    })
}

// Longer keys first within each group; lookup tries lengths 3, 2, 1.
const ROMAN_CONSONANTS: &[(&str, &str)] = &[
    ("chh", "छ"),
    ("ksh", "क्ष"),
    ("kh", "ख"),
    ("gh", "घ"),
    ("ch", "च"),
    ("jh", "झ"),
    ("th", "थ"),
    ("dh", "ध"),
    ("ph", "फ"),
    ("bh", "भ"),
    ("sh", "श"),
    ("k", "क"),
    ("g", "ग"),
    ("c", "क"),
    ("j", "ज"),
    ("t", "त"),
    ("d", "द"),
    ("n", "न"),
    ("p", "प"),
    ("b", "ब"),
    ("m", "म"),
    ("y", "य"),
    ("r", "र"),
    ("l", "ल"),
    ("v", "व"),
    ("w", "व"),
    ("s", "स"),
    ("h", "ह"),
    ("f", "फ"),
    ("z", "ज"),
    ("q", "क"),
    ("x", "क्स"),
];

// (roman, independent form, matra). The inherent `a` has an empty matra.
const ROMAN_VOWELS: &[(&str, &str, &str)] = &[
    ("aa", "आ", "ा"),
    ("ai", "ऐ", "ै"),
    ("au", "औ", "ौ"),
    ("ee", "ई", "ी"),
    ("ii", "ई", "ी"),
    ("oo", "ऊ", "ू"),
    ("uu", "ऊ", "ू"),
    ("a", "अ", ""),
    ("i", "इ", "ि"),
    ("u", "उ", "ु"),
    ("e", "ए", "े"),
    ("o", "ओ", "ो"),
];

fn starts_with_chars(input: &[char], key: &str) -> Option<usize> {
    let len = key.chars().count();
    if input.len() >= len && input.iter().take(len).copied().eq(key.chars()) {
        Some(len)
    } else {
        None
    }
}

fn longest_match(input: &[char], table: &[(&str, &'static str)]) -> Option<(&'static str, usize)> {
    table
        .iter()
        .filter_map(|&(key, dev)| starts_with_chars(input, key).map(|len| (dev, len)))
        .max_by_key(|&(_, len)| len)
}

fn longest_vowel(input: &[char]) -> Option<(usize, usize)> {
    ROMAN_VOWELS
        .iter()
        .enumerate()
        .filter_map(|(idx, &(key, _, _))| starts_with_chars(input, key).map(|len| (idx, len)))
        .max_by_key(|&(_, len)| len)
}
