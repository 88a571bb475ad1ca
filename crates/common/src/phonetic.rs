use std::panic::{self, AssertUnwindSafe};

use rphonetic::{Encoder, Soundex};

use crate::translit;

/// Soundex codes for whole names.
///
/// Non-Latin input is romanized first so a Devanagari spelling and its Roman
/// counterpart land on the same code. All letters of the name are encoded as
/// one word ("Ravi Kumar" and "Ravikumar" share a code).
pub struct PhoneticEncoder {
    soundex: Soundex,
}

impl Default for PhoneticEncoder {
    fn default() -> Self {
        Self { soundex: Soundex::default() }
    }
}

impl PhoneticEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when there is nothing encodable, or the encoder fails.
    pub fn encode(&self, text: &str) -> Option<String> {
        let latin;
        let text = if translit::is_all_latin(text) {
            text
        } else {
            latin = translit::to_latin(text);
            latin.as_str()
        };

        let letters: String = text.chars().filter(char::is_ascii_alphabetic).collect();
        if letters.is_empty() {
            return None;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.soundex.encode(&letters))) {
            Ok(code) if !code.is_empty() => Some(code),
            Ok(_) => None,
            Err(_) => {
                tracing::debug!("soundex failed on {letters:?}");
                None
            }
        }
    }
}
