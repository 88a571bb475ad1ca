use std::sync::Arc;

use crate::phonetic::PhoneticEncoder;
use crate::translate::Translator;

/// Forms of one query the matcher compares against each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryVariant {
    /// Trimmed, case-folded input.
    pub raw: String,
    /// Cross-script counterpart of `raw`; equals `raw` when translation failed.
    pub translated: String,
    pub phonetic_code: Option<String>,
}

impl QueryVariant {
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// True when `raw` is in the source language's script, i.e. translation
    /// ran source -> target and `translated` is the target-script form.
    pub fn is_forward(&self) -> bool {
        is_forward(&self.raw)
    }
}

fn is_forward(raw: &str) -> bool {
    raw.is_ascii()
}

/// A record name reduced to comparable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub lower: String,
    pub phonetic_code: Option<String>,
}

pub fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

pub struct Normalizer {
    translator: Arc<dyn Translator>,
    phonetic: PhoneticEncoder,
    source_lang: String,
    target_lang: String,
}

impl Normalizer {
    pub fn new(
        translator: Arc<dyn Translator>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            phonetic: PhoneticEncoder::new(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }

    /// One translation call and one phonetic encoding per query.
    pub fn normalize_query(&self, raw: &str) -> QueryVariant {
        let raw = fold(raw);
        if raw.is_empty() {
            return QueryVariant { raw, translated: String::new(), phonetic_code: None };
        }
        let translated = self.translate(&raw);
        let phonetic_code = self.phonetic.encode(&raw);
        QueryVariant { raw, translated, phonetic_code }
    }

    /// Case fold and phonetic code; record names are never translated.
    pub fn normalize_record_name(&self, display_name: &str) -> NormalizedName {
        let lower = fold(display_name);
        let phonetic_code = self.phonetic.encode(&lower);
        NormalizedName { lower, phonetic_code }
    }

    /// ASCII input goes source -> target, anything else target -> source.
    fn translate(&self, raw: &str) -> String {
        let (from, to) = if is_forward(raw) {
            (self.source_lang.as_str(), self.target_lang.as_str())
        } else {
            (self.target_lang.as_str(), self.source_lang.as_str())
        };
        match self.translator.translate(raw, from, to) {
            Ok(t) => {
                let t = fold(&t);
                if t.is_empty() { raw.to_string() } else { t }
            }
            Err(e) => {
                tracing::debug!("translation {from}->{to} unavailable, using raw query: {e:#}");
                raw.to_string()
            }
        }
    }
}
