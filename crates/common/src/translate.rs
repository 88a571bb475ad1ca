//! Cross-script translation backends.
//!
//! Translation is best-effort everywhere: callers fall back to the untranslated
//! text on any error, so backends are free to fail.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{TranslationBackend, TranslationSettings};
use crate::translit;

pub trait Translator: Send + Sync {
    /// Translate `text` from language `source` to language `target`
    /// (ISO 639-1 codes, e.g. `en`, `hi`).
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Build the translator selected in config.
pub fn from_settings(settings: &TranslationSettings) -> Result<Arc<dyn Translator>> {
    let translator: Arc<dyn Translator> = match settings.backend {
        TranslationBackend::Transliterate => Arc::new(Transliterator),
        TranslationBackend::None => Arc::new(Disabled),
        TranslationBackend::Http => {
            let endpoint = settings
                .endpoint
                .clone()
                .context("translation.endpoint is required for the http backend")?;
            Arc::new(HttpTranslator::new(
                endpoint,
                Duration::from_millis(settings.timeout_ms),
            ))
        }
    };
    Ok(translator)
}

// ── Offline ──────────────────────────────────────────────────────────────────

/// Script conversion without a network round trip: Roman to Devanagari for
/// Indic targets, anything to Roman for `en`.
pub struct Transliterator;

const DEVANAGARI_LANGS: &[&str] = &["hi", "mr", "ne", "sa"];

impl Translator for Transliterator {
    fn translate(&self, text: &str, _source: &str, target: &str) -> Result<String> {
        if DEVANAGARI_LANGS.contains(&target) {
            Ok(translit::to_devanagari(text))
        } else if target == "en" {
            Ok(translit::to_latin(text))
        } else {
            bail!("no transliteration table for target language {target:?}")
        }
    }
}

/// Always fails; the normalizer then uses the raw query.
pub struct Disabled;

impl Translator for Disabled {
    fn translate(&self, _text: &str, _source: &str, _target: &str) -> Result<String> {
        bail!("translation disabled")
    }
}

// ── Remote ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// LibreTranslate-compatible `POST {endpoint}` client.
///
/// The blocking client is built on first use so that it is created on the
/// blocking pool rather than inside the async runtime.
pub struct HttpTranslator {
    endpoint: String,
    timeout: Duration,
    client: OnceLock<reqwest::blocking::Client>,
}

impl HttpTranslator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self { endpoint: endpoint.into(), timeout, client: OnceLock::new() }
    }

    fn client(&self) -> Result<&reqwest::blocking::Client> {
        if let Some(c) = self.client.get() {
            return Ok(c);
        }
        let built = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("building translation client")?;
        Ok(self.client.get_or_init(|| built))
    }
}

impl Translator for HttpTranslator {
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let resp: TranslateResponse = self
            .client()?
            .post(&self.endpoint)
            .json(&TranslateRequest { q: text, source, target, format: "text" })
            .send()
            .with_context(|| format!("POST {}", self.endpoint))?
            .error_for_status()
            .context("translation service status")?
            .json()
            .context("parsing translation response")?;
        Ok(resp.translated_text)
    }
}
