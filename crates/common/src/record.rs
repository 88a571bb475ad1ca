use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use unicode_script::Script;

use crate::translit;

/// Rendered in responses for any optional field the record does not carry.
pub const UNKNOWN: &str = "Unknown";

/// Prefix of generated case references.
pub const CASE_FIR_PREFIX: &str = "FIR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Lenient parse used for CSV cells and request bodies.
    ///
    /// The legacy CSV export encodes gender as `1` for male and anything else
    /// non-empty (`0`, `2`) for female.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "1" | "1.0" | "m" | "male" => Gender::Male,
            "0" | "0.0" | "2" | "2.0" | "f" | "female" => Gender::Female,
            _ => Gender::Unknown,
        }
    }

    /// Storage form, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => UNKNOWN,
        })
    }
}

/// One person/case entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameRecord {
    pub name: String,
    /// Alternative Roman spellings and Devanagari renderings. Scored alongside
    /// `name`; the best-scoring form wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_names: Vec<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub case_type: Option<String>,
    #[serde(default, rename = "caseFIR")]
    pub case_fir: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl NameRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alternate_names: Vec::new(),
            age: None,
            gender: Gender::Unknown,
            case_type: None,
            case_fir: None,
            location: None,
        }
    }

    /// A record is storable and matchable only with a non-blank name.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Every name form worth scoring: the display name first, then non-blank
    /// alternates.
    pub fn name_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.alternate_names.iter().map(String::as_str))
            .filter(|n| !n.trim().is_empty())
    }

    /// The Devanagari spelling: the first Devanagari alternate, else a
    /// transliteration of the display name.
    pub fn devanagari_name(&self) -> String {
        self.alternate_names
            .iter()
            .map(|n| n.trim())
            .find(|n| translit::detect_non_latin_script(n) == Some(Script::Devanagari))
            .map(str::to_string)
            .unwrap_or_else(|| translit::to_devanagari(&self.name.trim().to_lowercase()))
    }

    pub fn age_or_unknown(&self) -> String {
        or_unknown(&self.age)
    }

    pub fn case_type_or_unknown(&self) -> String {
        or_unknown(&self.case_type)
    }

    pub fn case_fir_or_unknown(&self) -> String {
        or_unknown(&self.case_fir)
    }

    pub fn location_or_unknown(&self) -> String {
        or_unknown(&self.location)
    }

    /// Fills in a generated case reference when none is set.
    pub fn ensure_case_fir(&mut self, today: NaiveDate) {
        let missing = self.case_fir.as_deref().map_or(true, |s| s.trim().is_empty());
        if missing {
            self.case_fir = Some(generate_case_fir(today));
        }
    }
}

fn or_unknown(field: &Option<String>) -> String {
    match field.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Trim a free-text field, mapping blanks to `None`.
pub fn clean_field(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `FIR` + `YYYYMMDD` + `-` + four random digits, e.g. `FIR20261016-0427`.
pub fn generate_case_fir(today: NaiveDate) -> String {
    let suffix = uuid::Uuid::new_v4().as_u128() % 10_000;
    format!("{CASE_FIR_PREFIX}{}-{suffix:04}", today.format("%Y%m%d"))
}
