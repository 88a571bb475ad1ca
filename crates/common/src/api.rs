use serde::{Deserialize, Serialize};

use crate::matcher::MatchResult;
use crate::record::{clean_field, Gender, NameRecord};

/// POST /api/v1/search request body.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub name: String,
}

/// One search result: the full record projection plus its scores.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub name: String,
    pub name_devanagari: String,
    pub gender: String,
    pub age: String,
    pub case_type: String,
    #[serde(rename = "caseFIR")]
    pub case_fir: String,
    pub location: String,
    /// 0..=100, for display.
    pub confidence: u32,
    /// Ranking weight; may exceed 100.
    pub score: u32,
    pub similarity: u32,
    pub phonetic_match: bool,
}

impl From<&MatchResult<'_>> for SearchHit {
    fn from(m: &MatchResult<'_>) -> Self {
        let r = m.record;
        Self {
            name: r.name.clone(),
            name_devanagari: r.devanagari_name(),
            gender: r.gender.to_string(),
            age: r.age_or_unknown(),
            case_type: r.case_type_or_unknown(),
            case_fir: r.case_fir_or_unknown(),
            location: r.location_or_unknown(),
            confidence: m.confidence(),
            score: m.score,
            similarity: m.similarity,
            phonetic_match: m.phonetic_match,
        }
    }
}

/// POST /api/v1/search response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One as-you-type suggestion.
#[derive(Debug, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub age: String,
    pub location: String,
    pub score: u32,
}

impl From<&MatchResult<'_>> for Suggestion {
    fn from(m: &MatchResult<'_>) -> Self {
        Self {
            name: m.record.name.clone(),
            age: m.record.age_or_unknown(),
            location: m.record.location_or_unknown(),
            score: m.score,
        }
    }
}

/// GET /api/v1/suggest response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<Suggestion>,
}

/// Ages arrive as JSON numbers from some clients and strings from others.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeValue {
    Number(serde_json::Number),
    Text(String),
}

impl AgeValue {
    pub fn into_field(self) -> Option<String> {
        match self {
            AgeValue::Number(n) => Some(n.to_string()),
            AgeValue::Text(s) => clean_field(Some(&s)),
        }
    }
}

/// POST /api/v1/records request body.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRecordRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alternate_names: Vec<String>,
    #[serde(default)]
    pub age: Option<AgeValue>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub case_type: Option<String>,
    #[serde(default, rename = "caseFIR")]
    pub case_fir: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl AddRecordRequest {
    /// Build the record to store, or `None` when the name is blank. The case
    /// reference is left unset when absent; the caller generates it.
    pub fn into_record(self) -> Option<NameRecord> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(NameRecord {
            name: name.to_string(),
            alternate_names: self
                .alternate_names
                .iter()
                .filter_map(|n| clean_field(Some(n)))
                .collect(),
            age: self.age.and_then(AgeValue::into_field),
            gender: self.gender.as_deref().map(Gender::parse).unwrap_or_default(),
            case_type: clean_field(self.case_type.as_deref()),
            case_fir: clean_field(self.case_fir.as_deref()),
            location: clean_field(self.location.as_deref()),
        })
    }
}

/// A stored record as returned to clients, with missing fields rendered as
/// the `Unknown` sentinel.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub name: String,
    pub name_devanagari: String,
    pub alternate_names: Vec<String>,
    pub gender: String,
    pub age: String,
    pub case_type: String,
    #[serde(rename = "caseFIR")]
    pub case_fir: String,
    pub location: String,
}

impl From<&NameRecord> for RecordView {
    fn from(r: &NameRecord) -> Self {
        Self {
            name: r.name.clone(),
            name_devanagari: r.devanagari_name(),
            alternate_names: r.alternate_names.clone(),
            gender: r.gender.to_string(),
            age: r.age_or_unknown(),
            case_type: r.case_type_or_unknown(),
            case_fir: r.case_fir_or_unknown(),
            location: r.location_or_unknown(),
        }
    }
}

/// POST /api/v1/records response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddRecordResponse {
    pub record: RecordView,
}

/// GET /api/v1/process response: how the normalizer sees a name.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub normalized: String,
    pub roman: String,
    pub devanagari: String,
    pub phonetic: Option<String>,
}

/// GET /api/v1/stats response.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub records: usize,
    pub version: String,
}

/// POST /api/v1/reload response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub records: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
