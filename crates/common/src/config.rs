use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerAppConfig {
    pub server: ServerAppSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub translation: TranslationSettings,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerAppSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    pub data_dir: String,
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_bind() -> String {
    "127.0.0.1:5000".into()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSettings {
    /// CSV file imported on startup when the database holds no records.
    #[serde(default)]
    pub csv_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Minimum partial-ratio similarity (exclusive) for a string match.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: u32,
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: usize,
    #[serde(default = "default_max_suggest_limit")]
    pub max_suggest_limit: usize,
    /// Longest accepted query or record name, in characters.
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,
}

impl SearchSettings {
    pub fn query_too_long(&self, name: &str) -> bool {
        name.chars().count() > self.max_query_chars
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            suggest_limit: default_suggest_limit(),
            max_suggest_limit: default_max_suggest_limit(),
            max_query_chars: default_max_query_chars(),
        }
    }
}

fn default_similarity_threshold() -> u32 { 60 }
fn default_suggest_limit() -> usize { 10 }
fn default_max_suggest_limit() -> usize { 50 }
fn default_max_query_chars() -> usize { 256 }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationBackend {
    #[default]
    Transliterate,
    Http,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationSettings {
    #[serde(default)]
    pub backend: TranslationBackend,
    /// Required for the `http` backend.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Language of ASCII queries.
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    /// Language ASCII queries are translated into.
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            backend: TranslationBackend::default(),
            endpoint: None,
            timeout_ms: default_timeout_ms(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
        }
    }
}

fn default_timeout_ms() -> u64 { 1500 }
fn default_source_lang() -> String { "en".into() }
fn default_target_lang() -> String { "hi".into() }

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Regexes matched against `"<target>: <message>"`; matching events are dropped.
    #[serde(default)]
    pub ignore: Vec<String>,
}

pub fn default_config_path() -> String {
    "/etc/namefind/server.toml".into()
}

/// Parse server config, warning about keys nothing reads.
pub fn parse_server_config(s: &str) -> Result<ServerAppConfig> {
    let de = toml::Deserializer::new(s);
    let mut unknown = Vec::new();
    let config: ServerAppConfig = serde_ignored::deserialize(de, |path| {
        unknown.push(path.to_string());
    })
    .context("parsing server config")?;
    for key in unknown {
        tracing::warn!("unknown config key: {key}");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let cfg = parse_server_config("[server]\ndata_dir = \"/tmp/nf\"\n").unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:5000");
        assert!(cfg.server.cors_origins.is_empty());
        assert_eq!(cfg.search.similarity_threshold, 60);
        assert_eq!(cfg.search.suggest_limit, 10);
        assert_eq!(cfg.search.max_query_chars, 256);
        assert_eq!(cfg.translation.backend, TranslationBackend::Transliterate);
        assert_eq!(cfg.translation.target_lang, "hi");
        assert!(cfg.data.csv_path.is_none());
    }

    #[test]
    fn test_full_config() {
        let cfg = parse_server_config(
            r#"
            [server]
            bind = "0.0.0.0:8080"
            data_dir = "/var/lib/namefind"
            cors_origins = ["http://localhost:3000"]

            [data]
            csv_path = "/data/records.csv"

            [search]
            similarity_threshold = 70
            suggest_limit = 5

            [translation]
            backend = "http"
            endpoint = "http://localhost:5001/translate"
            timeout_ms = 500

            [log]
            ignore = ["^rusqlite"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(cfg.data.csv_path.as_deref(), Some("/data/records.csv"));
        assert_eq!(cfg.search.similarity_threshold, 70);
        assert_eq!(cfg.search.max_suggest_limit, 50);
        assert_eq!(cfg.translation.backend, TranslationBackend::Http);
        assert_eq!(cfg.translation.timeout_ms, 500);
        assert_eq!(cfg.log.ignore, vec!["^rusqlite"]);
    }

    #[test]
    fn test_query_length_counts_chars() {
        let search = SearchSettings { max_query_chars: 4, ..SearchSettings::default() };
        assert!(!search.query_too_long("रवि"));
        assert!(!search.query_too_long("ravi"));
        assert!(search.query_too_long("ravii"));
    }

    #[test]
    fn test_unknown_keys_are_not_fatal() {
        let cfg = parse_server_config("[server]\ndata_dir = \"x\"\ntoken = \"old\"\n").unwrap();
        assert_eq!(cfg.server.data_dir, "x");
    }

    #[test]
    fn test_missing_data_dir_is_error() {
        assert!(parse_server_config("[server]\nbind = \"x\"\n").is_err());
    }
}
