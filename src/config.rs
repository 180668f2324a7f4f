// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// Env var naming the source table; overrides whatever the YAML config says.
pub const CSV_ENV: &str = "SERVICEFINDER_CSV";
/// Env var naming an optional YAML config file.
pub const CONFIG_ENV: &str = "SERVICEFINDER_CONFIG";

/// Column positions that give a row its meaning. Everything else is free-form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnLayout {
    /// Column A: resource name (also carries the header sentinel).
    pub name: usize,
    /// Column D: category / type label.
    pub category: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            name: 0,
            category: 3,
        }
    }
}

/// Everything the directory needs to know about its source table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DirectoryConfig {
    pub source: PathBuf,
    pub delimiter: char,
    pub columns: ColumnLayout,
    /// Category label prefixes, tried in order.
    pub category_prefixes: Vec<String>,
    /// Lower-case marker; a name containing it is never displayed.
    pub closed_marker: String,
    /// Upper-case value of the name column on the header row.
    pub header_sentinel: String,
    pub fallback_name: String,
    pub featured_keywords: Vec<String>,
    pub stop_words: Vec<String>,
    pub suggestion_count: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("CapstoneSpreadsheet - Sheet1.csv"),
            delimiter: ',',
            columns: ColumnLayout::default(),
            category_prefixes: vec!["Community Services- ".into(), "OTHER- ".into()],
            closed_marker: "closed".into(),
            header_sentinel: "NAME".into(),
            fallback_name: "Unknown Resource".into(),
            featured_keywords: to_owned(FEATURED_KEYWORDS),
            stop_words: to_owned(STOP_WORDS),
            suggestion_count: 12,
        }
    }
}

impl DirectoryConfig {
    /// Defaults, then `SERVICEFINDER_CONFIG` (YAML) if set, then `SERVICEFINDER_CSV` if set.
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_yaml_file(PathBuf::from(path))?,
            None => Self::default(),
        };
        if let Some(csv) = env::var_os(CSV_ENV) {
            cfg.source = PathBuf::from(csv);
        }
        info!(source = %cfg.source.display(), "directory config resolved");
        Ok(cfg)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(text)?;
        cfg.delimiter_byte()?;
        Ok(cfg)
    }

    /// Builder-style override used by tests and the console.
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = source.into();
        self
    }

    /// The delimiter as the single byte the csv reader wants.
    pub fn delimiter_byte(&self) -> Result<u8> {
        anyhow::ensure!(
            self.delimiter.is_ascii(),
            "delimiter {:?} is not a single ASCII byte",
            self.delimiter
        );
        Ok(self.delimiter as u8)
    }
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

const FEATURED_KEYWORDS: &[&str] = &[
    "church", "center", "blue", "mountain", "services", "umatilla", "children", "club", "society",
    "child", "ywca", "counseling", "hotline", "catholic", "community", "program", "college",
    "freewater", "health", "milton", "youth", "care", "charities", "columbia", "department",
    "family", "home", "national", "wwcc", "ymca",
];

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "and", "or", "but", "in", "on", "at", "to",
    "of", "for", "with", "by", "as", "from", "it", "its", "that", "this", "we", "i", "you", "he",
    "she", "they", "our", "your", "their", "us", "my", "his", "her", "do", "don", "not", "can",
    "will", "would", "up", "out", "down", "be", "been", "have", "has", "had", "all", "any",
    "some", "no", "so", "get", "just", "more", "most", "such", "only", "what", "when", "where",
    "who", "whom", "which", "how", "one", "two", "three", "four", "five", "etc", "name",
    "details", "number", "director", "address", "website", "function", "email", "com", "org",
    "www", "https", "wa", "st", "ave", "rd", "dr", "p", "s", "n", "w", "e", "blvd", "those",
    "through", "washington", "walla", "county", "oregon", "provides", "providing", "place",
    "provide", "main", "valley",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_source_layout() {
        let cfg = DirectoryConfig::default();
        assert_eq!(cfg.columns.name, 0);
        assert_eq!(cfg.columns.category, 3);
        assert_eq!(cfg.category_prefixes[0], "Community Services- ");
        assert_eq!(cfg.category_prefixes[1], "OTHER- ");
        assert_eq!(cfg.featured_keywords.len(), 30);
        assert_eq!(cfg.delimiter_byte().ok(), Some(b','));
    }

    #[test]
    fn yaml_overrides_only_named_fields() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "source: resources.tsv")?;
        writeln!(tmp, "delimiter: \"\\t\"")?;
        writeln!(tmp, "columns:")?;
        writeln!(tmp, "  category: 5")?;

        let cfg = DirectoryConfig::from_yaml_file(tmp.path())?;
        assert_eq!(cfg.source, PathBuf::from("resources.tsv"));
        assert_eq!(cfg.delimiter_byte()?, b'\t');
        assert_eq!(cfg.columns.category, 5);
        assert_eq!(cfg.columns.name, 0);
        assert_eq!(cfg.header_sentinel, "NAME");
        Ok(())
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let err = DirectoryConfig::from_yaml_str("delimiter: \"¦\"\n").unwrap_err();
        assert!(err.to_string().contains("not a single ASCII byte"));

        let mut cfg = DirectoryConfig::default();
        cfg.delimiter = '¦';
        assert!(cfg.delimiter_byte().is_err());
    }

    #[test]
    fn missing_yaml_file_is_an_error() {
        let err = DirectoryConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("reading config file"));
    }
}
