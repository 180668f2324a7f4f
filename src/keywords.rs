//! Search suggestions: the configured "try searching for" list, and a list derived from the
//! words that recur across resource names.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::DirectoryConfig;
use crate::index::RowKind;
use crate::table::Row;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub word: String,
    /// Number of resources whose name contains the word.
    pub resources: usize,
}

/// The configured featured keywords, capitalised for display.
pub fn featured_keywords(cfg: &DirectoryConfig) -> Vec<String> {
    cfg.featured_keywords.iter().map(|w| capitalize(w)).collect()
}

/// Most common name words across resource rows, stop words and single characters removed.
/// Ties break alphabetically so the list is stable between loads of the same table.
pub fn suggest_keywords(
    rows: &[Row],
    kinds: &[RowKind],
    cfg: &DirectoryConfig,
    limit: usize,
) -> Vec<KeywordCount> {
    let stop: HashSet<String> = cfg.stop_words.iter().map(|w| w.to_lowercase()).collect();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for (row, _) in rows.iter().zip(kinds).filter(|(_, k)| k.is_resource()) {
        let name = row.cell(cfg.columns.name).to_lowercase();
        let words: BTreeSet<&str> = name
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 1)
            .filter(|w| !w.chars().all(|c| c.is_numeric()))
            .filter(|w| !stop.contains(*w))
            .collect();
        for word in words {
            *counts.entry(word.to_string()).or_default() += 1;
        }
    }

    let mut ranked: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(word, resources)| KeywordCount { word, resources })
        .collect();
    ranked.sort_by(|a, b| b.resources.cmp(&a.resources).then_with(|| a.word.cmp(&b.word)));
    ranked.truncate(limit);
    ranked
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
