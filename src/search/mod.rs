// src/search/mod.rs
use serde::{Deserialize, Serialize};

use crate::index::RowKind;
use crate::table::Row;

mod category;
mod keyword;

pub use category::category_block_search;
pub use keyword::{keyword_search, WordMatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Keyword,
    Category,
}

impl SearchMode {
    /// Lenient parse of a request parameter: `category` selects block search, anything else
    /// falls back to keyword search.
    pub fn from_param(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("category") {
            SearchMode::Category
        } else {
            SearchMode::Keyword
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Keyword => "keyword",
            SearchMode::Category => "category",
        }
    }
}

/// A matching row and its permanent position in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub position: usize,
    pub row: Row,
}

/// Trim and upper-case user input. `None` when nothing is left to search for.
pub fn normalize_query(query: &str) -> Option<String> {
    let q = query.trim().to_uppercase();
    if q.is_empty() {
        None
    } else {
        Some(q)
    }
}

/// Run `query` in `mode` over rows already tagged by `index::classify`.
pub fn run(rows: &[Row], kinds: &[RowKind], query: &str, mode: SearchMode) -> Vec<SearchHit> {
    match mode {
        SearchMode::Keyword => keyword_search(rows, kinds, query),
        SearchMode::Category => category_block_search(rows, kinds, query),
    }
}
