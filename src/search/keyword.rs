use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use super::{normalize_query, SearchHit};
use crate::index::RowKind;
use crate::table::Row;

/// Whole-word matcher for one query. The query is escaped, so it is always taken literally;
/// word boundaries keep "CARE" from matching "CAREFUL".
#[derive(Debug, Clone)]
pub struct WordMatcher {
    re: Regex,
}

impl WordMatcher {
    /// `None` for blank input, or if the escaped pattern is too large to compile.
    pub fn new(query: &str) -> Option<Self> {
        let term = normalize_query(query)?;
        let pattern = format!(r"\b{}\b", regex::escape(&term));
        match RegexBuilder::new(&pattern).build() {
            Ok(re) => Some(Self { re }),
            Err(e) => {
                warn!(query = %term, error = %e, "keyword pattern rejected");
                None
            }
        }
    }

    /// Match against text the caller has already upper-cased.
    pub fn is_match(&self, upper_text: &str) -> bool {
        self.re.is_match(upper_text)
    }

    pub fn matches_row(&self, row: &Row) -> bool {
        self.is_match(&row.joined().to_uppercase())
    }
}

/// Resources whose full text (all cells, space-joined) contains `query` as a whole word.
/// Hits come back in dataset order.
pub fn keyword_search(rows: &[Row], kinds: &[RowKind], query: &str) -> Vec<SearchHit> {
    let matcher = match WordMatcher::new(query) {
        Some(m) => m,
        None => return Vec::new(),
    };

    let hits: Vec<SearchHit> = rows
        .par_iter()
        .zip(kinds.par_iter())
        .enumerate()
        .filter(|(_, (row, kind))| kind.is_resource() && matcher.matches_row(row))
        .map(|(position, (row, _))| SearchHit {
            position,
            row: row.clone(),
        })
        .collect();

    debug!(query = %query.trim(), hits = hits.len(), "keyword search");
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tests::scenario_table;

    fn positions(hits: &[SearchHit]) -> Vec<usize> {
        hits.iter().map(|h| h.position).collect()
    }

    #[test]
    fn whole_word_only() {
        let (table, kinds) = scenario_table();
        assert_eq!(
            positions(&keyword_search(&table.rows, &kinds, "counseling")),
            vec![6]
        );
        assert!(keyword_search(&table.rows, &kinds, "couns").is_empty());

        // "care" is a word in row 9 but only a prefix of "Careful" in row 6
        assert_eq!(positions(&keyword_search(&table.rows, &kinds, "CARE")), vec![9]);
    }

    #[test]
    fn matches_any_cell_in_dataset_order() {
        let (table, kinds) = scenario_table();
        // "Blue" in two names, "food" in a details cell and the closed row
        assert_eq!(
            positions(&keyword_search(&table.rows, &kinds, "blue mountain")),
            vec![3, 6]
        );
        assert_eq!(positions(&keyword_search(&table.rows, &kinds, "food")), vec![3]);
        assert_eq!(
            positions(&keyword_search(&table.rows, &kinds, "555-0101")),
            vec![4]
        );
    }

    #[test]
    fn structural_rows_are_not_candidates() {
        let (table, kinds) = scenario_table();
        assert!(keyword_search(&table.rows, &kinds, "PHONE").is_empty());
        assert!(keyword_search(&table.rows, &kinds, "OTHER").is_empty());
    }

    #[test]
    fn pattern_characters_are_literal() {
        let (table, kinds) = scenario_table();
        assert!(keyword_search(&table.rows, &kinds, ".*").is_empty());
        assert!(keyword_search(&table.rows, &kinds, "(").is_empty());
        assert!(keyword_search(&table.rows, &kinds, "[a-z]+").is_empty());
        // no boundary between "." and the following space
        assert!(keyword_search(&table.rows, &kinds, "St.").is_empty());
        assert_eq!(
            positions(&keyword_search(&table.rows, &kinds, "St. Vincent")),
            vec![4]
        );
        assert_eq!(
            positions(&keyword_search(&table.rows, &kinds, "care (c")),
            vec![9]
        );
    }

    #[test]
    fn repeated_queries_agree_and_are_ordered() {
        let (table, kinds) = scenario_table();
        let first = keyword_search(&table.rows, &kinds, "blue");
        let second = keyword_search(&table.rows, &kinds, "blue");
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].position < w[1].position));
    }

    #[test]
    fn blank_query_or_empty_table() {
        let (table, kinds) = scenario_table();
        assert!(keyword_search(&table.rows, &kinds, "").is_empty());
        assert!(keyword_search(&table.rows, &kinds, " \t ").is_empty());
        assert!(keyword_search(&[], &[], "food").is_empty());
    }

    #[test]
    fn matcher_is_unicode_aware() {
        let m = WordMatcher::new("café").expect("matcher");
        assert!(m.is_match("LA CAFÉ ESPERANZA"));
        assert!(!m.is_match("CAFÉS"));
    }
}
