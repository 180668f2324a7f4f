use tracing::debug;

use super::{normalize_query, SearchHit};
use crate::index::RowKind;
use crate::table::Row;

/// Resources inside every category block whose name contains `query`.
///
/// One pass with an "inside a matching block" cursor: each marker re-evaluates the cursor,
/// markers never emit, and a block runs until the next marker or the end of the table.
/// Resource rows don't restate their category, so block membership is purely positional.
pub fn category_block_search(rows: &[Row], kinds: &[RowKind], query: &str) -> Vec<SearchHit> {
    let query = match normalize_query(query) {
        Some(q) => q,
        None => return Vec::new(),
    };

    let mut hits = Vec::new();
    let mut in_block = false;
    for (position, (row, kind)) in rows.iter().zip(kinds).enumerate() {
        match kind {
            RowKind::CategoryLabel { category } => {
                in_block = category.contains(&query);
            }
            RowKind::Resource if in_block => hits.push(SearchHit {
                position,
                row: row.clone(),
            }),
            _ => {}
        }
    }
    debug!(query = %query, hits = hits.len(), "category block search");
    hits
}
