//! Structural reading of the table: which rows are the header, which are category markers,
//! which are displayable resources, and the category list derived from the markers.

use std::collections::BTreeSet;

use crate::config::DirectoryConfig;
use crate::table::{Row, Table};

/// What a row is, decided once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Header,
    /// Block marker. `category` is the stripped, trimmed, upper-cased label text. It may be
    /// empty, in which case the marker still closes the previous block.
    CategoryLabel { category: String },
    Resource,
    Ignorable,
}

impl RowKind {
    pub fn is_resource(&self) -> bool {
        matches!(self, RowKind::Resource)
    }
}

/// Is this row a displayable resource?
///
/// The name column must be non-empty after trimming, must not be the header sentinel, and must
/// not contain the closed marker in any casing.
pub fn is_resource(row: &Row, cfg: &DirectoryConfig) -> bool {
    let name = match row.get(cfg.columns.name) {
        Some(name) => name.trim(),
        None => return false,
    };
    if name.is_empty() {
        return false;
    }
    if name.to_uppercase() == cfg.header_sentinel.to_uppercase() {
        return false;
    }
    !name.to_lowercase().contains(&cfg.closed_marker.to_lowercase())
}

/// If `row` is a category marker, the category it opens.
///
/// A marker has an empty name column and a category column starting with one of the configured
/// prefixes; prefixes are tried in configuration order.
pub fn derive_category(row: &Row, cfg: &DirectoryConfig) -> Option<String> {
    if !row.cell(cfg.columns.name).trim().is_empty() {
        return None;
    }
    let label = row.cell(cfg.columns.category).trim();
    cfg.category_prefixes
        .iter()
        .find_map(|prefix| label.strip_prefix(prefix.as_str()))
        .map(|rest| rest.trim().to_uppercase())
}

/// Tag a single row. `is_header` is true only for the one row the loader promoted.
pub fn classify_row(row: &Row, is_header: bool, cfg: &DirectoryConfig) -> RowKind {
    if is_header {
        return RowKind::Header;
    }
    if let Some(category) = derive_category(row, cfg) {
        return RowKind::CategoryLabel { category };
    }
    if is_resource(row, cfg) {
        RowKind::Resource
    } else {
        RowKind::Ignorable
    }
}

/// Tag every row of `table`, index-aligned with `table.rows`.
pub fn classify(table: &Table, cfg: &DirectoryConfig) -> Vec<RowKind> {
    let header_pos = table.header.as_ref().map(|h| h.position);
    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| classify_row(row, Some(i) == header_pos, cfg))
        .collect()
}

/// Sorted, de-duplicated, non-empty categories named by the markers.
pub fn collect_categories(kinds: &[RowKind]) -> Vec<String> {
    kinds
        .iter()
        .filter_map(|kind| match kind {
            RowKind::CategoryLabel { category } if !category.is_empty() => Some(category.clone()),
            _ => None,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
