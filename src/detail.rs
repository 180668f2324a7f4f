use serde::Serialize;

use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, Result};
use crate::table::{Header, Row};

/// A resource ready for display: its name plus every populated, labelled field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDetail {
    pub position: usize,
    pub display_name: String,
    pub fields: Vec<(String, String)>,
}

/// Pair header labels with the cells of the row at `position`.
///
/// Columns with a blank label and cells that are blank after trimming are dropped; trailing
/// colons come off the labels.
pub fn resolve_detail(
    rows: &[Row],
    header: &Header,
    position: usize,
    cfg: &DirectoryConfig,
) -> Result<ResourceDetail> {
    let row = rows.get(position).ok_or(DirectoryError::NotFound {
        position,
        len: rows.len(),
    })?;

    let fields = header
        .labels
        .cells()
        .iter()
        .enumerate()
        .filter_map(|(col, label)| {
            let label = label.trim().trim_end_matches(':');
            let value = row.cell(col).trim();
            if label.is_empty() || value.is_empty() {
                None
            } else {
                Some((label.to_string(), value.to_string()))
            }
        })
        .collect();

    let display_name = match row.cell(cfg.columns.name).trim() {
        "" => cfg.fallback_name.clone(),
        name => name.to_string(),
    };

    Ok(ResourceDetail {
        position,
        display_name,
        fields,
    })
}
