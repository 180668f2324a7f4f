use serde::{Deserialize, Serialize};

/// One line of the source table. Rows are ragged: a short row simply has fewer cells, and any
/// column past its end reads as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Vec<String>);

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    /// The cell at `col`, or `None` when the row is shorter than that.
    pub fn get(&self, col: usize) -> Option<&str> {
        self.0.get(col).map(String::as_str)
    }

    /// The cell at `col`, with missing columns read as `""`.
    pub fn cell(&self, col: usize) -> &str {
        self.get(col).unwrap_or("")
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All cells joined with a single space, for full-row text matching.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

impl From<Vec<String>> for Row {
    fn from(cells: Vec<String>) -> Self {
        Self(cells)
    }
}

impl<'a> From<Vec<&'a str>> for Row {
    fn from(cells: Vec<&'a str>) -> Self {
        Self(cells.into_iter().map(str::to_string).collect())
    }
}
