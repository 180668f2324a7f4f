// src/table/mod.rs
use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder};
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, warn};

use crate::config::DirectoryConfig;

mod row;

pub use row::Row;

/// The row promoted to column names. Labels are trimmed copies of the source cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub position: usize,
    pub labels: Row,
}

/// Every row of the source, in file order, plus the header if one was found.
/// A row's index in `rows` is its identity for the life of the snapshot.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub rows: Vec<Row>,
    pub header: Option<Header>,
}

impl Table {
    pub fn new(rows: Vec<Row>, cfg: &DirectoryConfig) -> Self {
        let header = find_header(&rows, cfg);
        Self { rows, header }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read the table at `cfg.source`. A missing file or a read failure is an error here;
/// callers decide how to degrade.
#[tracing::instrument(level = "info", skip(cfg), fields(path = %cfg.source.display()))]
pub fn read_table(cfg: &DirectoryConfig) -> Result<Table> {
    let path: &Path = &cfg.source;
    let file =
        File::open(path).with_context(|| format!("Failed to open table file: {:?}", path))?;
    parse_table(file, cfg).with_context(|| format!("Failed to parse table file: {:?}", path))
}

/// Parse delimited text into a `Table`. No type inference and no NA substitution: every cell
/// stays the exact string the file holds. Invalid UTF-8 is replaced lossily rather than rejected.
pub fn parse_table<R: Read>(reader: R, cfg: &DirectoryConfig) -> Result<Table> {
    let delimiter = cfg.delimiter_byte()?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // rows are ragged
        .delimiter(delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    loop {
        let more = rdr
            .read_byte_record(&mut record)
            .with_context(|| format!("CSV parse error at record {}", rows.len()))?;
        if !more {
            break;
        }
        let cells: Vec<String> = record
            .iter()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .collect();
        rows.push(Row::new(cells));
    }

    let table = Table::new(rows, cfg);
    debug!(rows = table.len(), header = ?table.header.as_ref().map(|h| h.position), "parsed table");
    Ok(table)
}

/// First row whose name column equals the sentinel, case-insensitively. First match wins.
fn find_header(rows: &[Row], cfg: &DirectoryConfig) -> Option<Header> {
    let sentinel = cfg.header_sentinel.to_uppercase();
    let found = rows
        .iter()
        .position(|row| row.cell(cfg.columns.name).trim().to_uppercase() == sentinel);

    match found {
        Some(position) => {
            let labels = rows[position]
                .cells()
                .iter()
                .map(|c| c.trim().to_string())
                .collect::<Vec<_>>();
            Some(Header {
                position,
                labels: Row::new(labels),
            })
        }
        None => {
            warn!(sentinel = %sentinel, "no header row found");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    pub(crate) fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,servicefinder=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    const SAMPLE: &str = "Walla Walla Resource Guide,,,\n\
NAME,PHONE:,ADDRESS:,TYPE\n\
,,,Community Services- Food\n\
Blue Mountain Food Bank,509-555-0100,12 Main St\n\
\"Meals, Inc.\",509-555-0101,,\n";

    #[test]
    fn parses_ragged_rows_and_finds_header() -> Result<()> {
        init_test_logging();
        let table = parse_table(Cursor::new(SAMPLE), &DirectoryConfig::default())?;

        assert_eq!(table.len(), 5);
        let header = table.header.expect("header row");
        assert_eq!(header.position, 1);
        assert_eq!(header.labels.cell(0), "NAME");
        assert_eq!(header.labels.cell(1), "PHONE:");
        assert_eq!(header.labels.cell(3), "TYPE");

        // short row keeps its own length
        assert_eq!(table.rows[3].len(), 3);
        assert_eq!(table.rows[3].cell(3), "");
        // quoted delimiter stays inside the cell
        assert_eq!(table.rows[4].cell(0), "Meals, Inc.");
        assert_eq!(table.rows[4].get(2), Some(""));
        Ok(())
    }

    #[test]
    fn header_match_is_case_insensitive_and_first_wins() -> Result<()> {
        let text = "x\n  name  ,a\nNAME,b\n";
        let table = parse_table(Cursor::new(text), &DirectoryConfig::default())?;
        let header = table.header.expect("header row");
        assert_eq!(header.position, 1);
        assert_eq!(header.labels.cell(0), "name");
        Ok(())
    }

    #[test]
    fn no_header_leaves_rows_intact() -> Result<()> {
        let text = "Food Bank,1\nShelter,2\n";
        let table = parse_table(Cursor::new(text), &DirectoryConfig::default())?;
        assert_eq!(table.len(), 2);
        assert!(table.header.is_none());
        Ok(())
    }

    #[test]
    fn reads_from_disk_with_custom_delimiter() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"NAME\tPHONE\nShelter\t555\n")?;
        let mut cfg = DirectoryConfig::default().with_source(tmp.path());
        cfg.delimiter = '\t';

        let table = read_table(&cfg)?;
        assert_eq!(table.rows[1].cell(1), "555");
        assert_eq!(table.header.map(|h| h.position), Some(0));
        Ok(())
    }

    #[test]
    fn non_ascii_delimiter_fails_instead_of_splitting_on_comma() {
        let mut cfg = DirectoryConfig::default();
        cfg.delimiter = '¦';
        let err = parse_table(Cursor::new("NAME¦PHONE\nA, B¦555\n"), &cfg).unwrap_err();
        assert!(err.to_string().contains("not a single ASCII byte"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let cfg = DirectoryConfig::default().with_source("/no/such/table.csv");
        let err = read_table(&cfg).unwrap_err();
        assert!(err.to_string().contains("Failed to open table file"));
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() -> Result<()> {
        let bytes: &[u8] = b"NAME\nCaf\xe9 Esperanza\n";
        let table = parse_table(Cursor::new(bytes), &DirectoryConfig::default())?;
        assert!(table.rows[1].cell(0).starts_with("Caf"));
        Ok(())
    }
}
