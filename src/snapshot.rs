// src/snapshot.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::DirectoryConfig;
use crate::detail::{resolve_detail, ResourceDetail};
use crate::error::{DirectoryError, Result};
use crate::index::{classify, collect_categories, RowKind};
use crate::keywords::{suggest_keywords, KeywordCount};
use crate::search::{self, SearchHit, SearchMode};
use crate::table::{self, Table};

/// Readiness report for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub ready: bool,
    pub source: PathBuf,
    pub rows: usize,
    pub resources: usize,
    pub categories: usize,
    pub loaded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Everything derived from one load of the source table. Never mutated after construction;
/// a reload builds a new one.
#[derive(Debug)]
pub struct Snapshot {
    table: Table,
    kinds: Vec<RowKind>,
    categories: Vec<String>,
    resources: usize,
    unavailable: Option<String>,
    source: PathBuf,
    loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// Load from `cfg.source`. Never fails: a missing or unreadable file, or a table without a
    /// header row, yields a snapshot that reports not-ready and answers every query empty.
    #[tracing::instrument(level = "info", skip(cfg), fields(path = %cfg.source.display()))]
    pub fn load(cfg: &DirectoryConfig) -> Self {
        let start = Instant::now();
        match table::read_table(cfg) {
            Ok(table) => {
                let snap = Self::from_table(table, cfg);
                info!(
                    rows = snap.table.len(),
                    resources = snap.resources,
                    categories = snap.categories.len(),
                    ready = snap.is_ready(),
                    elapsed = ?start.elapsed(),
                    "loaded resource table"
                );
                snap
            }
            Err(e) => {
                if cfg.source.exists() {
                    error!(error = %format!("{e:#}"), "could not parse resource table");
                } else {
                    warn!(error = %format!("{e:#}"), "resource table missing");
                }
                Self::unavailable(cfg, format!("{e:#}"))
            }
        }
    }

    /// Build from an already-parsed table.
    pub fn from_table(table: Table, cfg: &DirectoryConfig) -> Self {
        let kinds = classify(&table, cfg);
        let (categories, resources, unavailable) = if table.header.is_some() {
            let resources = kinds.iter().filter(|k| k.is_resource()).count();
            (collect_categories(&kinds), resources, None)
        } else {
            let reason = format!(
                "no header row with '{}' in column {}",
                cfg.header_sentinel, cfg.columns.name
            );
            (Vec::new(), 0, Some(reason))
        };

        Self {
            table,
            kinds,
            categories,
            resources,
            unavailable,
            source: cfg.source.clone(),
            loaded_at: Utc::now(),
        }
    }

    /// A snapshot with no data, reporting `reason`.
    pub fn unavailable(cfg: &DirectoryConfig, reason: impl Into<String>) -> Self {
        Self {
            table: Table::default(),
            kinds: Vec::new(),
            categories: Vec::new(),
            resources: 0,
            unavailable: Some(reason.into()),
            source: cfg.source.clone(),
            loaded_at: Utc::now(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.unavailable.is_none()
    }

    pub fn status(&self) -> Status {
        Status {
            ready: self.is_ready(),
            source: self.source.clone(),
            rows: self.table.len(),
            resources: self.resources,
            categories: self.categories.len(),
            loaded_at: self.loaded_at,
            reason: self.unavailable.clone(),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn search(&self, query: &str, mode: SearchMode) -> Vec<SearchHit> {
        if !self.is_ready() {
            return Vec::new();
        }
        search::run(&self.table.rows, &self.kinds, query, mode)
    }

    pub fn resolve_detail(&self, position: usize, cfg: &DirectoryConfig) -> Result<ResourceDetail> {
        match (&self.unavailable, &self.table.header) {
            (None, Some(header)) => resolve_detail(&self.table.rows, header, position, cfg),
            (reason, _) => Err(DirectoryError::DataUnavailable {
                reason: reason.clone().unwrap_or_else(|| "no header row".into()),
            }),
        }
    }

    pub fn suggest_keywords(&self, cfg: &DirectoryConfig, limit: usize) -> Vec<KeywordCount> {
        if !self.is_ready() {
            return Vec::new();
        }
        suggest_keywords(&self.table.rows, &self.kinds, cfg, limit)
    }
}
