// src/directory.rs
use std::sync::{Arc, RwLock};
use tracing::{info, instrument};

use crate::config::DirectoryConfig;
use crate::detail::ResourceDetail;
use crate::error::Result;
use crate::keywords::{featured_keywords, KeywordCount};
use crate::search::{SearchHit, SearchMode};
use crate::snapshot::{Snapshot, Status};

/// The resource directory as the presentation layer sees it.
///
/// Queries run against an immutable `Snapshot`. The lock only guards the pointer: readers
/// clone the `Arc` and release it before doing any work, and `reload` builds the replacement
/// off-lock and swaps it in one step, so a reader never observes a half-built snapshot.
pub struct Directory {
    cfg: DirectoryConfig,
    current: RwLock<Arc<Snapshot>>,
}

impl Directory {
    /// Load the source table named by `cfg`. Never fails; check `status()`.
    pub fn open(cfg: DirectoryConfig) -> Self {
        let snapshot = Snapshot::load(&cfg);
        Self {
            cfg,
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Wrap a snapshot built elsewhere.
    pub fn from_snapshot(cfg: DirectoryConfig, snapshot: Snapshot) -> Self {
        Self {
            cfg,
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.cfg
    }

    /// The snapshot current at the time of the call.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        // A poisoned lock still holds a whole Arc; the swap is a single store.
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Re-read the source and atomically replace the snapshot. Returns the new status.
    #[instrument(level = "info", skip(self), fields(path = %self.cfg.source.display()))]
    pub fn reload(&self) -> Status {
        let fresh = Arc::new(Snapshot::load(&self.cfg));
        let status = fresh.status();
        {
            let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
            *guard = fresh;
        }
        info!(ready = status.ready, rows = status.rows, "snapshot swapped");
        status
    }

    pub fn status(&self) -> Status {
        self.snapshot().status()
    }

    pub fn search(&self, query: &str, mode: SearchMode) -> Vec<SearchHit> {
        self.snapshot().search(query, mode)
    }

    pub fn list_categories(&self) -> Vec<String> {
        self.snapshot().categories().to_vec()
    }

    pub fn resolve_detail(&self, position: usize) -> Result<ResourceDetail> {
        self.snapshot().resolve_detail(position, &self.cfg)
    }

    pub fn featured_keywords(&self) -> Vec<String> {
        featured_keywords(&self.cfg)
    }

    pub fn suggested_keywords(&self, limit: usize) -> Vec<KeywordCount> {
        self.snapshot().suggest_keywords(&self.cfg, limit)
    }
}
