//! View settings shared by the CLI and the GUI.

use crate::constants::{DEFAULT_MIN_MEMORY_MB, HIGH_MEMORY_THRESHOLD_MB};
use crate::filters::{filter_by_cwd, FilterKind};
use crate::process_list::SnapshotOptions;
use crate::sort::{sort_processes, SortKey};
use crate::types::ProcessRecord;
use serde::{Deserialize, Serialize};

/// Everything that decides which processes are shown and in what order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ViewConfig {
    /// Snapshot cut-off in MB.
    pub min_memory_mb: f64,
    /// Threshold for the high-memory preset in MB.
    pub high_memory_threshold_mb: f64,
    pub sort: SortKey,
    pub ascending: bool,
    /// Glob or directory prefix.
    pub cwd: Option<String>,
    pub filter: FilterKind,
    /// Owner to list; defaults to the current login user.
    pub user: Option<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_memory_mb: DEFAULT_MIN_MEMORY_MB,
            high_memory_threshold_mb: HIGH_MEMORY_THRESHOLD_MB,
            sort: SortKey::Memory,
            ascending: false,
            cwd: None,
            filter: FilterKind::None,
            user: None,
        }
    }
}

impl ViewConfig {
    pub fn snapshot_options(&self) -> SnapshotOptions {
        SnapshotOptions {
            user: self.user.clone(),
            min_memory_mb: self.min_memory_mb,
        }
    }

    /// The cwd pattern in effect. A blank pattern means no cwd filter.
    pub fn cwd_pattern(&self) -> Option<&str> {
        self.cwd
            .as_deref()
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty())
    }

    /// True when neither a preset nor a cwd pattern narrows the snapshot.
    pub fn selects_everything(&self) -> bool {
        self.filter == FilterKind::None && self.cwd_pattern().is_none()
    }

    /// cwd filter, then the preset, then the sort.
    pub fn apply(&self, snapshot: &[ProcessRecord]) -> Vec<ProcessRecord> {
        let scoped = match self.cwd_pattern() {
            Some(pattern) => filter_by_cwd(snapshot, pattern),
            None => snapshot.to_vec(),
        };
        let filtered = self.filter.apply(&scoped, self.high_memory_threshold_mb);
        sort_processes(&filtered, self.sort, !self.ascending)
    }
}
