//! Stable sorting of process lists.

use crate::types::ProcessRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Memory,
    Cpu,
    Pid,
    Name,
    Cwd,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Memory,
        SortKey::Cpu,
        SortKey::Pid,
        SortKey::Name,
        SortKey::Cwd,
    ];

    /// Parses a key name. Unknown names fall back to `Memory`.
    pub fn from_name(name: &str) -> SortKey {
        match name.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" | "rss" => SortKey::Memory,
            "cpu" => SortKey::Cpu,
            "pid" => SortKey::Pid,
            "name" => SortKey::Name,
            "cwd" => SortKey::Cwd,
            other => {
                debug!(key = other, "unknown sort key, sorting by memory");
                SortKey::Memory
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Memory => "memory",
            SortKey::Cpu => "cpu",
            SortKey::Pid => "pid",
            SortKey::Name => "name",
            SortKey::Cwd => "cwd",
        }
    }

    /// Ascending comparison for this key.
    pub fn compare(&self, a: &ProcessRecord, b: &ProcessRecord) -> Ordering {
        match self {
            SortKey::Memory => a.rss_mb.total_cmp(&b.rss_mb),
            SortKey::Cpu => a.cpu_percent.total_cmp(&b.cpu_percent),
            SortKey::Pid => a.pid.cmp(&b.pid),
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Cwd => a
                .cwd
                .sort_key()
                .to_lowercase()
                .cmp(&b.cwd.sort_key().to_lowercase()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SortKey {
    fn from(name: &str) -> Self {
        SortKey::from_name(name)
    }
}

/// Returns a sorted copy. `reverse` means descending (Z to A for text keys).
/// Equal keys keep their input order in both directions.
pub fn sort_processes(procs: &[ProcessRecord], sort_by: SortKey, reverse: bool) -> Vec<ProcessRecord> {
    let mut sorted = procs.to_vec();
    sorted.sort_by(|a, b| {
        let ord = sort_by.compare(a, b);
        if reverse {
            ord.reverse()
        } else {
            ord
        }
    });
    sorted
}
