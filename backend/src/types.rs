//! Data types and error definitions for process management.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Working directory of a process as seen at snapshot time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Cwd {
    Path(String),
    /// Unreadable: permission denied, process gone, or no procfs entry.
    #[default]
    Unknown,
}

impl Cwd {
    /// The resolved path, or `None` when unknown. An empty path counts as unknown.
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Cwd::Path(p) if !p.is_empty() => Some(p),
            _ => None,
        }
    }

    /// Sort key used by the `cwd` column: unknown sorts as the empty string.
    pub fn sort_key(&self) -> &str {
        self.as_path().unwrap_or("")
    }
}

impl From<Option<String>> for Cwd {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(p) if !p.is_empty() && p != "?" => Cwd::Path(p),
            _ => Cwd::Unknown,
        }
    }
}

impl From<Cwd> for Option<String> {
    fn from(value: Cwd) -> Self {
        match value {
            Cwd::Path(p) => Some(p),
            Cwd::Unknown => None,
        }
    }
}

impl fmt::Display for Cwd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path().unwrap_or("?"))
    }
}

/// One process as captured by a snapshot. Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: i32,
    pub name: String,
    /// Space-joined argv, capped at `CMDLINE_MAX_CHARS`.
    pub cmdline: String,
    pub cwd: Cwd,
    /// 0 when the parent is unknown.
    pub ppid: i32,
    /// `"?"` when the parent could not be inspected.
    pub parent_name: String,
    pub rss_mb: f64,
    pub cpu_percent: f64,
    pub username: String,
    /// Seconds since the Unix epoch.
    pub create_time: f64,
    pub status: String,
    pub is_orphan: bool,
    /// Only probed for orphans; always false otherwise.
    pub in_tmux: bool,
    pub exe_deleted: bool,
}

impl ProcessRecord {
    /// Status with `[orphan]`, `[tmux]` and `[stale]` markers appended.
    pub fn display_status(&self) -> String {
        let mut status = self.status.clone();
        if self.is_orphan {
            status.push_str(" [orphan]");
        }
        if self.in_tmux {
            status.push_str(" [tmux]");
        }
        if self.exe_deleted {
            status.push_str(" [stale]");
        }
        status
    }
}

/// Outcome of signalling one pid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KillResult {
    pub pid: i32,
    pub success: bool,
    pub message: String,
}

impl fmt::Display for KillResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "OK" } else { "FAILED" };
        write!(f, "[{}] {}", status, self.message)
    }
}

/// Success/failure counts over a batch of kill results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KillSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl KillSummary {
    pub fn from_results(results: &[KillResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
        }
    }

    /// False as soon as one pid failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// System-wide memory figures, in GiB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySummary {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub percent: f64,
    pub swap_total_gb: f64,
    pub swap_used_gb: f64,
}

/// Errors that can occur during process management.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcError {
    #[error("Access denied for process {0}")]
    PermissionDenied(i32),
    #[error("Process {0} not found")]
    NotFound(i32),
    #[error("Refusing to signal invalid pid {0}")]
    InvalidPid(i32),
    #[error("Failed to send signal to PID {0}: {1}")]
    SignalError(i32, String),
    #[error("Procfs error: {0}")]
    Procfs(String),
    #[error("Other error: {0}")]
    Other(String),
}

impl ProcError {
    /// Classifies a procfs failure that happened while reading `pid`.
    pub fn from_procfs(pid: i32, err: procfs::ProcError) -> Self {
        match err {
            procfs::ProcError::NotFound(_) => ProcError::NotFound(pid),
            procfs::ProcError::PermissionDenied(_) => ProcError::PermissionDenied(pid),
            other => ProcError::Procfs(other.to_string()),
        }
    }
}

impl From<procfs::ProcError> for ProcError {
    fn from(err: procfs::ProcError) -> Self {
        ProcError::Procfs(err.to_string())
    }
}
