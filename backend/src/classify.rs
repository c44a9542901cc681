//! Derived process attributes: orphan, tmux membership, system service, killable.
//!
//! Every probe that touches `/proc` returns a `Result`; the classifiers fold
//! failures into `false` so a vanished or unreadable process never aborts a
//! snapshot or a filter pass.

use crate::constants::{CRITICAL_SERVICES, INIT_PARENT_NAMES, SYSTEM_EXE_PATHS};
use crate::types::{Cwd, ProcError, ProcessRecord};
use procfs::process::Process;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

const DELETED_SUFFIX: &str = " (deleted)";

/// Resolves the executable path of a live process.
pub trait ExeLookup {
    fn exe_path(&self, pid: i32) -> Result<PathBuf, ProcError>;
}

/// Reads `/proc/<pid>/exe`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcfsExeLookup;

impl ExeLookup for ProcfsExeLookup {
    fn exe_path(&self, pid: i32) -> Result<PathBuf, ProcError> {
        let proc = Process::new(pid).map_err(|e| ProcError::from_procfs(pid, e))?;
        proc.exe().map_err(|e| ProcError::from_procfs(pid, e))
    }
}

/// Orphan iff re-parented to pid 1 or to an init-like process.
/// Purely syntactic: the parent is not checked for liveness.
pub fn is_orphan(ppid: i32, parent_name: &str) -> bool {
    ppid == 1 || INIT_PARENT_NAMES.contains(&parent_name)
}

/// Reads the environment block of `pid` and looks for a `TMUX` entry.
pub fn read_tmux_env(pid: i32) -> Result<bool, ProcError> {
    let proc = Process::new(pid).map_err(|e| ProcError::from_procfs(pid, e))?;
    let environ = proc.environ().map_err(|e| ProcError::from_procfs(pid, e))?;
    Ok(environ.contains_key(OsStr::new("TMUX")))
}

/// Like [`read_tmux_env`], but any read failure counts as "not in tmux".
pub fn detect_tmux(pid: i32) -> bool {
    read_tmux_env(pid).unwrap_or_else(|e| {
        debug!(pid, error = %e, "environ unreadable, assuming not in tmux");
        false
    })
}

/// Reads `/proc/<pid>/cwd`.
pub fn read_cwd(pid: i32) -> Result<PathBuf, ProcError> {
    let proc = Process::new(pid).map_err(|e| ProcError::from_procfs(pid, e))?;
    proc.cwd().map_err(|e| ProcError::from_procfs(pid, e))
}

/// Working directory of `pid`, or [`Cwd::Unknown`] when it cannot be read.
pub fn resolve_cwd(pid: i32) -> Cwd {
    match read_cwd(pid) {
        Ok(path) => Cwd::from(Some(path.to_string_lossy().into_owned())),
        Err(_) => Cwd::Unknown,
    }
}

/// True when the kernel reports the executable as removed from disk.
pub fn is_exe_deleted(exe: &Path) -> bool {
    exe.to_string_lossy().ends_with(DELETED_SUFFIX)
}

/// Case-insensitive membership in [`CRITICAL_SERVICES`].
pub fn is_critical_name(name: &str) -> bool {
    CRITICAL_SERVICES
        .iter()
        .any(|critical| critical.eq_ignore_ascii_case(name))
}

/// True when `exe` lives under one of [`SYSTEM_EXE_PATHS`].
pub fn is_system_exe(exe: &Path) -> bool {
    let exe = exe.to_string_lossy();
    SYSTEM_EXE_PATHS
        .iter()
        .any(|prefix| exe.starts_with(prefix))
}

/// System-service check against the live process table.
pub fn is_system_service(proc: &ProcessRecord) -> bool {
    is_system_service_with(proc, &ProcfsExeLookup)
}

/// System-service check with an explicit executable lookup.
///
/// A failed lookup classifies the process as *not* a system service. This
/// keeps unverifiable processes killable; the name check still applies.
pub fn is_system_service_with(proc: &ProcessRecord, lookup: &impl ExeLookup) -> bool {
    if is_critical_name(&proc.name) {
        return true;
    }
    match lookup.exe_path(proc.pid) {
        Ok(exe) => is_system_exe(&exe),
        Err(e) => {
            debug!(pid = proc.pid, error = %e, "exe lookup failed, not a system service");
            false
        }
    }
}

/// Safe to offer for bulk termination: orphaned, outside tmux, not a system service.
pub fn is_killable(proc: &ProcessRecord, lookup: &impl ExeLookup) -> bool {
    proc.is_orphan && !proc.in_tmux && !is_system_service_with(proc, lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeExe(HashMap<i32, PathBuf>);

    impl ExeLookup for FakeExe {
        fn exe_path(&self, pid: i32) -> Result<PathBuf, ProcError> {
            self.0.get(&pid).cloned().ok_or(ProcError::PermissionDenied(pid))
        }
    }

    fn record(pid: i32, name: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
            is_orphan: true,
            ..Default::default()
        }
    }

    #[test]
    fn orphan_by_ppid_or_init_parent() {
        assert!(is_orphan(1, "?"));
        assert!(is_orphan(1234, "systemd"));
        assert!(is_orphan(1234, "init"));
        assert!(!is_orphan(1234, "bash"));
        assert!(!is_orphan(0, "?"));
    }

    #[test]
    fn critical_names_match_any_case() {
        let lookup = FakeExe(HashMap::new());
        assert!(is_system_service_with(&record(10, "PIPEWIRE"), &lookup));
        assert!(is_system_service_with(&record(11, "tmux: server"), &lookup));
        assert!(!is_system_service_with(&record(12, "python"), &lookup));
    }

    #[test]
    fn system_exe_prefix_marks_service() {
        let mut exes = HashMap::new();
        exes.insert(20, PathBuf::from("/usr/libexec/gvfsd"));
        exes.insert(21, PathBuf::from("/home/me/.cargo/bin/rg"));
        let lookup = FakeExe(exes);
        assert!(is_system_service_with(&record(20, "gvfsd"), &lookup));
        assert!(!is_system_service_with(&record(21, "rg"), &lookup));
    }

    #[test]
    fn failed_exe_lookup_is_not_a_service() {
        let lookup = FakeExe(HashMap::new());
        assert!(!is_system_service_with(&record(30, "node"), &lookup));
        assert!(is_killable(&record(30, "node"), &lookup));
    }

    #[test]
    fn killable_requires_orphan_outside_tmux() {
        let lookup = FakeExe(HashMap::new());
        let mut rec = record(40, "node");
        rec.in_tmux = true;
        assert!(!is_killable(&rec, &lookup));
        rec.in_tmux = false;
        rec.is_orphan = false;
        assert!(!is_killable(&rec, &lookup));
    }

    #[test]
    fn deleted_exe_suffix() {
        assert!(is_exe_deleted(Path::new("/usr/bin/firefox (deleted)")));
        assert!(!is_exe_deleted(Path::new("/usr/bin/firefox")));
    }

    #[test]
    fn own_process_is_readable() {
        let pid = std::process::id() as i32;
        assert!(ProcfsExeLookup.exe_path(pid).is_ok());
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(read_cwd(pid).unwrap(), cwd);
    }
}
