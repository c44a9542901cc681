//! Process killing functionality.

use crate::types::{KillResult, ProcError};
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::{info, warn};

/// Sends `sig` to `pid`, classifying the errno.
///
/// `pid <= 0` is rejected: `kill(2)` would address a process group or every
/// process the caller may signal.
pub fn send_signal(pid: i32, sig: Signal) -> Result<(), ProcError> {
    if pid <= 0 {
        return Err(ProcError::InvalidPid(pid));
    }
    match signal::kill(Pid::from_raw(pid), sig) {
        Ok(()) => Ok(()),
        Err(Errno::ESRCH) => Err(ProcError::NotFound(pid)),
        Err(Errno::EPERM) => Err(ProcError::PermissionDenied(pid)),
        Err(e) => Err(ProcError::SignalError(pid, e.to_string())),
    }
}

/// Terminates `pid` with SIGTERM, or SIGKILL when `force` is set.
/// Does not wait for the process to exit. Never fails: errors become a
/// `KillResult` with `success == false`.
pub fn kill_process(pid: i32, force: bool) -> KillResult {
    let sig = if force { Signal::SIGKILL } else { Signal::SIGTERM };
    match send_signal(pid, sig) {
        Ok(()) => {
            info!(pid, signal = %sig, "signal sent");
            let message = if force {
                format!("Process {pid} killed (SIGKILL)")
            } else {
                format!("Process {pid} terminated")
            };
            KillResult {
                pid,
                success: true,
                message,
            }
        }
        Err(e) => {
            warn!(pid, signal = %sig, error = %e, "kill failed");
            KillResult {
                pid,
                success: false,
                message: e.to_string(),
            }
        }
    }
}

/// Signals each pid in order. A failure never skips the remaining pids.
pub fn kill_processes(pids: &[i32], force: bool) -> Vec<KillResult> {
    pids.iter().map(|&pid| kill_process(pid, force)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_pids_are_refused() {
        for pid in [0, -1, -4242] {
            let result = kill_process(pid, true);
            assert!(!result.success);
            assert_eq!(result.message, format!("Refusing to signal invalid pid {pid}"));
        }
    }

    #[test]
    fn missing_process_reports_not_found() {
        // Above the kernel's PID_MAX_LIMIT (4194304), so never allocated.
        let pid = 4_194_305 + 1000;
        assert_eq!(send_signal(pid, Signal::SIGTERM), Err(ProcError::NotFound(pid)));
        let result = kill_process(pid, false);
        assert_eq!(result.message, format!("Process {pid} not found"));
    }
}
