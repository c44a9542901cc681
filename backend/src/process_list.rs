//! Snapshot provider: reads the process table through procfs.

use crate::classify::{detect_tmux, is_exe_deleted, is_orphan, resolve_cwd};
use crate::constants::{CMDLINE_MAX_CHARS, DEFAULT_MIN_MEMORY_MB};
use crate::types::{ProcError, ProcessRecord};
use nix::unistd::{Uid, User};
use procfs::process::{Process, Stat};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::debug;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// `comm` longer than this was cut by the kernel (TASK_COMM_LEN - 1).
const COMM_MAX_LEN: usize = 15;

/// Minimum wall time between two samples for a delta-based CPU figure.
const MIN_SAMPLE_SECS: f64 = 0.5;

// CPU samples survive between snapshots so GUI refreshes report recent usage.
static CPU_TRACKER: Mutex<Option<CpuTracker>> = Mutex::new(None);

struct CpuSample {
    total_ticks: u64,
    taken_at: Instant,
}

struct CpuTracker {
    samples: HashMap<i32, CpuSample>,
    ticks_per_second: f64,
}

impl CpuTracker {
    fn new() -> Self {
        Self {
            samples: HashMap::new(),
            ticks_per_second: procfs::ticks_per_second().max(1) as f64,
        }
    }

    /// Percent of one CPU since the previous sample, or the lifetime average
    /// when the pid has not been seen recently.
    fn cpu_percent(&mut self, pid: i32, total_ticks: u64, age_secs: f64) -> f64 {
        let now = Instant::now();
        let tps = self.ticks_per_second;
        let lifetime = || {
            if age_secs > 0.0 {
                (total_ticks as f64 / tps) / age_secs * 100.0
            } else {
                0.0
            }
        };

        let percent = match self.samples.get(&pid) {
            Some(prev) => {
                let elapsed = now.duration_since(prev.taken_at).as_secs_f64();
                if elapsed < MIN_SAMPLE_SECS {
                    return lifetime().max(0.0);
                }
                let delta = total_ticks.saturating_sub(prev.total_ticks) as f64;
                (delta / tps) / elapsed * 100.0
            }
            None => lifetime(),
        };

        self.samples.insert(
            pid,
            CpuSample {
                total_ticks,
                taken_at: now,
            },
        );
        percent.max(0.0)
    }

    fn cleanup_old_processes(&mut self, current_pids: &[i32]) {
        let current: std::collections::HashSet<i32> = current_pids.iter().copied().collect();
        self.samples.retain(|pid, _| current.contains(pid));
    }
}

/// What to include in a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotOptions {
    /// Owner to keep; `None` means the current login user.
    pub user: Option<String>,
    /// Processes below this RSS (MB) are skipped before classification.
    pub min_memory_mb: f64,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            user: None,
            min_memory_mb: DEFAULT_MIN_MEMORY_MB,
        }
    }
}

/// Name of the user running this program, or the numeric uid when it has no
/// passwd entry.
pub fn current_username() -> String {
    username_for(Uid::current().as_raw())
}

fn username_for(uid: u32) -> String {
    match User::from_uid(Uid::from_raw(uid)) {
        Ok(Some(user)) => user.name,
        _ => uid.to_string(),
    }
}

/// Captures a fresh snapshot of the selected user's processes.
///
/// Only failing to enumerate `/proc` is an error. Processes that vanish or
/// cannot be read mid-scan are skipped.
pub fn list_processes(opts: &SnapshotOptions) -> Result<Vec<ProcessRecord>, ProcError> {
    let target_user = opts.user.clone().unwrap_or_else(current_username);

    // Only stats are kept from the scan: a `Process` holds an open fd, and a
    // large process table would exhaust the descriptor limit.
    let mut entries: Vec<(Stat, Option<u32>)> = Vec::new();
    for proc_result in procfs::process::all_processes()? {
        let proc = match proc_result {
            Ok(proc) => proc,
            Err(e) => {
                debug!(error = %e, "skipping unreadable /proc entry");
                continue;
            }
        };
        match proc.stat() {
            Ok(stat) => entries.push((stat, proc.uid().ok())),
            Err(e) => debug!(pid = proc.pid, error = %e, "skipping process without stat"),
        }
    }

    let names: HashMap<i32, String> = entries
        .iter()
        .map(|(stat, _)| (stat.pid, stat.comm.clone()))
        .collect();
    let current_pids: Vec<i32> = entries.iter().map(|(stat, _)| stat.pid).collect();

    let ctx = ScanContext {
        boot_time: procfs::boot_time_secs().unwrap_or(0) as f64,
        ticks_per_second: procfs::ticks_per_second().max(1) as f64,
        page_size: procfs::page_size(),
        now: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0),
    };

    let mut tracker_guard = CPU_TRACKER.lock().unwrap_or_else(PoisonError::into_inner);
    let tracker = tracker_guard.get_or_insert_with(CpuTracker::new);

    let mut usernames: HashMap<u32, String> = HashMap::new();
    let mut records = Vec::new();

    for (stat, uid) in &entries {
        let Some(uid) = *uid else {
            debug!(pid = stat.pid, "skipping process without uid");
            continue;
        };
        let username = usernames
            .entry(uid)
            .or_insert_with(|| username_for(uid))
            .clone();
        if username != target_user {
            continue;
        }

        let rss_mb = (stat.rss * ctx.page_size) as f64 / BYTES_PER_MB;
        if rss_mb < opts.min_memory_mb {
            continue;
        }

        let proc = match Process::new(stat.pid) {
            Ok(proc) => proc,
            Err(e) => {
                debug!(pid = stat.pid, error = %e, "process exited during scan");
                continue;
            }
        };
        records.push(build_record(&proc, stat, username, rss_mb, &names, &ctx, tracker));
    }

    tracker.cleanup_old_processes(&current_pids);
    debug!(count = records.len(), user = %target_user, "snapshot captured");
    Ok(records)
}

struct ScanContext {
    boot_time: f64,
    ticks_per_second: f64,
    page_size: u64,
    now: f64,
}

fn build_record(
    proc: &Process,
    stat: &Stat,
    username: String,
    rss_mb: f64,
    names: &HashMap<i32, String>,
    ctx: &ScanContext,
    tracker: &mut CpuTracker,
) -> ProcessRecord {
    let pid = stat.pid;
    let argv = proc.cmdline().unwrap_or_default();
    let exe = proc.exe().ok();
    let name = full_name(&stat.comm, argv.first().map(String::as_str), exe.as_deref());
    let cmdline = truncate_chars(&argv.join(" "), CMDLINE_MAX_CHARS);
    let cmdline = if cmdline.is_empty() { name.clone() } else { cmdline };

    let ppid = stat.ppid.max(0);
    let parent_name = names
        .get(&ppid)
        .cloned()
        .unwrap_or_else(|| "?".to_string());

    let create_time = ctx.boot_time + stat.starttime as f64 / ctx.ticks_per_second;
    let cpu_percent = tracker.cpu_percent(pid, stat.utime + stat.stime, ctx.now - create_time);

    let orphan = is_orphan(ppid, &parent_name);
    let in_tmux = orphan && detect_tmux(pid);
    let exe_deleted = exe.as_deref().is_some_and(is_exe_deleted);

    ProcessRecord {
        pid,
        name,
        cmdline,
        cwd: resolve_cwd(pid),
        ppid,
        parent_name,
        rss_mb,
        cpu_percent,
        username,
        create_time,
        status: state_name(stat.state).to_string(),
        is_orphan: orphan,
        in_tmux,
        exe_deleted,
    }
}

/// Maps the one-letter kernel state to a word.
pub fn state_name(state: char) -> &'static str {
    match state {
        'R' => "running",
        'S' => "sleeping",
        'D' => "disk-sleep",
        'Z' => "zombie",
        'T' => "stopped",
        't' => "tracing-stop",
        'X' | 'x' => "dead",
        'K' => "wake-kill",
        'W' => "waking",
        'P' => "parked",
        'I' => "idle",
        _ => "?",
    }
}

/// Undoes the kernel's `comm` truncation.
///
/// A 15-byte `comm` is replaced by the basename of argv[0], or else of the
/// executable, when that basename starts with it.
fn full_name(comm: &str, argv0: Option<&str>, exe: Option<&Path>) -> String {
    if comm.len() < COMM_MAX_LEN {
        return comm.to_string();
    }
    let from_argv = argv0
        .and_then(|arg| Path::new(arg).file_name())
        .map(|base| base.to_string_lossy().into_owned());
    let from_exe = exe
        .and_then(Path::file_name)
        .map(|base| base.to_string_lossy().trim_end_matches(" (deleted)").to_string());

    [from_argv, from_exe]
        .into_iter()
        .flatten()
        .find(|candidate| candidate.len() > comm.len() && candidate.starts_with(comm))
        .unwrap_or_else(|| comm.to_string())
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
