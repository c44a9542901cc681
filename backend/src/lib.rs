//! UI-agnostic process cleanup engine for Linux.
//!
//! Captures a snapshot of the current user's processes, classifies them
//! (orphan, tmux, system service, killable), filters, sorts and groups them,
//! and sends termination signals. Uses `procfs` and `nix` for system interaction.

mod classify;
mod config;
mod constants;
mod filters;
mod groups;
mod memory;
mod process_kill;
mod process_list;
mod sort;
mod types;

pub use classify::{
    detect_tmux, is_critical_name, is_killable, is_orphan, is_system_exe, is_system_service,
    is_system_service_with, read_cwd, read_tmux_env, ExeLookup, ProcfsExeLookup,
};
pub use config::ViewConfig;
pub use constants::*;
pub use filters::{
    filter_by_cwd, filter_high_memory, filter_killable, filter_killable_with, filter_orphans,
    filter_stale, validate_cwd_pattern, FilterKind,
};
pub use groups::{find_similar_processes, group_key, summarize_groups, GroupSummary};
pub use memory::get_memory_summary;
pub use process_kill::{kill_process, kill_processes, send_signal};
pub use process_list::{current_username, list_processes, SnapshotOptions};
pub use sort::{sort_processes, SortKey};
pub use types::{Cwd, KillResult, KillSummary, MemorySummary, ProcError, ProcessRecord};
