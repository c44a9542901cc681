//! CLI arguments and subcommands for procclean.
//!
//! Every subcommand that looks at processes shares [`ViewArgs`]; values given
//! here override the optional TOML config file.

use crate::columns::Column;
use backend::{validate_cwd_pattern, FilterKind};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Output format for process listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    #[value(alias = "md")]
    Markdown,
}

#[derive(Parser, Debug)]
#[command(
    name = "procclean",
    about = "Find and clean up orphaned, stale and memory-hungry processes",
    long_about = "Find and clean up orphaned, stale and memory-hungry processes.\n\n\
                  Lists the current user's processes, flags orphans (re-parented to init), \
                  processes inside tmux and system services, and terminates selected \
                  processes after confirmation.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Config file (TOML); falls back to $PROCCLEAN_CONFIG
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List processes (default)
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show processes that run the same executable
    #[command(alias = "g")]
    Groups(GroupsArgs),

    /// Terminate processes by pid or by filter
    Kill(KillArgs),

    /// Show the system memory summary
    #[command(alias = "mem")]
    Memory(MemoryArgs),
}

/// Selection and ordering flags shared by `list` and `kill`.
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct ViewArgs {
    /// Sort by field (memory, cpu, pid, name, cwd)
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Sort ascending instead of descending
    #[arg(short, long)]
    pub ascending: bool,

    /// Filter preset (none, orphans, killable, high-memory, stale)
    #[arg(short = 'F', long, value_parser = parse_filter_kind)]
    pub filter: Option<FilterKind>,

    /// Only orphaned processes (--filter orphans)
    #[arg(short, long)]
    pub orphans: bool,

    /// Only killable orphans (--filter killable)
    #[arg(short, long)]
    pub killable: bool,

    /// Only high-memory processes (--filter high-memory)
    #[arg(short = 'm', long)]
    pub high_memory: bool,

    /// Threshold for the high-memory filter, in MB
    #[arg(long, value_name = "MB")]
    pub high_memory_threshold: Option<f64>,

    /// Skip processes below this RSS, in MB
    #[arg(long, value_name = "MB")]
    pub min_memory: Option<f64>,

    /// Working directory: a glob (/tmp/*) or a directory prefix
    #[arg(long, value_name = "PATTERN", value_parser = parse_cwd_pattern)]
    pub cwd: Option<String>,

    /// List another user's processes
    #[arg(short, long)]
    pub user: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Columns to show, comma separated (pid,name,rss_mb,cpu_percent,cwd,ppid,parent_name,status,cmdline,username)
    #[arg(short = 'C', long, value_name = "COLS", value_delimiter = ',', value_parser = parse_column)]
    pub columns: Option<Vec<Column>>,

    /// Show at most N processes
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(ClapArgs, Debug)]
pub struct GroupsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Skip processes below this RSS, in MB
    #[arg(long, value_name = "MB")]
    pub min_memory: Option<f64>,

    /// Group another user's processes
    #[arg(short, long)]
    pub user: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct KillArgs {
    /// Process IDs to kill; without pids the filter flags select targets
    pub pids: Vec<i32>,

    /// Force kill (SIGKILL instead of SIGTERM)
    #[arg(short, long)]
    pub force: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Show what would be killed without sending signals
    #[arg(long, alias = "dry-run")]
    pub preview: bool,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Output format for the preview
    #[arg(short = 'O', long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Columns shown in the preview, comma separated
    #[arg(short = 'C', long, value_name = "COLS", value_delimiter = ',', value_parser = parse_column)]
    pub columns: Option<Vec<Column>>,

    /// Kill at most N of the filtered processes
    #[arg(short = 'n', long, value_name = "N", conflicts_with = "pids")]
    pub limit: Option<usize>,
}

#[derive(ClapArgs, Debug)]
pub struct MemoryArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

fn parse_filter_kind(s: &str) -> Result<FilterKind, String> {
    s.parse()
}

fn parse_column(s: &str) -> Result<Column, String> {
    s.parse()
}

/// Rejects malformed globs here so the engine never sees them.
fn parse_cwd_pattern(s: &str) -> Result<String, String> {
    validate_cwd_pattern(s)?;
    Ok(s.trim().to_string())
}
