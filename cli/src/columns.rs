//! Column registry for process listings.

use backend::ProcessRecord;
use std::str::FromStr;

/// Which end of an over-long cell survives clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipSide {
    /// Keep the tail, `...` in front. Used for paths.
    Left,
    /// Keep the head, `...` at the end.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Pid,
    Name,
    Rss,
    Cpu,
    Cwd,
    Ppid,
    Parent,
    Status,
    Command,
    User,
}

/// Shown when `--columns` is not given.
pub const DEFAULT_COLUMNS: &[Column] = &[
    Column::Pid,
    Column::Name,
    Column::Rss,
    Column::Cpu,
    Column::Cwd,
    Column::Ppid,
    Column::Status,
];

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Pid,
        Column::Name,
        Column::Rss,
        Column::Cpu,
        Column::Cwd,
        Column::Ppid,
        Column::Parent,
        Column::Status,
        Column::Command,
        Column::User,
    ];

    /// Key accepted by `--columns`, also the CSV header.
    pub fn key(&self) -> &'static str {
        match self {
            Column::Pid => "pid",
            Column::Name => "name",
            Column::Rss => "rss_mb",
            Column::Cpu => "cpu_percent",
            Column::Cwd => "cwd",
            Column::Ppid => "ppid",
            Column::Parent => "parent_name",
            Column::Status => "status",
            Column::Command => "cmdline",
            Column::User => "username",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            Column::Pid => "PID",
            Column::Name => "Name",
            Column::Rss => "RAM (MB)",
            Column::Cpu => "CPU%",
            Column::Cwd => "CWD",
            Column::Ppid => "PPID",
            Column::Parent => "Parent",
            Column::Status => "Status",
            Column::Command => "Command",
            Column::User => "User",
        }
    }

    fn max_width(&self) -> Option<usize> {
        match self {
            Column::Name => Some(25),
            Column::Cwd => Some(35),
            Column::Parent => Some(20),
            Column::Status => Some(40),
            Column::Command => Some(60),
            Column::User => Some(15),
            Column::Pid | Column::Rss | Column::Cpu | Column::Ppid => None,
        }
    }

    fn clip_side(&self) -> ClipSide {
        match self {
            Column::Cwd => ClipSide::Left,
            _ => ClipSide::Right,
        }
    }

    /// Unclipped cell text. CSV and JSON consumers get full values.
    pub fn value(&self, p: &ProcessRecord) -> String {
        match self {
            Column::Pid => p.pid.to_string(),
            Column::Name => p.name.clone(),
            Column::Rss => format!("{:.1}", p.rss_mb),
            Column::Cpu => format!("{:.1}", p.cpu_percent),
            Column::Cwd => p.cwd.to_string(),
            Column::Ppid => p.ppid.to_string(),
            Column::Parent => p.parent_name.clone(),
            Column::Status => p.display_status(),
            Column::Command => p.cmdline.clone(),
            Column::User => p.username.clone(),
        }
    }

    /// Cell text clipped to the column's width, for tables.
    pub fn display(&self, p: &ProcessRecord) -> String {
        let value = self.value(p);
        match self.max_width() {
            Some(max) => clip(&value, max, self.clip_side()),
            None => value,
        }
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pid" => Ok(Column::Pid),
            "name" => Ok(Column::Name),
            "rss_mb" | "rss" | "ram" | "mem" | "memory" => Ok(Column::Rss),
            "cpu_percent" | "cpu" => Ok(Column::Cpu),
            "cwd" => Ok(Column::Cwd),
            "ppid" => Ok(Column::Ppid),
            "parent_name" | "parent" => Ok(Column::Parent),
            "status" => Ok(Column::Status),
            "cmdline" | "command" | "cmd" => Ok(Column::Command),
            "username" | "user" => Ok(Column::User),
            other => Err(format!(
                "unknown column '{other}' (expected one of: {})",
                Column::ALL
                    .iter()
                    .map(Column::key)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Shortens `text` to `max` characters with a `...` marker on the clipped side.
pub fn clip(text: &str, max: usize, side: ClipSide) -> String {
    let len = text.chars().count();
    if len <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    match side {
        ClipSide::Left => {
            let tail: String = text.chars().skip(len - keep).collect();
            format!("...{tail}")
        }
        ClipSide::Right => {
            let head: String = text.chars().take(keep).collect();
            format!("{head}...")
        }
    }
}
