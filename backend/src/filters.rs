//! Order-preserving filters over a process snapshot.

use crate::classify::{is_killable, ExeLookup, ProcfsExeLookup};
use crate::types::ProcessRecord;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const GLOB_META: &[char] = &['*', '?', '['];

/// Named filter presets shared by the CLI and the GUI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    #[default]
    None,
    Orphans,
    HighMemory,
    Killable,
    Stale,
}

impl FilterKind {
    pub const ALL: [FilterKind; 5] = [
        FilterKind::None,
        FilterKind::Orphans,
        FilterKind::HighMemory,
        FilterKind::Killable,
        FilterKind::Stale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Orphans => "orphans",
            FilterKind::HighMemory => "high-memory",
            FilterKind::Killable => "killable",
            FilterKind::Stale => "stale",
        }
    }

    /// Runs the preset. `high_memory_threshold_mb` is only read by `HighMemory`.
    pub fn apply(&self, procs: &[ProcessRecord], high_memory_threshold_mb: f64) -> Vec<ProcessRecord> {
        match self {
            FilterKind::None => procs.to_vec(),
            FilterKind::Orphans => filter_orphans(procs),
            FilterKind::HighMemory => filter_high_memory(procs, high_memory_threshold_mb),
            FilterKind::Killable => filter_killable(procs),
            FilterKind::Stale => filter_stale(procs),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "all" => Ok(FilterKind::None),
            "orphans" | "orphan" => Ok(FilterKind::Orphans),
            "high-memory" | "high_memory" | "highmem" => Ok(FilterKind::HighMemory),
            "killable" => Ok(FilterKind::Killable),
            "stale" => Ok(FilterKind::Stale),
            other => Err(format!(
                "unknown filter '{other}' (expected none, orphans, high-memory, killable, stale)"
            )),
        }
    }
}

/// Processes re-parented to init.
pub fn filter_orphans(procs: &[ProcessRecord]) -> Vec<ProcessRecord> {
    procs.iter().filter(|p| p.is_orphan).cloned().collect()
}

/// Processes with RSS strictly above `threshold_mb`.
pub fn filter_high_memory(procs: &[ProcessRecord], threshold_mb: f64) -> Vec<ProcessRecord> {
    procs
        .iter()
        .filter(|p| p.rss_mb > threshold_mb)
        .cloned()
        .collect()
}

/// Orphans outside tmux that are not system services.
pub fn filter_killable(procs: &[ProcessRecord]) -> Vec<ProcessRecord> {
    filter_killable_with(procs, &ProcfsExeLookup)
}

pub fn filter_killable_with(procs: &[ProcessRecord], lookup: &impl ExeLookup) -> Vec<ProcessRecord> {
    procs
        .iter()
        .filter(|p| is_killable(p, lookup))
        .cloned()
        .collect()
}

/// Processes whose executable was deleted after they started.
pub fn filter_stale(procs: &[ProcessRecord]) -> Vec<ProcessRecord> {
    procs.iter().filter(|p| p.exe_deleted).cloned().collect()
}

/// Processes whose working directory matches `pattern`.
///
/// Patterns containing `*`, `?` or `[` are shell globs over the whole path.
/// Anything else is a directory prefix: `/a/b` matches `/a/b` and `/a/b/c`,
/// never `/a/bc`. Processes with an unknown cwd never match.
pub fn filter_by_cwd(procs: &[ProcessRecord], pattern: &str) -> Vec<ProcessRecord> {
    let matcher = CwdMatcher::new(pattern);
    procs
        .iter()
        .filter(|p| p.cwd.as_path().is_some_and(|cwd| matcher.matches(cwd)))
        .cloned()
        .collect()
}

/// Checks a cwd pattern before it reaches [`filter_by_cwd`]. Only patterns
/// with glob metacharacters can be malformed.
pub fn validate_cwd_pattern(pattern: &str) -> Result<(), String> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err("cwd pattern must not be empty".to_string());
    }
    if pattern.contains(GLOB_META) {
        Pattern::new(pattern).map_err(|e| format!("invalid glob '{pattern}': {e}"))?;
    }
    Ok(())
}

enum CwdMatcher {
    Glob(Pattern),
    Prefix(String),
}

impl CwdMatcher {
    fn new(pattern: &str) -> Self {
        let pattern = pattern.trim();
        if pattern.contains(GLOB_META) {
            match Pattern::new(pattern) {
                Ok(glob) => return CwdMatcher::Glob(glob),
                Err(e) => debug!(pattern, error = %e, "invalid cwd glob, using prefix match"),
            }
        }
        CwdMatcher::Prefix(pattern.trim_end_matches('/').to_string())
    }

    fn matches(&self, cwd: &str) -> bool {
        match self {
            CwdMatcher::Glob(glob) => glob.matches(cwd),
            CwdMatcher::Prefix(prefix) => {
                cwd == prefix
                    || cwd
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cwd;

    fn at(pid: i32, cwd: Option<&str>) -> ProcessRecord {
        ProcessRecord {
            pid,
            cwd: Cwd::from(cwd.map(String::from)),
            ..Default::default()
        }
    }

    fn pids(procs: &[ProcessRecord]) -> Vec<i32> {
        procs.iter().map(|p| p.pid).collect()
    }

    #[test]
    fn prefix_match_respects_directory_boundary() {
        let procs = vec![
            at(1, Some("/home/user/project")),
            at(2, Some("/home/user/project-old")),
            at(3, Some("/home/user/project/sub")),
            at(4, None),
        ];
        assert_eq!(pids(&filter_by_cwd(&procs, "/home/user/project")), vec![1, 3]);
        assert_eq!(pids(&filter_by_cwd(&procs, "/home/user/project/")), vec![1, 3]);
    }

    #[test]
    fn glob_question_mark_is_one_char() {
        let procs = vec![
            at(1, Some("/tmp/a")),
            at(2, Some("/tmp/b")),
            at(3, Some("/tmp/ab")),
        ];
        assert_eq!(pids(&filter_by_cwd(&procs, "/tmp/?")), vec![1, 2]);
        assert_eq!(pids(&filter_by_cwd(&procs, "/tmp/*")), vec![1, 2, 3]);
        assert_eq!(pids(&filter_by_cwd(&procs, "/tmp/[a]")), vec![1]);
    }

    #[test]
    fn unknown_cwd_never_matches_glob() {
        let procs = vec![at(1, None), at(2, Some("?"))];
        assert!(filter_by_cwd(&procs, "*").is_empty());
    }

    #[test]
    fn invalid_glob_falls_back_to_prefix() {
        let procs = vec![at(1, Some("/srv/[x")), at(2, Some("/srv/[x/y")), at(3, Some("/srv"))];
        assert_eq!(pids(&filter_by_cwd(&procs, "/srv/[x")), vec![1, 2]);
    }

    #[test]
    fn pattern_validation() {
        assert!(validate_cwd_pattern("/tmp/?").is_ok());
        assert!(validate_cwd_pattern("/home/user/project").is_ok());
        assert!(validate_cwd_pattern("/tmp/[a").is_err());
        assert!(validate_cwd_pattern("  ").is_err());
    }

    #[test]
    fn high_memory_is_strict() {
        let procs: Vec<_> = [499.0, 500.0, 500.5]
            .iter()
            .enumerate()
            .map(|(i, &rss_mb)| ProcessRecord {
                pid: i as i32,
                rss_mb,
                ..Default::default()
            })
            .collect();
        assert_eq!(pids(&filter_high_memory(&procs, 500.0)), vec![2]);
    }

    #[test]
    fn filter_kind_parses_and_rejects() {
        assert_eq!("high-memory".parse::<FilterKind>(), Ok(FilterKind::HighMemory));
        assert_eq!("ALL".parse::<FilterKind>(), Ok(FilterKind::None));
        assert!("everything".parse::<FilterKind>().is_err());
        for kind in FilterKind::ALL {
            assert_eq!(kind.as_str().parse::<FilterKind>(), Ok(kind));
        }
    }

    #[test]
    fn stale_keeps_deleted_executables() {
        let procs = vec![
            ProcessRecord {
                pid: 1,
                exe_deleted: true,
                ..Default::default()
            },
            ProcessRecord {
                pid: 2,
                ..Default::default()
            },
        ];
        assert_eq!(pids(&FilterKind::Stale.apply(&procs, 0.0)), vec![1]);
    }
}
