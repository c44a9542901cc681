//! Grouping of processes that run the same executable.

use crate::types::ProcessRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Executable basename taken from the first cmdline token, or from `name`
/// when the cmdline is empty.
pub fn group_key(proc: &ProcessRecord) -> String {
    let token = proc
        .cmdline
        .split_whitespace()
        .next()
        .unwrap_or(proc.name.as_str());
    match token.rsplit('/').next() {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => proc.name.clone(),
    }
}

/// Groups processes by [`group_key`], keeping only groups of two or more.
/// Members stay in input order.
pub fn find_similar_processes(procs: &[ProcessRecord]) -> BTreeMap<String, Vec<ProcessRecord>> {
    let mut groups: BTreeMap<String, Vec<ProcessRecord>> = BTreeMap::new();
    for proc in procs {
        groups.entry(group_key(proc)).or_default().push(proc.clone());
    }
    groups.retain(|_, members| members.len() >= 2);
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub count: usize,
    pub total_rss_mb: f64,
    pub pids: Vec<i32>,
}

/// One summary per group, heaviest first.
pub fn summarize_groups(groups: &BTreeMap<String, Vec<ProcessRecord>>) -> Vec<GroupSummary> {
    let mut summaries: Vec<GroupSummary> = groups
        .iter()
        .map(|(key, members)| GroupSummary {
            key: key.clone(),
            count: members.len(),
            total_rss_mb: members.iter().map(|p| p.rss_mb).sum(),
            pids: members.iter().map(|p| p.pid).collect(),
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.total_rss_mb
            .total_cmp(&a.total_rss_mb)
            .then_with(|| a.key.cmp(&b.key))
    });
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(pid: i32, name: &str, cmdline: &str, rss_mb: f64) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
            cmdline: cmdline.to_string(),
            rss_mb,
            ..Default::default()
        }
    }

    #[test]
    fn paths_normalize_to_basename() {
        assert_eq!(group_key(&cmd(1, "python3", "/usr/bin/python script.py", 0.0)), "python");
        assert_eq!(
            group_key(&cmd(2, "python3", "/home/u/.venv/bin/python other.py", 0.0)),
            "python"
        );
        assert_eq!(group_key(&cmd(3, "sleep", "", 0.0)), "sleep");
        assert_eq!(group_key(&cmd(4, "weird", "/opt/tool/ --x", 0.0)), "weird");
    }

    #[test]
    fn singletons_are_dropped() {
        let procs = vec![
            cmd(1, "python", "python script.py", 10.0),
            cmd(2, "python", "python other.py", 20.0),
            cmd(3, "node", "node server.js", 30.0),
        ];
        let groups = find_similar_processes(&procs);
        assert_eq!(groups.len(), 1);
        let members: Vec<i32> = groups["python"].iter().map(|p| p.pid).collect();
        assert_eq!(members, vec![1, 2]);
        assert!(!groups.contains_key("node"));
    }

    #[test]
    fn summaries_are_heaviest_first() {
        let procs = vec![
            cmd(1, "a", "a", 1.0),
            cmd(2, "a", "a", 1.0),
            cmd(3, "b", "b", 5.0),
            cmd(4, "b", "/opt/b --flag", 5.0),
        ];
        let summaries = summarize_groups(&find_similar_processes(&procs));
        assert_eq!(summaries[0].key, "b");
        assert_eq!(summaries[0].pids, vec![3, 4]);
        assert_eq!(summaries[1].total_rss_mb, 2.0);
    }
}
