//! Property tests for the pure filter, sort and grouping functions.

use backend::{
    filter_by_cwd, filter_high_memory, filter_killable_with, filter_orphans,
    find_similar_processes, sort_processes, Cwd, ExeLookup, ProcError, ProcessRecord, SortKey,
};
use proptest::prelude::*;
use std::path::PathBuf;

struct FixedExe;

impl ExeLookup for FixedExe {
    fn exe_path(&self, pid: i32) -> Result<PathBuf, ProcError> {
        // Every third pid looks like a system binary, the rest are unreadable.
        if pid % 3 == 0 {
            Ok(PathBuf::from("/usr/lib/some-daemon"))
        } else {
            Err(ProcError::PermissionDenied(pid))
        }
    }
}

fn arb_record() -> impl Strategy<Value = ProcessRecord> {
    (
        prop::sample::select(vec!["python", "node", "bash", "Cargo", "rustc", "PipeWire"]),
        prop::sample::select(vec!["", "/usr/bin/python x.py", "node a.js", "/opt/rustc --v"]),
        prop::option::of(prop::sample::select(vec![
            "/home/u/project",
            "/home/u/project-old",
            "/home/u/project/src",
            "/tmp",
        ])),
        0.0f64..2000.0,
        0.0f64..400.0,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(name, cmdline, cwd, rss_mb, cpu_percent, is_orphan, in_tmux)| ProcessRecord {
            name: name.to_string(),
            cmdline: cmdline.to_string(),
            cwd: Cwd::from(cwd.map(String::from)),
            rss_mb,
            cpu_percent,
            is_orphan,
            in_tmux: is_orphan && in_tmux,
            ..Default::default()
        })
}

/// Records with unique pids, as in a real snapshot.
fn arb_snapshot() -> impl Strategy<Value = Vec<ProcessRecord>> {
    prop::collection::vec(arb_record(), 0..40).prop_map(|mut procs| {
        for (i, p) in procs.iter_mut().enumerate() {
            p.pid = 1000 + i as i32;
        }
        procs
    })
}

fn arb_sort_key() -> impl Strategy<Value = SortKey> {
    prop::sample::select(SortKey::ALL.to_vec())
}

fn pids(procs: &[ProcessRecord]) -> Vec<i32> {
    procs.iter().map(|p| p.pid).collect()
}

fn is_subsequence(sub: &[i32], full: &[i32]) -> bool {
    let mut it = full.iter();
    sub.iter().all(|x| it.any(|y| y == x))
}

proptest! {
    #[test]
    fn filters_are_idempotent(procs in arb_snapshot(), threshold in 0.0f64..2000.0) {
        let once = filter_orphans(&procs);
        prop_assert_eq!(filter_orphans(&once), once.clone());

        let once = filter_high_memory(&procs, threshold);
        prop_assert_eq!(filter_high_memory(&once, threshold), once.clone());

        let once = filter_by_cwd(&procs, "/home/u/project");
        prop_assert_eq!(filter_by_cwd(&once, "/home/u/project"), once.clone());

        let once = filter_killable_with(&procs, &FixedExe);
        prop_assert_eq!(filter_killable_with(&once, &FixedExe), once.clone());
    }

    #[test]
    fn filters_preserve_order(procs in arb_snapshot(), threshold in 0.0f64..2000.0) {
        let all = pids(&procs);
        prop_assert!(is_subsequence(&pids(&filter_orphans(&procs)), &all));
        prop_assert!(is_subsequence(&pids(&filter_high_memory(&procs, threshold)), &all));
        prop_assert!(is_subsequence(&pids(&filter_by_cwd(&procs, "/home/*")), &all));
        prop_assert!(is_subsequence(&pids(&filter_killable_with(&procs, &FixedExe)), &all));
    }

    #[test]
    fn killable_is_subset_of_orphans(procs in arb_snapshot()) {
        let orphans = pids(&filter_orphans(&procs));
        for pid in pids(&filter_killable_with(&procs, &FixedExe)) {
            prop_assert!(orphans.contains(&pid));
        }
    }

    #[test]
    fn prefix_never_matches_sibling_directory(procs in arb_snapshot()) {
        for p in filter_by_cwd(&procs, "/home/u/project") {
            prop_assert_ne!(p.cwd.to_string(), "/home/u/project-old");
        }
    }

    #[test]
    fn sorting_is_deterministic(procs in arb_snapshot(), key in arb_sort_key(), reverse in any::<bool>()) {
        let once = sort_processes(&procs, key, reverse);
        prop_assert_eq!(sort_processes(&once, key, reverse), once.clone());
        prop_assert_eq!(sort_processes(&procs, key, reverse), once.clone());
        prop_assert_eq!(once.len(), procs.len());
    }

    #[test]
    fn descending_reversed_is_ascending_without_ties(
        pids_in in prop::collection::hash_set(1i32..100_000, 0..30),
    ) {
        let procs: Vec<ProcessRecord> = pids_in
            .into_iter()
            .map(|pid| ProcessRecord { pid, rss_mb: pid as f64 / 7.0, ..Default::default() })
            .collect();
        for key in [SortKey::Pid, SortKey::Memory] {
            let mut desc = sort_processes(&procs, key, true);
            desc.reverse();
            prop_assert_eq!(desc, sort_processes(&procs, key, false));
        }
    }

    #[test]
    fn groups_have_at_least_two_members(procs in arb_snapshot()) {
        let groups = find_similar_processes(&procs);
        let mut seen = 0;
        for members in groups.values() {
            prop_assert!(members.len() >= 2);
            prop_assert!(is_subsequence(&pids(members), &pids(&procs)));
            seen += members.len();
        }
        prop_assert!(seen <= procs.len());
    }
}
