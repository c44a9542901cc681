//! Kill command implementation.
//!
//! Targets are either explicit pids or the result of the view filters. Without
//! `--yes`, an interactive terminal is asked for confirmation first.

use crate::cli::{KillArgs, OutputFormat};
use crate::columns::{Column, DEFAULT_COLUMNS};
use crate::config::resolve_view;
use crate::output::{format_kill_results, format_processes, to_json};
use anyhow::{bail, Context, Result};
use backend::{
    kill_processes, list_processes, KillSummary, ProcessRecord, SnapshotOptions,
    ViewConfig, PREVIEW_LIMIT,
};
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use tracing::info;

/// Pids to signal, in order, plus whatever the snapshot knows about them.
struct Targets {
    pids: Vec<i32>,
    known: Vec<ProcessRecord>,
}

pub fn command_kill(args: &KillArgs, file_config: ViewConfig) -> Result<ExitCode> {
    let view = resolve_view(file_config, &args.view);
    let targets = select_targets(args, &view)?;

    if targets.pids.is_empty() {
        println!("No processes to kill.");
        return Ok(ExitCode::SUCCESS);
    }

    if args.preview {
        let columns = args.columns.as_deref().unwrap_or(DEFAULT_COLUMNS);
        print_preview(&targets, args.output, columns)?;
        return Ok(ExitCode::SUCCESS);
    }

    if !args.yes && io::stdin().is_terminal() && !confirm(&targets, args.force)? {
        println!("Aborted.");
        return Ok(ExitCode::FAILURE);
    }

    let results = kill_processes(&targets.pids, args.force);
    println!("{}", format_kill_results(&results));

    let summary = KillSummary::from_results(&results);
    info!(succeeded = summary.succeeded, failed = summary.failed, "kill finished");
    println!(
        "\nKilled {} of {} processes",
        summary.succeeded,
        results.len()
    );

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn select_targets(args: &KillArgs, view: &ViewConfig) -> Result<Targets> {
    if !args.pids.is_empty() {
        let pids = dedup_preserving_order(&args.pids);
        let snapshot = list_processes(&SnapshotOptions {
            user: view.user.clone(),
            min_memory_mb: 0.0,
        })
        .context("failed to read process table")?;
        let known = pids
            .iter()
            .filter_map(|pid| snapshot.iter().find(|p| p.pid == *pid).cloned())
            .collect();
        return Ok(Targets { pids, known });
    }

    if view.selects_everything() {
        bail!("refusing to target every process: pass pids, a filter preset or --cwd");
    }

    let snapshot = list_processes(&view.snapshot_options()).context("failed to read process table")?;
    let mut known = view.apply(&snapshot);
    if let Some(limit) = args.limit {
        known.truncate(limit);
    }
    let pids = known.iter().map(|p| p.pid).collect();
    Ok(Targets { pids, known })
}

fn dedup_preserving_order(pids: &[i32]) -> Vec<i32> {
    let mut seen = std::collections::HashSet::new();
    pids.iter().copied().filter(|pid| seen.insert(*pid)).collect()
}

fn total_rss(procs: &[ProcessRecord]) -> f64 {
    procs.iter().map(|p| p.rss_mb).sum()
}

fn print_preview(targets: &Targets, format: OutputFormat, columns: &[Column]) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(&targets.known)?),
        OutputFormat::Csv => print!("{}", format_processes(&targets.known, columns, format)?),
        OutputFormat::Table | OutputFormat::Markdown => {
            println!("Would kill {} process(es):\n", targets.pids.len());
            let shown: Vec<ProcessRecord> =
                targets.known.iter().take(PREVIEW_LIMIT).cloned().collect();
            println!("{}", format_processes(&shown, columns, format)?);
            if targets.pids.len() > shown.len() {
                println!("\n... and {} more", targets.pids.len() - shown.len());
            }
            println!("\nWould free ~{:.1} MB", total_rss(&targets.known));
        }
    }
    Ok(())
}

fn confirmation_text(targets: &Targets, force: bool) -> String {
    let action = if force { "FORCE KILL" } else { "Terminate" };
    let mut lines = vec![format!(
        "{} {} process(es)? Will free ~{:.1} MB",
        action,
        targets.pids.len(),
        total_rss(&targets.known)
    )];
    for p in targets.known.iter().take(PREVIEW_LIMIT) {
        lines.push(format!("  PID {} - {} ({:.1} MB)", p.pid, p.name, p.rss_mb));
    }
    let listed = targets.known.len().min(PREVIEW_LIMIT);
    if targets.pids.len() > listed {
        lines.push(format!("  ... and {} more", targets.pids.len() - listed));
    }
    lines.join("\n")
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn confirm(targets: &Targets, force: bool) -> Result<bool> {
    println!("{}", confirmation_text(targets, force));
    print!("\nContinue? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(n: usize) -> Targets {
        let known: Vec<ProcessRecord> = (0..n)
            .map(|i| ProcessRecord {
                pid: 100 + i as i32,
                name: format!("worker{i}"),
                rss_mb: 10.0,
                ..Default::default()
            })
            .collect();
        Targets {
            pids: known.iter().map(|p| p.pid).collect(),
            known,
        }
    }

    fn kill_args(pids: Vec<i32>) -> KillArgs {
        KillArgs {
            pids,
            force: false,
            yes: true,
            preview: false,
            view: Default::default(),
            output: OutputFormat::Table,
            columns: None,
            limit: None,
        }
    }

    #[test]
    fn blank_cwd_does_not_unlock_killing_everything() {
        for blank in ["", "   "] {
            let view = ViewConfig {
                cwd: Some(blank.to_string()),
                ..Default::default()
            };
            let err = select_targets(&kill_args(Vec::new()), &view)
                .err()
                .expect("refused");
            assert!(err.to_string().contains("refusing to target every process"));
        }
    }

    #[test]
    fn answers() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("no"));
    }

    #[test]
    fn duplicate_pids_are_signalled_once() {
        assert_eq!(dedup_preserving_order(&[5, 3, 5, 9, 3]), vec![5, 3, 9]);
    }

    #[test]
    fn confirmation_lists_a_bounded_preview() {
        let text = confirmation_text(&targets(8), true);
        assert!(text.starts_with("FORCE KILL 8 process(es)? Will free ~80.0 MB"));
        assert_eq!(text.matches("  PID ").count(), PREVIEW_LIMIT);
        assert!(text.ends_with("... and 3 more"));
    }

    #[test]
    fn unknown_pids_are_counted() {
        let mut t = targets(1);
        t.pids.push(999_999_999);
        let text = confirmation_text(&t, false);
        assert!(text.starts_with("Terminate 2 process(es)?"));
        assert!(text.ends_with("... and 1 more"));
    }
}
