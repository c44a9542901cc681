//! List command implementation.

use crate::cli::ListArgs;
use crate::columns::DEFAULT_COLUMNS;
use crate::config::resolve_view;
use crate::output::format_processes;
use anyhow::{Context, Result};
use backend::{list_processes, ViewConfig};
use tracing::debug;

pub fn command_list(args: &ListArgs, file_config: ViewConfig) -> Result<()> {
    let view = resolve_view(file_config, &args.view);
    debug!(?view, "effective view");

    let snapshot = list_processes(&view.snapshot_options()).context("failed to read process table")?;
    let mut procs = view.apply(&snapshot);
    if let Some(limit) = args.limit {
        procs.truncate(limit);
    }

    let columns = args.columns.as_deref().unwrap_or(DEFAULT_COLUMNS);
    println!("{}", format_processes(&procs, columns, args.format)?);
    Ok(())
}
