//! Groups command implementation.

use crate::cli::{GroupsArgs, OutputFormat};
use crate::output::{format_groups, to_json};
use anyhow::{Context, Result};
use backend::{find_similar_processes, list_processes, summarize_groups, ViewConfig};

pub fn command_groups(args: &GroupsArgs, mut config: ViewConfig) -> Result<()> {
    if let Some(min_memory) = args.min_memory {
        config.min_memory_mb = min_memory;
    }
    if let Some(user) = &args.user {
        config.user = Some(user.clone());
    }

    let snapshot = list_processes(&config.snapshot_options()).context("failed to read process table")?;
    let groups = find_similar_processes(&snapshot);

    match args.format {
        OutputFormat::Json => println!("{}", to_json(&groups)?),
        format => println!("{}", format_groups(&summarize_groups(&groups), format)?),
    }
    Ok(())
}
