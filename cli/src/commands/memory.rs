//! Memory command implementation.

use crate::cli::{MemoryArgs, OutputFormat};
use crate::output::{format_memory, to_json};
use anyhow::{Context, Result};
use backend::get_memory_summary;

pub fn command_memory(args: &MemoryArgs) -> Result<()> {
    let summary = get_memory_summary().context("failed to read /proc/meminfo")?;
    match args.format {
        OutputFormat::Json => println!("{}", to_json(&summary)?),
        format => println!("{}", format_memory(&summary, format)?),
    }
    Ok(())
}
