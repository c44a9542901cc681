//! procclean: list, group and clean up the current user's processes.

mod cli;
mod columns;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, Level};

use cli::{Args, Commands, ListArgs, LogLevel, OutputFormat, ViewArgs};
use commands::{command_groups, command_kill, command_list, command_memory};
use config::load_config;

/// Initializes tracing on stderr so command output stays clean on stdout.
fn setup_logging(level: LogLevel) {
    let max_level = match level {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized with level: {:?}", level);
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging(args.log_level);

    let file_config = load_config(args.config.as_deref())?;

    match args.command {
        Some(Commands::List(list)) => command_list(&list, file_config)?,
        Some(Commands::Groups(groups)) => command_groups(&groups, file_config)?,
        Some(Commands::Kill(kill)) => return command_kill(&kill, file_config),
        Some(Commands::Memory(memory)) => command_memory(&memory)?,
        None => {
            let list = ListArgs {
                view: ViewArgs::default(),
                format: OutputFormat::Table,
                columns: None,
                limit: None,
            };
            command_list(&list, file_config)?
        }
    }

    Ok(ExitCode::SUCCESS)
}
