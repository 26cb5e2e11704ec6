//! # Taskdeck - console task manager
//!
//! An in-memory task manager for the terminal with two front ends: a numbered line menu
//! that works over any stdin/stdout, and a full-screen board built on ratatui.
//!
//! ## Task kinds
//!
//! - **Basic**: carries a difficulty; priority follows difficulty and state
//! - **Deadline**: carries a due time and an assigned priority; computed priority rises as the
//!   due time approaches
//! - **Recurring**: repeats every N days; priority rises as the next run comes due
//!
//! ## Quick Start
//!
//! ```bash
//! # Numbered menu (the default)
//! taskdeck
//!
//! # Full-screen board with some sample tasks
//! taskdeck --demo ui
//!
//! # Menu without screen clearing, e.g. when piping a script in
//! taskdeck --plain menu < script.txt
//! ```
//!
//! Nothing is persisted; the collection lives for the lifetime of the process.
//! The menu can export a JSON snapshot to stdout. Set `RUST_LOG=debug` to trace operations on stderr.

use clap::Parser;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

pub mod cli;
pub mod cmd;
pub mod console;
pub mod dates;
pub mod error;
pub mod fields;
pub mod filter;
pub mod manager;
pub mod menu;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::{Cli, Commands};
use cmd::*;
use manager::TaskManager;

/// Log filter from `RUST_LOG`-style directives, `warn` when none are given.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

fn init_logging() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut manager = TaskManager::new();
    if cli.demo {
        seed_demo(&mut manager)?;
    }

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => cmd_menu(&mut manager, cli.plain),
        Commands::Ui { filter } => cmd_ui(&mut manager, filter),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
