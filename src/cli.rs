use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::fields::FilterChoice;

/// In-memory task manager for the terminal.
/// Runs the numbered menu unless another interface is requested.
#[derive(Parser)]
#[command(name = "taskdeck", version, about = "Console task manager")]
pub struct Cli {
    /// Never clear the screen between menu pages.
    #[arg(long, global = true)]
    pub plain: bool,

    /// Start with a handful of sample tasks.
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Interactive numbered menu (default)
    Menu,
    /// Full-screen task board
    Ui {
        /// View to open the board with.
        #[arg(long, value_enum, default_value_t = FilterChoice::All)]
        filter: FilterChoice,
    },
    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
