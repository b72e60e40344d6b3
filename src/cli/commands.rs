use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gv",
    about = concat!("grove v", env!("CARGO_PKG_VERSION"), " - browse task projects as a tree"),
    version,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Markdown task file to open in the TUI
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (defaults to ./grove.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for the state file and log (defaults to the task file's directory)
    #[arg(long = "state-dir", global = true)]
    pub state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the project tree as indented text
    Print(PrintArgs),
    /// List every project path with task counts
    Paths(PathsArgs),
}

#[derive(Args)]
pub struct PrintArgs {
    /// Markdown task file
    pub file: PathBuf,
    /// Expand every project
    #[arg(long)]
    pub expand_all: bool,
    /// Expand projects shallower than this level, ignoring saved state
    #[arg(long, conflicts_with = "expand_all")]
    pub level: Option<usize>,
}

#[derive(Args)]
pub struct PathsArgs {
    /// Markdown task file
    pub file: PathBuf,
}
