use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmds;

pub use cmds::{InitArgs, PathArgs, PlanArgs, SquashArgs};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct SquashApplication {
    /// Settings file; missing means defaults
    #[arg(long, global = true, env = "SQUASH_CONFIG", default_value = "squash.toml")]
    pub config: PathBuf,

    /// Log level for the squasher crates (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: SquashCommands,
}

#[derive(Subcommand)]
pub enum SquashCommands {
    /// Replay all migrations and write one creation script per table
    Squash(SquashArgs),
    /// Show the resolved table order without writing anything
    Plan(PlanArgs),
    /// Write a squash.toml with the given paths
    Init(InitArgs),
}
