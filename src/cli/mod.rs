use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod handlers;

pub use handlers::dispatch;

/// `hostshift` - announces shifts picked from a Trello list on Discord.
#[derive(Parser, Debug)]
#[command(name = "hostshift")]
#[command(version)]
#[command(about = "Discord bot that announces scheduled shifts picked from a Trello list.", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.hostshift/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Connect to Discord and serve /host-shift until Ctrl-C
    Run,

    /// Register the /host-shift slash command (guild-scoped when guild_id is set)
    Register,

    /// Print the shifts /host-shift would offer right now
    Shifts,
}
