//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// plugsync - Keep installed plugins in step with a git repository
#[derive(Parser, Debug)]
#[command(name = "plugsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file [default: <config dir>/plugsync/config.toml]
    #[arg(long, global = true, env = "PLUGSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Settings that take precedence over the configuration file
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Plugin directory name prefix
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Remote repository URL
    #[arg(long = "repo", global = true)]
    pub repository: Option<String>,

    /// Branch to fetch
    #[arg(long, global = true)]
    pub branch: Option<String>,

    /// Plugin directory to search (repeatable; replaces configured roots)
    #[arg(long = "root", global = true)]
    pub roots: Vec<PathBuf>,

    /// Path to the git executable
    #[arg(long, global = true)]
    pub git_path: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List installed plugins matching the prefix
    Scan {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Update installed plugins whose remote version differs
    ///
    /// Examples:
    ///   plugsync sync                      # Update using the saved config
    ///   plugsync sync --dry-run            # Only report what would change
    ///   plugsync sync --root ./plugins     # Search a specific directory
    Sync {
        /// Compare versions without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Check that git can be found and the configuration is usable
    Doctor,

    /// Inspect or edit the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Write a configuration file from the current settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Store an access token for HTTPS remotes
    SetToken {
        /// Token value; prompted for when omitted
        #[arg(long, env = "PLUGSYNC_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Username to pair with the token
        #[arg(long)]
        username: Option<String>,
    },
}
