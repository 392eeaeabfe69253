//! plugsync CLI
//!
//! The command-line interface for updating installed plugins from a git
//! repository.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands, ConfigAction};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!(
            "{} Keep installed plugins up to date",
            "plugsync".green().bold()
        );
        println!();
        println!("Run {} for available commands.", "plugsync --help".cyan());
        return Ok(());
    };

    let ctx = Context::load(cli.config.as_deref(), &cli.overrides)?;
    execute_command(command, ctx)
}

fn execute_command(cmd: Commands, ctx: Context) -> Result<()> {
    match cmd {
        Commands::Scan { json } => commands::run_scan(&ctx, json),
        Commands::Sync { dry_run, json } => commands::run_sync(&ctx, dry_run, json),
        Commands::Doctor => commands::run_doctor(&ctx),
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => commands::run_config_show(&ctx, json),
            ConfigAction::Init { force } => commands::run_config_init(&ctx, force),
            ConfigAction::SetToken { token, username } => {
                commands::run_set_token(ctx, token, username)
            }
        },
    }
}
