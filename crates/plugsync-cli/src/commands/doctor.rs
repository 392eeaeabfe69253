//! `plugsync doctor`

use colored::Colorize;
use plugsync_git::GitClient;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Report git location and configuration health
pub fn run_doctor(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let client = GitClient::new(config.git_path.as_deref());
    let mut problems = 0;

    println!("{}", "plugsync doctor".bold());
    println!();

    println!("  {:<14} {}", "Git:".dimmed(), client.tool());
    match client.tool().version() {
        Some(version) => println!("  {:<14} {}", "".dimmed(), version.green()),
        None if client.is_tool_available() => {
            println!("  {:<14} {}", "".dimmed(), "present, version unknown".yellow())
        }
        None => {
            problems += 1;
            println!("  {:<14} {}", "".dimmed(), "not available".red());
        }
    }

    let config_state = if ctx.file_found {
        "found".green()
    } else {
        "not found (defaults used)".yellow()
    };
    println!(
        "  {:<14} {} {}",
        "Config:".dimmed(),
        ctx.path.display(),
        config_state
    );

    if let Err(e) = config.validate() {
        problems += 1;
        println!("  {:<14} {}", "".dimmed(), e.to_string().red());
    }

    match config.remote_identity() {
        Some(identity) => println!("  {:<14} {}", "Repository:".dimmed(), identity),
        None if config.repository.is_empty() => {}
        None => println!(
            "  {:<14} {}",
            "Repository:".dimmed(),
            "not a hosted URL, will be cloned as given".yellow()
        ),
    }

    for root in &config.search_roots {
        let state = if root.is_dir() {
            "ok".green()
        } else {
            "missing".yellow()
        };
        println!(
            "  {:<14} {} {}",
            "Plugin dir:".dimmed(),
            root.display(),
            state
        );
    }

    println!();
    if problems > 0 {
        return Err(CliError::user(format!("{problems} problem(s) found")));
    }
    println!("{} Ready to sync", "OK".green().bold());
    Ok(())
}
