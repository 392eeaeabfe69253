//! `plugsync scan`

use colored::Colorize;
use plugsync_core::{UNKNOWN_VERSION, scan};

use crate::context::Context;
use crate::error::{CliError, Result};

/// List installed plugins matching the configured prefix
pub fn run_scan(ctx: &Context, json: bool) -> Result<()> {
    let config = &ctx.config;
    if config.prefix.trim().is_empty() {
        return Err(CliError::user(
            "No organization prefix set. Pass --prefix or set `prefix` in the configuration.",
        ));
    }
    if config.search_roots.is_empty() {
        return Err(CliError::user(
            "No plugin directories configured. Pass --root or set `search_roots`.",
        ));
    }

    let found = scan(&config.prefix, &config.search_roots);

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    if found.is_empty() {
        println!(
            "{} No plugins found with prefix '{}'",
            "=>".blue().bold(),
            config.prefix
        );
        return Ok(());
    }

    println!("{}", "Installed Plugins".bold());
    println!();
    for artifact in &found {
        let version = artifact.version().unwrap_or(UNKNOWN_VERSION);
        println!(
            "  {} {:<32} {}",
            "+".green(),
            artifact.name,
            format!("v{version}").cyan()
        );
        println!("      {}", artifact.path.display().to_string().dimmed());
    }
    println!();
    println!("Total: {} plugins", found.len());
    Ok(())
}
