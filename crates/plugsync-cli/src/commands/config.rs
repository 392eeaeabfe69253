//! Configuration display and editing commands

use colored::Colorize;
use dialoguer::Password;
use plugsync_core::SecretStore;
use plugsync_git::redact;

use crate::context::Context;
use crate::error::{CliError, Result};

const STORED: &str = "(stored)";

/// Display the effective configuration
///
/// The token handle is never printed, only whether one is stored. Userinfo
/// in the repository URL is masked.
pub fn run_config_show(ctx: &Context, json: bool) -> Result<()> {
    let mut shown = ctx.config.clone();
    if shown.token.is_some() {
        shown.token = Some(STORED.to_string());
    }
    shown.repository = redact(&shown.repository, &[]);

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    println!("{}", "plugsync Configuration".bold());
    println!("  {}", ctx.path.display().to_string().dimmed());
    println!();
    print!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}

/// Write the effective configuration to the configuration file
pub fn run_config_init(ctx: &Context, force: bool) -> Result<()> {
    if ctx.file_found && !force {
        return Err(CliError::user(format!(
            "Configuration already exists at {}. Use --force to overwrite.",
            ctx.path.display()
        )));
    }

    ctx.config.save(&ctx.path)?;
    println!(
        "{} Wrote configuration to {}",
        "=>".blue().bold(),
        ctx.path.display()
    );
    if ctx.config.validate().is_err() {
        println!(
            "   Set {} and {} before running {}.",
            "prefix".cyan(),
            "repository".cyan(),
            "plugsync sync".cyan()
        );
    }
    Ok(())
}

/// Seal a token and record its handle in the configuration
pub fn run_set_token(
    mut ctx: Context,
    token: Option<String>,
    username: Option<String>,
) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => Password::new().with_prompt("Access token").interact()?,
    };
    if token.trim().is_empty() {
        return Err(CliError::user("Token must not be empty"));
    }

    let store = ctx.secret_store();
    let handle = store.seal(token.trim())?;
    if let Some(old) = ctx.config.token.replace(handle) {
        if let Err(e) = store.forget(&old) {
            tracing::warn!("Could not remove previous token: {}", e);
        }
    }
    if let Some(username) = username {
        ctx.config.username = Some(username);
    }
    ctx.config.save(&ctx.path)?;

    println!("{} Token stored", "OK".green().bold());
    if ctx.config.username.is_none() {
        println!(
            "   Set a username with {} for the token to be used.",
            "--username".cyan()
        );
    }
    Ok(())
}
