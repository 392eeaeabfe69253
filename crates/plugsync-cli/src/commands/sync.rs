//! `plugsync sync`

use colored::Colorize;
use plugsync_core::{ArtifactStatus, BatchReport, SyncEngine, SyncOptions};
use plugsync_git::GitClient;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run one update batch and print its report
pub fn run_sync(ctx: &Context, dry_run: bool, json: bool) -> Result<()> {
    let config = ctx.config.clone();
    config.validate()?;

    let credentials = config.credentials(&ctx.secret_store())?;
    let client = GitClient::new(config.git_path.as_deref())
        .with_timeout(config.clone_timeout())
        .with_removal_grace(config.removal_grace());

    let mut engine = SyncEngine::new(config, client).with_credentials(credentials);
    let report = engine.run(&SyncOptions { dry_run })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    let failed = report.failed().len();
    if failed > 0 {
        return Err(CliError::user(format!(
            "{failed} of {} plugins failed to update",
            report.outcomes.len()
        )));
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    if report.dry_run {
        println!("{} Dry run: no plugins will be changed", "=>".blue().bold());
    }

    for outcome in &report.outcomes {
        let line = match &outcome.status {
            ArtifactStatus::Updated { from, to } => {
                format!("{} {}  v{} -> v{}", "+".green(), outcome.name, from, to.green())
            }
            ArtifactStatus::UpdateAvailable { from, to } => format!(
                "{} {}  v{} -> v{} {}",
                "~".yellow(),
                outcome.name,
                from,
                to.yellow(),
                "(available)".dimmed()
            ),
            ArtifactStatus::UpToDate { version } => format!(
                "{} {}  v{} {}",
                "=".dimmed(),
                outcome.name,
                version,
                "(up to date)".dimmed()
            ),
            ArtifactStatus::Skipped { reason } => {
                format!("{} {}  {}", "-".yellow(), outcome.name, reason.dimmed())
            }
            ArtifactStatus::Failed { reason } => {
                format!("{} {}  {}", "x".red().bold(), outcome.name, reason.red())
            }
        };
        println!("  {line}");

        if let Some(aside) = &outcome.renamed_aside {
            println!(
                "      {} previous version kept at {}",
                "!".yellow(),
                aside.display()
            );
        }
    }

    if !report.outcomes.is_empty() {
        println!();
    }
    println!("{}", report.summary().bold());
}
