//! Database management commands.

use clap::Subcommand;
use console::style;

use ps_core::error::PsResult;
use ps_services::screens::Alert;
use ps_services::ServiceRegistry;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum DbAction {
    /// Show row counts per table.
    Stats,
    /// Run an integrity check.
    Check,
    /// Drop every table and restore the sample data (WARNING: destroys all data).
    Reset {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the database and notes paths.
    Path,
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

pub async fn run(registry: &ServiceRegistry, action: DbAction, format: OutputFormat) -> PsResult<()> {
    let db_path = registry.store.path().to_path_buf();

    match action {
        DbAction::Stats => {
            let stats = registry.store.stats().await?;
            let file_size = std::fs::metadata(&db_path).ok().map(|m| m.len());
            let wal_size = std::fs::metadata(db_path.with_extension("db-wal")).ok().map(|m| m.len());

            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({
                    "path": db_path.display().to_string(),
                    "tables": stats,
                    "file_size_bytes": file_size,
                    "wal_size_bytes": wal_size,
                })),
                OutputFormat::Text => {
                    println!("{}", style("Database Statistics").bold().underlined());
                    println!("  Path:          {}", db_path.display());
                    println!();

                    let mut table = super::new_table(vec!["Table", "Row Count"]);
                    table.add_row(vec!["messages".to_string(), stats.messages.to_string()]);
                    table.add_row(vec!["contacts".to_string(), stats.contacts.to_string()]);
                    table.add_row(vec!["settings".to_string(), stats.settings.to_string()]);
                    table.add_row(vec!["notifications".to_string(), stats.notifications.to_string()]);
                    table.add_row(vec!["app_usage".to_string(), stats.app_usage.to_string()]);
                    println!("{table}");

                    println!();
                    println!("{}", style("Storage").bold().underlined());
                    if let Some(size) = file_size {
                        println!("  Database:      {}", format_bytes(size));
                    }
                    if let Some(size) = wal_size {
                        println!("  WAL file:      {}", format_bytes(size));
                    }
                    Ok(())
                }
            }
        }
        DbAction::Check => {
            println!("  {} Running integrity check...", style("...").dim());
            match registry.store.integrity_check().await {
                Ok(()) => println!("  {} Integrity check passed.", style("OK").green().bold()),
                Err(e) => println!("  {} Integrity check failed: {e}", style("FAIL").red().bold()),
            }

            let mut table = super::new_table(vec!["Service", "State", "Healthy"]);
            for (name, state, healthy) in registry.health_check() {
                let mark = if healthy { style("yes").green() } else { style("no").red() };
                table.add_row(vec![name, state.to_string(), mark.to_string()]);
            }
            println!();
            println!("{table}");
            Ok(())
        }
        DbAction::Reset { yes } => {
            let prompt = Alert::new(
                "Reset Database",
                "This drops every table and restores the sample data. Continue?",
            );
            if !super::confirm(&prompt, yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            let report = registry.store.reset().await?;
            registry.notes.clear().await?;
            match format {
                OutputFormat::Json => super::print_json(&report),
                OutputFormat::Text => {
                    println!("  {} Database reset.", style("OK").green().bold());
                    println!(
                        "  Restored {} contacts, {} messages, {} settings, {} notifications.",
                        report.contacts, report.messages, report.settings, report.notifications
                    );
                    Ok(())
                }
            }
        }
        DbAction::Path => {
            let notes_dir = registry.config.read().await.effective_notes_dir()?;
            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({
                    "database": db_path.display().to_string(),
                    "notes": notes_dir.display().to_string(),
                })),
                OutputFormat::Text => {
                    println!("Database: {}", db_path.display());
                    println!("Notes:    {}", notes_dir.display());
                    Ok(())
                }
            }
        }
    }
}
