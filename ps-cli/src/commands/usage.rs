//! App usage commands.

use clap::Subcommand;
use console::style;

use ps_core::error::PsResult;
use ps_models::models::now_millis;
use ps_services::format::relative_time;
use ps_services::ServiceRegistry;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum UsageAction {
    /// List usage per app, most recently used first.
    List,
    /// Record usage for an app.
    Record {
        /// App name.
        app: String,
        /// Time spent, in seconds.
        seconds: i64,
    },
}

fn duration_label(ms: i64) -> String {
    let secs = ms / 1_000;
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3_600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3_600, (secs % 3_600) / 60)
    }
}

pub async fn run(registry: &ServiceRegistry, action: UsageAction, format: OutputFormat) -> PsResult<()> {
    match action {
        UsageAction::List => {
            let usage = registry.store.get_app_usage().await?;
            match format {
                OutputFormat::Json => super::print_json(&usage),
                OutputFormat::Text => {
                    if usage.is_empty() {
                        println!("No usage recorded yet.");
                        return Ok(());
                    }
                    let now = now_millis();
                    let mut table = super::new_table(vec!["App", "Last session", "Last used"]);
                    for u in &usage {
                        table.add_row(vec![
                            u.app_name.clone(),
                            duration_label(u.usage_time),
                            relative_time(u.last_used, now),
                        ]);
                    }
                    println!("{table}");
                    Ok(())
                }
            }
        }
        UsageAction::Record { app, seconds } => {
            registry
                .store
                .update_app_usage(&app, seconds.saturating_mul(1_000))
                .await?;
            if let OutputFormat::Text = format {
                println!("  {} Recorded {seconds}s for {app}.", style("OK").green().bold());
            }
            Ok(())
        }
    }
}
