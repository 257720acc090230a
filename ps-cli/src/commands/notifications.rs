//! Notification center commands.

use clap::Subcommand;
use console::style;

use ps_core::error::PsResult;
use ps_models::models::now_millis;
use ps_services::screens::notifications::{kind_icon, NotificationsScreen, PressOutcome};
use ps_services::ServiceRegistry;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum NotificationsAction {
    /// List notifications, newest first.
    List {
        /// Only show unread notifications.
        #[arg(short, long)]
        unread: bool,
    },
    /// Open a notification: mark it read and follow it.
    Open {
        /// Notification ID.
        id: i64,
    },
    /// Mark a notification read.
    Read {
        /// Notification ID.
        id: i64,
    },
    /// Delete a notification.
    Delete {
        /// Notification ID.
        id: i64,
    },
    /// Delete all notifications.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(
    registry: &ServiceRegistry,
    action: NotificationsAction,
    format: OutputFormat,
) -> PsResult<()> {
    let mut screen = NotificationsScreen::new(registry.store.clone());
    if let Err(alert) = screen.load().await {
        return super::show_failure(&alert, format);
    }

    match action {
        NotificationsAction::List { unread } => {
            let list: Vec<_> = screen
                .notifications()
                .iter()
                .filter(|n| !unread || !n.is_read)
                .collect();
            match format {
                OutputFormat::Json => super::print_json(&list),
                OutputFormat::Text => {
                    if list.is_empty() {
                        println!("{}", style("No Notifications").bold());
                        println!("You're all caught up! Notifications will appear here.");
                        return Ok(());
                    }
                    if let Some(label) = screen.unread_label() {
                        println!("{}", style(label).cyan());
                    }
                    let now = now_millis();
                    let mut table = super::new_table(vec!["", "ID", "App", "Title", "Body", "Time"]);
                    for n in &list {
                        table.add_row(vec![
                            super::unread_mark(n.is_read),
                            n.id.to_string(),
                            format!("{} {}", kind_icon(n.kind), n.app_name),
                            n.title.clone(),
                            super::truncate(&n.body, 40),
                            NotificationsScreen::time_label(n, now),
                        ]);
                    }
                    println!("{table}");
                    Ok(())
                }
            }
        }
        NotificationsAction::Open { id } => match screen.press(id).await {
            Ok(PressOutcome::Navigate(route)) => match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({ "route": route.as_str() })),
                OutputFormat::Text => {
                    println!(
                        "Opening {}. Run `phonesim {}` to continue.",
                        style(format!("/{route}")).bold(),
                        route.as_str()
                    );
                    Ok(())
                }
            },
            Ok(PressOutcome::Show(alert)) => super::show_alert(&alert, format),
            Err(alert) => super::show_failure(&alert, format),
        },
        NotificationsAction::Read { id } => match screen.mark_read(id).await {
            Ok(()) => {
                if let OutputFormat::Text = format {
                    println!("  {} Marked as read.", style("OK").green().bold());
                }
                Ok(())
            }
            Err(alert) => super::show_failure(&alert, format),
        },
        NotificationsAction::Delete { id } => match screen.delete(id).await {
            Ok(removed) => match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({ "deleted": removed })),
                OutputFormat::Text => {
                    if removed {
                        println!("  {} Notification deleted.", style("OK").green().bold());
                    } else {
                        println!("  {} No notification with id {id}.", style("WARN").yellow().bold());
                    }
                    Ok(())
                }
            },
            Err(alert) => super::show_failure(&alert, format),
        },
        NotificationsAction::Clear { yes } => {
            if !super::confirm(&NotificationsScreen::clear_all_prompt(), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            match screen.clear_all().await {
                Ok(removed) => match format {
                    OutputFormat::Json => super::print_json(&serde_json::json!({ "removed": removed })),
                    OutputFormat::Text => {
                        println!("  {} Cleared {removed} notifications.", style("OK").green().bold());
                        Ok(())
                    }
                },
                Err(alert) => super::show_failure(&alert, format),
            }
        }
    }
}
