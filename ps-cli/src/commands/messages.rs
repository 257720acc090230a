//! Messages commands.

use clap::Subcommand;
use console::style;

use ps_core::error::PsResult;
use ps_models::models::now_millis;
use ps_services::format::message_time;
use ps_services::screens::messages::MessagesScreen;
use ps_services::ServiceRegistry;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum MessagesAction {
    /// List messages, newest first.
    List {
        /// Only show unread messages.
        #[arg(short, long)]
        unread: bool,
    },
    /// Open a message and mark it read.
    Open {
        /// Message ID.
        id: i64,
    },
    /// Send a message.
    Send {
        /// Message text.
        text: String,
        /// Do not wait for the simulated reply.
        #[arg(long)]
        no_reply: bool,
    },
}

pub async fn run(registry: &ServiceRegistry, action: MessagesAction, format: OutputFormat) -> PsResult<()> {
    let cfg = registry.config.snapshot().await;
    let mut simulation = cfg.simulation.clone();
    if matches!(action, MessagesAction::Send { no_reply: true, .. }) {
        simulation.auto_reply = false;
    }

    let mut screen = MessagesScreen::new(registry.store.clone(), simulation);
    if let Err(alert) = screen.load().await {
        return super::show_failure(&alert, format);
    }

    match action {
        MessagesAction::List { unread } => {
            let messages: Vec<_> = screen
                .messages()
                .iter()
                .filter(|m| !unread || !m.is_read)
                .collect();
            match format {
                OutputFormat::Json => super::print_json(&messages),
                OutputFormat::Text => {
                    if messages.is_empty() {
                        println!("No messages.");
                        return Ok(());
                    }
                    let now = now_millis();
                    let mut table = super::new_table(vec!["", "ID", "From", "Message", "Time"]);
                    for m in &messages {
                        table.add_row(vec![
                            super::unread_mark(m.is_read),
                            m.id.to_string(),
                            m.sender.clone(),
                            super::truncate(&m.content, 50),
                            message_time(m.timestamp, now, cfg.display.use_24hr_format),
                        ]);
                    }
                    println!("{table}");
                    println!(
                        "{} messages, {} unread",
                        messages.len(),
                        style(screen.unread_count()).cyan()
                    );
                    Ok(())
                }
            }
        }
        MessagesAction::Open { id } => match screen.open(id).await {
            Ok(alert) => super::show_alert(&alert, format),
            Err(alert) => super::show_failure(&alert, format),
        },
        MessagesAction::Send { text, .. } => {
            let sent = match screen.send(&text).await {
                Ok(sent) => sent,
                Err(alert) => return super::show_failure(&alert, format),
            };
            if let OutputFormat::Text = format {
                println!("  {} Sent: {}", style("OK").green().bold(), sent.content);
            }

            if screen.pending_replies() > 0 {
                if let OutputFormat::Text = format {
                    println!("  {}", style("typing...").dim());
                }
                if let Err(alert) = screen.wait_for_replies().await {
                    return super::show_failure(&alert, format);
                }
            }

            let reply = screen.messages().first().filter(|m| m.id != sent.id).cloned();
            match format {
                OutputFormat::Json => super::print_json(&serde_json::json!({
                    "sent": sent,
                    "reply": reply,
                })),
                OutputFormat::Text => {
                    if let Some(reply) = reply {
                        println!("  {} {}", style(format!("{}:", reply.sender)).bold(), reply.content);
                    }
                    Ok(())
                }
            }
        }
    }
}
