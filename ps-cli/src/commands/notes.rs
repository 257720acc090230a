//! Notes commands.

use chrono::{Local, TimeZone};
use clap::Subcommand;
use console::style;

use ps_core::error::PsResult;
use ps_services::screens::notes::NotesScreen;
use ps_services::screens::Alert;
use ps_services::ServiceRegistry;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum NotesAction {
    /// List notes, most recently created first.
    List,
    /// Show a note.
    Show {
        /// Note ID (a unique prefix is enough).
        id: String,
    },
    /// Create a note.
    Add {
        /// Title. Blank titles are stored as "Untitled".
        title: String,
        /// Body text.
        #[arg(default_value = "")]
        content: String,
    },
    /// Edit a note.
    Edit {
        /// Note ID (a unique prefix is enough).
        id: String,
        /// New title.
        #[arg(short, long)]
        title: Option<String>,
        /// New body text.
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note.
    Delete {
        /// Note ID (a unique prefix is enough).
        id: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Resolve a full id from an id or unique prefix.
fn resolve(screen: &NotesScreen, prefix: &str) -> Result<String, Alert> {
    let matches: Vec<&str> = screen
        .notes()
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| id.starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(id.to_string()),
        [] => Err(Alert::new("Error", "Note not found")),
        _ => Err(Alert::new("Error", format!("\"{prefix}\" matches {} notes", matches.len()))),
    }
}

fn date_label(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|t| t.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

pub async fn run(registry: &ServiceRegistry, action: NotesAction, format: OutputFormat) -> PsResult<()> {
    let mut screen = NotesScreen::new(registry.notes.clone());
    if let Err(alert) = screen.load().await {
        return super::show_failure(&alert, format);
    }

    match action {
        NotesAction::List => match format {
            OutputFormat::Json => super::print_json(screen.notes()),
            OutputFormat::Text => {
                if screen.notes().is_empty() {
                    println!("No notes yet.");
                    return Ok(());
                }
                let mut table = super::new_table(vec!["ID", "Title", "Preview", "Updated"]);
                for n in screen.notes() {
                    table.add_row(vec![
                        n.id.chars().take(8).collect::<String>(),
                        n.title.clone(),
                        n.preview(40),
                        date_label(n.updated_at),
                    ]);
                }
                println!("{table}");
                Ok(())
            }
        },
        NotesAction::Show { id } => {
            let selected = resolve(&screen, &id).and_then(|id| screen.select(&id));
            if let Err(alert) = selected {
                return super::show_failure(&alert, format);
            }
            let Some(note) = screen.selected() else {
                return Ok(());
            };
            match format {
                OutputFormat::Json => super::print_json(note),
                OutputFormat::Text => {
                    println!("{}", style(&note.title).bold());
                    println!("{}", style(date_label(note.updated_at)).dim());
                    println!();
                    println!("{}", note.content);
                    Ok(())
                }
            }
        }
        NotesAction::Add { title, content } => {
            screen.create();
            screen.set_title(&title);
            screen.set_content(&content);
            saved(screen.save().await, format)
        }
        NotesAction::Edit { id, title, content } => {
            if let Err(alert) = resolve(&screen, &id).and_then(|id| screen.select(&id)) {
                return super::show_failure(&alert, format);
            }
            screen.edit();
            if let Some(title) = title {
                screen.set_title(&title);
            }
            if let Some(content) = content {
                screen.set_content(&content);
            }
            saved(screen.save().await, format)
        }
        NotesAction::Delete { id, yes } => {
            if let Err(alert) = resolve(&screen, &id).and_then(|id| screen.select(&id)) {
                return super::show_failure(&alert, format);
            }
            if !super::confirm(&NotesScreen::delete_prompt(), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            match screen.delete_selected().await {
                Ok(()) => {
                    if let OutputFormat::Text = format {
                        println!("  {} Note deleted.", style("OK").green().bold());
                    }
                    Ok(())
                }
                Err(alert) => super::show_failure(&alert, format),
            }
        }
    }
}

fn saved(result: Result<ps_services::Note, Alert>, format: OutputFormat) -> PsResult<()> {
    match result {
        Ok(note) => match format {
            OutputFormat::Json => super::print_json(&note),
            OutputFormat::Text => {
                println!("  {} Saved \"{}\" ({})", style("OK").green().bold(), note.title, note.id);
                Ok(())
            }
        },
        Err(alert) => super::show_failure(&alert, format),
    }
}
