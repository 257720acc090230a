//! Contacts commands.

use clap::Subcommand;
use console::style;

use ps_core::error::PsResult;
use ps_services::screens::contacts::ContactsScreen;
use ps_services::ServiceRegistry;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ContactsAction {
    /// List contacts sorted by name.
    List {
        /// Filter by name (case-insensitive) or phone number.
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a contact.
    Add {
        /// Full name.
        name: String,
        /// Phone number.
        phone: String,
    },
    /// Show a contact's details.
    Show {
        /// Contact ID.
        id: i64,
    },
    /// Call a contact.
    Call {
        /// Contact ID.
        id: i64,
    },
    /// Start a message to a contact.
    Message {
        /// Contact ID.
        id: i64,
    },
}

pub async fn run(registry: &ServiceRegistry, action: ContactsAction, format: OutputFormat) -> PsResult<()> {
    let mut screen = ContactsScreen::new(registry.store.clone());
    if let Err(alert) = screen.load().await {
        return super::show_failure(&alert, format);
    }

    match action {
        ContactsAction::List { search } => {
            if let Some(query) = search {
                screen.set_query(&query);
            }
            let contacts = screen.filtered();
            match format {
                OutputFormat::Json => super::print_json(&contacts),
                OutputFormat::Text => {
                    if contacts.is_empty() {
                        println!("No contacts found.");
                        return Ok(());
                    }
                    let mut table = super::new_table(vec!["ID", "", "Name", "Phone"]);
                    for c in &contacts {
                        table.add_row(vec![
                            c.id.to_string(),
                            style(c.initials()).bold().to_string(),
                            c.name.clone(),
                            c.phone.clone(),
                        ]);
                    }
                    println!("{table}");
                    println!("{} contacts", contacts.len());
                    Ok(())
                }
            }
        }
        ContactsAction::Add { name, phone } => match screen.add(&name, &phone).await {
            Ok(contact) => match format {
                OutputFormat::Json => super::print_json(&contact),
                OutputFormat::Text => {
                    println!(
                        "  {} Added {} ({})",
                        style("OK").green().bold(),
                        contact.name,
                        contact.id
                    );
                    Ok(())
                }
            },
            Err(alert) => super::show_failure(&alert, format),
        },
        ContactsAction::Show { id } => present(screen.details(id), format),
        ContactsAction::Call { id } => present(screen.call(id), format),
        ContactsAction::Message { id } => present(screen.message(id), format),
    }
}

fn present(result: ps_services::ScreenResult<ps_services::Alert>, format: OutputFormat) -> PsResult<()> {
    match result {
        Ok(alert) => super::show_alert(&alert, format),
        Err(alert) => super::show_failure(&alert, format),
    }
}
