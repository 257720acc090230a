//! Contacts screen: list, search and add.

use std::sync::Arc;

use tracing::debug;

use ps_core::constants::app_names;
use ps_models::{Contact, NotificationKind};

use super::{Alert, ScreenResult, ViewGuard};
use crate::store::PhoneStore;

/// Contacts screen state.
pub struct ContactsScreen {
    store: Arc<PhoneStore>,
    guard: ViewGuard,
    contacts: Vec<Contact>,
    query: String,
}

impl ContactsScreen {
    pub fn new(store: Arc<PhoneStore>) -> Self {
        Self {
            store,
            guard: ViewGuard::new(),
            contacts: Vec::new(),
            query: String::new(),
        }
    }

    pub fn guard(&self) -> ViewGuard {
        self.guard.clone()
    }

    pub async fn load(&mut self) -> ScreenResult<()> {
        let contacts = self
            .store
            .get_contacts()
            .await
            .map_err(|e| Alert::from_error("Failed to load contacts", &e))?;
        if self.guard.is_mounted() {
            self.contacts = contacts;
        } else {
            debug!("contacts unmounted, dropping load result");
        }
        Ok(())
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Contacts matching the current search query.
    pub fn filtered(&self) -> Vec<&Contact> {
        self.contacts
            .iter()
            .filter(|c| c.matches_query(&self.query))
            .collect()
    }

    /// Add a contact and post a "Contact Added" notification.
    pub async fn add(&mut self, name: &str, phone: &str) -> ScreenResult<Contact> {
        let (name, phone) = (name.trim(), phone.trim());
        if name.is_empty() || phone.is_empty() {
            return Err(Alert::invalid("Please fill in all fields"));
        }

        let contact = self
            .store
            .add_contact(name, phone, None)
            .await
            .map_err(|e| Alert::from_error("Failed to add contact", &e))?;

        self.store
            .add_notification(
                "Contact Added",
                &format!("{name} has been added to your contacts"),
                app_names::CONTACTS,
                NotificationKind::App,
            )
            .await
            .map_err(|e| Alert::from_error("Failed to add contact", &e))?;

        let at = self
            .contacts
            .partition_point(|c| c.name.as_str() <= contact.name.as_str());
        self.contacts.insert(at, contact.clone());
        self.load().await?;
        Ok(contact)
    }

    fn find(&self, id: i64) -> ScreenResult<&Contact> {
        self.contacts
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Alert::new("Error", "Contact not found"))
    }

    /// Details shown when a contact is pressed.
    pub fn details(&self, id: i64) -> ScreenResult<Alert> {
        let c = self.find(id)?;
        Ok(Alert::new(c.name.clone(), c.phone.clone()))
    }

    pub fn call(&self, id: i64) -> ScreenResult<Alert> {
        let c = self.find(id)?;
        Ok(Alert::new("Calling", format!("Calling {}...", c.name)))
    }

    pub fn message(&self, id: i64) -> ScreenResult<Alert> {
        let c = self.find(id)?;
        Ok(Alert::new("Message", format!("Opening message to {}...", c.name)))
    }
}
