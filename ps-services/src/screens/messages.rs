//! Messages screen with a simulated correspondent.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use ps_core::config::SimulationConfig;
use ps_core::constants::{app_names, SELF_SENDER};
use ps_core::error::PsResult;
use ps_models::{Message, NotificationKind};

use super::{Alert, ScreenResult, ViewGuard};
use crate::scheduler::ScheduledTask;
use crate::store::PhoneStore;

/// Longest message the compose box accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Canned replies the simulated contact picks from.
pub const CANNED_REPLIES: [&str; 5] = [
    "Thanks for your message!",
    "Got it, will get back to you soon.",
    "Sounds good! 👍",
    "Let me think about that.",
    "Sure thing!",
];

/// Messages screen state.
pub struct MessagesScreen {
    store: Arc<PhoneStore>,
    simulation: SimulationConfig,
    guard: ViewGuard,
    messages: Vec<Message>,
    compose_open: bool,
    draft: String,
    pending_replies: Vec<ScheduledTask>,
}

impl MessagesScreen {
    pub fn new(store: Arc<PhoneStore>, simulation: SimulationConfig) -> Self {
        Self {
            store,
            simulation,
            guard: ViewGuard::new(),
            messages: Vec::new(),
            compose_open: false,
            draft: String::new(),
            pending_replies: Vec::new(),
        }
    }

    pub fn guard(&self) -> ViewGuard {
        self.guard.clone()
    }

    /// Reload the list from the store.
    pub async fn load(&mut self) -> ScreenResult<()> {
        let messages = self
            .store
            .get_messages()
            .await
            .map_err(|e| Alert::from_error("Failed to load messages", &e))?;
        if self.guard.is_mounted() {
            self.messages = messages;
        } else {
            debug!("messages unmounted, dropping load result");
        }
        Ok(())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.is_read).count()
    }

    pub fn is_composing(&self) -> bool {
        self.compose_open
    }

    pub fn toggle_compose(&mut self) {
        self.compose_open = !self.compose_open;
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.chars().take(MAX_MESSAGE_CHARS).collect();
    }

    /// Open a message: mark it read and return its sender and content.
    pub async fn open(&mut self, id: i64) -> ScreenResult<Alert> {
        let Some(message) = self.messages.iter().find(|m| m.id == id).cloned() else {
            return Err(Alert::new("Error", "Message not found"));
        };

        if !message.is_read {
            self.store
                .mark_message_as_read(id)
                .await
                .map_err(|e| Alert::from_error("Failed to mark message as read", &e))?;
            if let Some(m) = self.messages.iter_mut().find(|m| m.id == id) {
                m.is_read = true;
            }
            self.load().await?;
        }

        Ok(Alert::new(message.sender, message.content))
    }

    /// Send the current draft.
    pub async fn send_draft(&mut self) -> ScreenResult<Message> {
        let draft = std::mem::take(&mut self.draft);
        match self.send(&draft).await {
            Ok(msg) => Ok(msg),
            Err(alert) => {
                self.draft = draft;
                Err(alert)
            }
        }
    }

    /// Send `text` as the user and schedule the simulated reply.
    pub async fn send(&mut self, text: &str) -> ScreenResult<Message> {
        let content = text.trim();
        if content.is_empty() {
            return Err(Alert::invalid("Please enter a message"));
        }
        if content.chars().count() > MAX_MESSAGE_CHARS {
            return Err(Alert::invalid(format!(
                "Messages are limited to {MAX_MESSAGE_CHARS} characters"
            )));
        }

        let sent = self
            .store
            .add_message(SELF_SENDER, content)
            .await
            .map_err(|e| Alert::from_error("Failed to send message", &e))?;

        self.messages.insert(0, sent.clone());
        self.draft.clear();
        self.compose_open = false;

        if self.simulation.auto_reply {
            self.schedule_reply();
        }
        self.load().await?;
        Ok(sent)
    }

    fn schedule_reply(&mut self) {
        let reply = CANNED_REPLIES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(CANNED_REPLIES[0]);
        let sender = self.simulation.auto_reply_sender.clone();
        let store = self.store.clone();
        let delay = self.simulation.auto_reply_delay();

        self.pending_replies.retain(|t| !t.is_finished());
        self.pending_replies.push(ScheduledTask::after("messages.auto_reply", delay, async move {
            if let Err(e) = deliver_reply(&store, &sender, reply).await {
                warn!("simulated reply failed: {e}");
            }
        }));
        debug!("simulated reply scheduled in {delay:?}");
    }

    /// Number of simulated replies not yet delivered.
    pub fn pending_replies(&self) -> usize {
        self.pending_replies.iter().filter(|t| !t.is_finished()).count()
    }

    /// Wait for every scheduled reply, then reload the list.
    pub async fn wait_for_replies(&mut self) -> ScreenResult<()> {
        for task in self.pending_replies.drain(..) {
            task.join().await;
        }
        self.load().await
    }
}

async fn deliver_reply(store: &PhoneStore, sender: &str, reply: &str) -> PsResult<()> {
    store.add_message(sender, reply).await?;
    store
        .add_notification(
            "New Message",
            &format!("{sender}: {reply}"),
            app_names::MESSAGES,
            NotificationKind::Message,
        )
        .await?;
    info!("simulated reply from {sender} delivered");
    Ok(())
}
