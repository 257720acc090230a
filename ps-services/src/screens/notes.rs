//! Notes screen backed by the blob store.

use std::sync::Arc;

use tracing::debug;

use ps_models::models::now_millis;

use super::{Alert, ScreenResult, ViewGuard};
use crate::notes::{Note, NoteStore};

/// Title given to a freshly created draft.
pub const NEW_NOTE_TITLE: &str = "New Note";
/// Title stored when a note is saved with a blank title.
pub const UNTITLED: &str = "Untitled";

/// Notes screen state: the list plus the note open in the editor.
pub struct NotesScreen {
    notes_store: Arc<NoteStore>,
    guard: ViewGuard,
    notes: Vec<Note>,
    selected: Option<Note>,
    title: String,
    content: String,
    editing: bool,
}

impl NotesScreen {
    pub fn new(notes_store: Arc<NoteStore>) -> Self {
        Self {
            notes_store,
            guard: ViewGuard::new(),
            notes: Vec::new(),
            selected: None,
            title: String::new(),
            content: String::new(),
            editing: false,
        }
    }

    pub fn guard(&self) -> ViewGuard {
        self.guard.clone()
    }

    pub async fn load(&mut self) -> ScreenResult<()> {
        let notes = self
            .notes_store
            .load()
            .await
            .map_err(|e| Alert::from_error("Failed to load notes", &e))?;
        if self.guard.is_mounted() {
            self.notes = notes;
        } else {
            debug!("notes unmounted, dropping load result");
        }
        Ok(())
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected(&self) -> Option<&Note> {
        self.selected.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Open an unsaved "New Note" draft in the editor.
    pub fn create(&mut self) -> &Note {
        let draft = Note::new(NEW_NOTE_TITLE, "");
        self.title = draft.title.clone();
        self.content = draft.content.clone();
        self.editing = true;
        self.selected.insert(draft)
    }

    /// Show an existing note read-only.
    pub fn select(&mut self, id: &str) -> ScreenResult<()> {
        let note = self
            .notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| Alert::new("Error", "Note not found"))?;
        self.title = note.title.clone();
        self.content = note.content.clone();
        self.editing = false;
        self.selected = Some(note);
        Ok(())
    }

    pub fn edit(&mut self) {
        if self.selected.is_some() {
            self.editing = true;
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
    }

    /// Persist the editor contents.
    ///
    /// A blank title is stored as "Untitled". An existing note is replaced in
    /// place; a new one goes to the front of the list.
    pub async fn save(&mut self) -> ScreenResult<Note> {
        let Some(selected) = self.selected.as_ref() else {
            return Err(Alert::new("Error", "No note selected"));
        };

        let title = self.title.trim();
        let updated = Note {
            title: if title.is_empty() { UNTITLED.to_string() } else { title.to_string() },
            content: self.content.clone(),
            updated_at: now_millis(),
            ..selected.clone()
        };

        let mut next = self.notes.clone();
        match next.iter().position(|n| n.id == updated.id) {
            Some(i) => next[i] = updated.clone(),
            None => next.insert(0, updated.clone()),
        }

        self.notes_store
            .save(&next)
            .await
            .map_err(|e| Alert::from_error("Failed to save note", &e))?;

        self.notes = next;
        self.selected = Some(updated.clone());
        self.editing = false;
        Ok(updated)
    }

    /// Remove the selected note.
    pub async fn delete_selected(&mut self) -> ScreenResult<()> {
        let Some(selected) = self.selected.as_ref() else {
            return Err(Alert::new("Error", "No note selected"));
        };

        let next: Vec<Note> = self
            .notes
            .iter()
            .filter(|n| n.id != selected.id)
            .cloned()
            .collect();

        self.notes_store
            .save(&next)
            .await
            .map_err(|e| Alert::from_error("Failed to delete note", &e))?;

        self.notes = next;
        self.selected = None;
        self.title.clear();
        self.content.clear();
        self.editing = false;
        Ok(())
    }

    /// Confirmation shown before deleting.
    pub fn delete_prompt() -> Alert {
        Alert::new("Delete Note", "Are you sure you want to delete this note?")
    }
}
