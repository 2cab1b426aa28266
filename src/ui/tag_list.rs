use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::widgets::ListState;

use super::modal::{Modal, TagModal};
use crate::tags::{Tag, TagForm, TagId};

/// Selection and modal state for the tag list pane
pub struct TagList {
    pub state: ListState,
    pub current_modal: Option<Box<dyn Modal>>,
    count: usize,
}

impl TagList {
    pub fn new() -> Self {
        Self {
            state: ListState::default(),
            current_modal: None,
            count: 0,
        }
    }

    /// Record the new list length and clamp the selection to it
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        match self.state.selected() {
            Some(_) if count == 0 => self.state.select(None),
            Some(i) if i >= count => self.state.select(Some(count - 1)),
            None if count > 0 => self.state.select(Some(0)),
            _ => {}
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn select_next(&mut self) {
        if self.count == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 1).min(self.count - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.count == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.count > 0 {
            self.state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if self.count > 0 {
            self.state.select(Some(self.count - 1));
        }
    }

    pub fn select_none(&mut self) {
        self.state.select(None);
    }

    // ------------------------------------------------------------------
    // Modal management
    // ------------------------------------------------------------------

    pub fn start_modal(&mut self, modal: Box<dyn Modal>) {
        self.current_modal = Some(modal);
    }

    pub fn close_modal(&mut self) {
        self.current_modal = None;
    }

    pub fn has_modal(&self) -> bool {
        self.current_modal.is_some()
    }

    /// Forward a key event to the open modal; returns whether it was consumed
    pub fn handle_modal_key_event(&mut self, key_event: KeyEvent) -> Result<bool> {
        match &mut self.current_modal {
            Some(modal) => modal.handle_key_event(key_event),
            None => Ok(false),
        }
    }

    /// Run the open modal's validation; a missing modal never blocks
    pub fn validate_modal(&mut self) -> bool {
        match &mut self.current_modal {
            Some(modal) => modal.validate(),
            None => true,
        }
    }

    /// Extract the edit target and payload from an open tag modal
    pub fn modal_tag_form(&self) -> Option<(TagId, TagForm)> {
        let modal = self.current_modal.as_ref()?;
        let tag_modal = modal.as_any().downcast_ref::<TagModal>()?;
        Some((tag_modal.target_id().clone(), tag_modal.form()))
    }

    /// Push a refreshed tag record into an open tag modal
    pub fn reload_modal_target(&mut self, tag: &Tag) {
        if let Some(modal) = &mut self.current_modal {
            if let Some(tag_modal) = modal.as_any_mut().downcast_mut::<TagModal>() {
                tag_modal.load_target(tag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tag(id: &str, name: &str) -> Tag {
        Tag {
            id: TagId(id.to_string()),
            name: name.to_string(),
            color: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_selection_clamps_to_count() {
        let mut list = TagList::new();
        list.set_count(3);
        assert_eq!(list.selected_index(), Some(0));

        list.select_last();
        assert_eq!(list.selected_index(), Some(2));

        // Shrinking the list pulls the selection back in range
        list.set_count(1);
        assert_eq!(list.selected_index(), Some(0));

        list.set_count(0);
        assert_eq!(list.selected_index(), None);
    }

    #[test]
    fn test_navigation_does_not_wrap() {
        let mut list = TagList::new();
        list.set_count(2);

        list.select_previous();
        assert_eq!(list.selected_index(), Some(0));

        list.select_next();
        list.select_next();
        assert_eq!(list.selected_index(), Some(1));
    }

    #[test]
    fn test_modal_form_extraction() {
        let mut list = TagList::new();
        assert!(list.modal_tag_form().is_none());

        let target = tag("t1", "Urgent");
        list.start_modal(Box::new(TagModal::for_tag(&target)));
        let (id, form) = list.modal_tag_form().unwrap();
        assert_eq!(id, TagId("t1".to_string()));
        assert_eq!(form.name, "Urgent");

        list.close_modal();
        assert!(!list.has_modal());
        assert!(list.modal_tag_form().is_none());
    }

    #[test]
    fn test_reload_modal_target_updates_pristine_form() {
        let mut list = TagList::new();
        list.start_modal(Box::new(TagModal::for_tag(&tag("t1", "Urgent"))));

        list.reload_modal_target(&tag("t1", "Urgent (renamed)"));
        let (_, form) = list.modal_tag_form().unwrap();
        assert_eq!(form.name, "Urgent (renamed)");
    }
}
