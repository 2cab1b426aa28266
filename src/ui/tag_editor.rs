use anyhow::Result;
use crossterm::event::KeyEvent;
use edtui::{EditorEventHandler, EditorMode, EditorState, Index2, Lines};

use crate::tags::{Tag, TagForm, TagId};

/// Validate the name field. Matches the submit-time rules exactly; the
/// same message strings appear under the field after a failed submit.
pub fn validate_name(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("Tag name is required")
    } else if name.chars().count() < 2 {
        Some("Name must be at least 2 characters")
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Name,
    Color,
}

/// Form state for editing a single tag.
///
/// The name is free text; the color is a committed value that only the
/// picker writes. `loaded_id` tracks which tag the form was populated
/// from so a re-targeted form resets exactly once per distinct tag.
pub struct TagEditor {
    pub name_editor: EditorState,
    pub event_handler: EditorEventHandler,
    pub current_input_field: InputField,
    // Committed color; `commit_color` is the only writer
    color: Option<String>,
    // Validation state
    pub validation_attempted: bool,
    pub name_error: Option<String>,
    // Identity and original values for reset/change detection
    loaded_id: Option<TagId>,
    original_name: String,
    original_color: Option<String>,
}

impl TagEditor {
    pub fn new() -> Self {
        Self {
            name_editor: EditorState::default(),
            event_handler: EditorEventHandler::default(),
            current_input_field: InputField::Name,
            color: None,
            validation_attempted: false,
            name_error: None,
            loaded_id: None,
            original_name: String::new(),
            original_color: None,
        }
    }

    /// Populate the form from a tag record.
    ///
    /// Returns `true` when the form was (re)populated. A different tag id
    /// always repopulates. The same id repopulates only when the record
    /// content changed AND the user has no unsaved edits; background
    /// refreshes never clobber in-progress work.
    pub fn load_tag(&mut self, tag: &Tag) -> bool {
        if self.loaded_id.as_ref() == Some(&tag.id) {
            let content_unchanged =
                self.original_name == tag.name && self.original_color == tag.color;
            if content_unchanged || self.has_changes() {
                return false;
            }
        }

        self.name_editor = EditorState::new(Lines::from(tag.name.clone()));
        self.color = tag.color.clone();
        self.current_input_field = InputField::Name;
        self.validation_attempted = false;
        self.name_error = None;
        self.loaded_id = Some(tag.id.clone());
        self.original_name = tag.name.clone();
        self.original_color = tag.color.clone();
        true
    }

    pub fn name(&self) -> String {
        String::from(self.name_editor.lines.clone())
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Accept a picker selection as the committed color
    pub fn commit_color(&mut self, hex: String) {
        self.color = Some(hex);
    }

    /// Run the field rules, recording errors for display. Returns whether
    /// the form may be submitted.
    pub fn validate(&mut self) -> bool {
        self.validation_attempted = true;
        self.name_error = validate_name(&self.name()).map(str::to_string);
        self.name_error.is_none()
    }

    pub fn has_validation_errors(&self) -> bool {
        self.validation_attempted && self.name_error.is_some()
    }

    /// The payload handed to the store on submit
    pub fn form(&self) -> TagForm {
        TagForm {
            name: self.name(),
            color: self.color.clone(),
        }
    }

    pub fn loaded_id(&self) -> Option<&TagId> {
        self.loaded_id.as_ref()
    }

    pub fn has_changes(&self) -> bool {
        self.name() != self.original_name || self.color != self.original_color
    }

    pub fn next_input_field(&mut self) {
        self.current_input_field = match self.current_input_field {
            InputField::Name => InputField::Color,
            InputField::Color => InputField::Name,
        };
    }

    pub fn previous_input_field(&mut self) {
        self.next_input_field();
    }

    pub fn is_name_editor_in_insert_mode(&self) -> bool {
        self.name_editor.mode == EditorMode::Insert
    }

    pub fn set_name_editor_to_normal_mode(&mut self) {
        self.name_editor.mode = EditorMode::Normal;
    }

    pub fn position_cursor_at_end(&mut self) {
        let editor = &mut self.name_editor;
        if editor.lines.is_empty() {
            editor.cursor = Index2::new(0, 0);
        } else if let Some(last_row_idx) = editor.lines.len().checked_sub(1) {
            if let Some(last_col) = editor.lines.len_col(last_row_idx) {
                editor.cursor = Index2::new(last_row_idx, last_col);
            }
        }
    }

    pub fn handle_input_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        self.event_handler
            .on_key_event(key_event, &mut self.name_editor);

        // Re-derive the error live once the user has attempted a submit
        if self.validation_attempted {
            self.name_error = validate_name(&self.name()).map(str::to_string);
        }
        Ok(())
    }
}
