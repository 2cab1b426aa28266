use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use super::tui::Frame as TuiFrame;

/// Trait for modal dialogs that can be displayed as overlays
#[allow(dead_code)]
pub trait Modal {
    /// Get the title of the modal
    fn title(&self) -> &str;

    /// Allow downcasting to concrete types
    fn as_any(&self) -> &dyn std::any::Any;

    /// Allow mutable downcasting for in-place updates (e.g. reloading
    /// the edit target after a background refresh)
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;

    /// Handle key events for the modal. Returns true when the event was
    /// consumed; unconsumed events bubble up to the app
    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<bool>;

    /// Render the modal content
    fn render(&mut self, frame: &mut TuiFrame, area: Rect);

    /// Validate inputs and return true if valid (default implementation always returns true)
    fn validate(&mut self) -> bool {
        true
    }

    /// Check if there are any validation errors (default implementation always returns false)
    fn has_validation_errors(&self) -> bool {
        false
    }
}

pub mod tag_modal;

pub use tag_modal::TagModal;
