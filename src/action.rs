use serde::{Deserialize, Serialize};
use strum::Display;

/// Actions that can be performed in the TUI
#[derive(Debug, Clone, Serialize, Display, Deserialize)]
pub enum Action {
    /// Application tick for periodic updates
    Tick,
    /// Render the UI
    Render,
    /// Resize terminal
    Resize(u16, u16),
    /// Quit the application
    Quit,
    /// Refresh the tag list from the store
    RefreshTags,
    /// Display error message
    Error(String),
    /// Toggle help screen
    ToggleHelp,

    // Navigation actions
    /// Move selection up
    SelectPrevious,
    /// Move selection down
    SelectNext,
    /// Move to first item
    SelectFirst,
    /// Move to last item
    SelectLast,
    /// Clear selection
    SelectNone,

    // Tag editing
    /// Open the editor for the selected tag
    StartEditTag,
    /// Close the editor without saving
    CancelEdit,
    /// Validate and submit the edit form
    SubmitEdit,

    // Mode changes
    /// Enter normal mode
    EnterNormal,
    /// Enter processing mode (waiting for the store)
    EnterProcessing,
    /// Exit processing mode
    ExitProcessing,

    // Store updates
    /// A tag update was written successfully
    TagUpdated,
    /// Tags fetched from the store - triggers UI update
    TagsFetched,
}
