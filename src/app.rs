use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
    action::Action,
    store::TagStore,
    tags::{find_tag, Tag, TagId},
    ui::{tui, AppUI, Event, Tui},
};

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Editing,
    Processing,
    Help,
}

/// Which tag the edit surface is targeting. Held by the app rather than
/// threaded through ambient state so every transition is explicit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditorContext {
    pub open: bool,
    pub tag_id: Option<TagId>,
}

pub struct App {
    pub should_quit: bool,
    pub mode: Mode,
    pub ui: AppUI,
    pub store: Arc<TagStore>,
    pub error_message: Option<String>,
    pub error_ticks: u8,
    pub tag_cache: Vec<Tag>,
    pub tags_loaded: bool,
    pub pending_tags: Arc<Mutex<Option<Vec<Tag>>>>,
    pub editor: EditorContext,
}

impl App {
    pub fn new(store: TagStore) -> Result<Self> {
        Ok(Self {
            should_quit: false,
            mode: Mode::Normal,
            ui: AppUI::new(),
            store: Arc::new(store),
            error_message: None,
            error_ticks: 0,
            tag_cache: Vec::new(),
            tags_loaded: false,
            pending_tags: Arc::new(Mutex::new(None)),
            editor: EditorContext::default(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = tui::Tui::new()?;
        tui.enter()?;

        // Initial load of tags
        action_tx.send(Action::RefreshTags)?;

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    Event::Tick => action_tx.send(Action::Tick)?,
                    Event::Render => action_tx.send(Action::Render)?,
                    Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
                    Event::Key(key) => {
                        self.handle_key_event(key, &action_tx)?;
                    }
                    _ => {}
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                match action {
                    Action::Tick => self.next_tick(),
                    Action::Render => self.render(&mut tui)?,
                    Action::Resize(w, h) => tui.terminal.resize(Rect::new(0, 0, w, h))?,
                    Action::Quit => self.should_quit = true,
                    Action::RefreshTags => self.refresh_tags(action_tx.clone()),
                    Action::Error(msg) => self.error(msg),
                    Action::ToggleHelp => self.toggle_help(),

                    Action::SelectPrevious => self.ui.tag_list.select_previous(),
                    Action::SelectNext => self.ui.tag_list.select_next(),
                    Action::SelectFirst => self.ui.tag_list.select_first(),
                    Action::SelectLast => self.ui.tag_list.select_last(),
                    Action::SelectNone => self.ui.tag_list.select_none(),

                    Action::StartEditTag => self.start_edit_tag(),
                    Action::CancelEdit => self.cancel_edit(),
                    Action::SubmitEdit => self.submit_edit(action_tx.clone()),

                    Action::EnterNormal => self.mode = Mode::Normal,
                    Action::EnterProcessing => self.mode = Mode::Processing,
                    Action::ExitProcessing => self.exit_processing(),

                    Action::TagUpdated => self.tag_updated(&action_tx)?,
                    Action::TagsFetched => self.tags_fetched(),
                }
            }

            if self.should_quit {
                tui.stop();
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    /// Update the cache with fresh tags and refresh the UI
    fn update_cache(&mut self, tags: Vec<Tag>) {
        self.tag_cache = tags;
        self.tags_loaded = true;
        self.ui.tag_list.set_count(self.tag_cache.len());
        self.sync_edit_target();
    }

    /// Re-resolve the edit target against the refreshed cache.
    ///
    /// A missing target (tag deleted elsewhere) is non-fatal: the form
    /// keeps its current values and the user can still cancel or submit.
    fn sync_edit_target(&mut self) {
        if !self.editor.open {
            return;
        }
        let Some(tag_id) = &self.editor.tag_id else {
            return;
        };
        if let Some(tag) = find_tag(&self.tag_cache, tag_id) {
            let tag = tag.clone();
            self.ui.tag_list.reload_modal_target(&tag);
        }
    }

    fn error(&mut self, msg: String) {
        self.error_message = Some(msg);
        self.error_ticks = 0;
        // A failed submit returns to the still-open editor
        self.mode = if self.editor.open {
            Mode::Editing
        } else {
            Mode::Normal
        };
    }

    fn next_tick(&mut self) {
        if self.error_message.is_some() {
            self.error_ticks += 1;
            if self.error_ticks > 12 {
                // Clear after ~3 seconds (at 4 ticks/second)
                self.error_message = None;
                self.error_ticks = 0;
            }
        }
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        let tags: &[Tag] = &self.tag_cache;
        let mode = self.mode;
        let error_message = &self.error_message;
        let tags_loaded = self.tags_loaded;
        let ui = &mut self.ui;
        tui.terminal.draw(|f| {
            let _ = ui.draw(f, f.area(), mode, tags, error_message, tags_loaded);
        })?;
        Ok(())
    }

    fn refresh_tags(&mut self, tx: UnboundedSender<Action>) {
        if !self.editor.open {
            self.mode = Mode::Processing;
        }
        let store = Arc::clone(&self.store);
        let pending = Arc::clone(&self.pending_tags);
        tokio::spawn(async move {
            match store.all_tags().await {
                Ok(tags) => {
                    if let Ok(mut guard) = pending.lock() {
                        *guard = Some(tags);
                    }
                    let _ = tx.send(Action::TagsFetched);
                }
                Err(e) => {
                    let _ = tx.send(Action::Error(e));
                }
            }
            let _ = tx.send(Action::ExitProcessing);
        });
    }

    fn tags_fetched(&mut self) {
        let tags_opt = if let Ok(mut guard) = self.pending_tags.lock() {
            guard.take()
        } else {
            None
        };

        if let Some(tags) = tags_opt {
            self.update_cache(tags);
        }
    }

    fn start_edit_tag(&mut self) {
        let Some(index) = self.ui.tag_list.selected_index() else {
            return;
        };
        let Some(tag) = self.tag_cache.get(index) else {
            return;
        };
        let tag = tag.clone();

        self.editor = EditorContext {
            open: true,
            tag_id: Some(tag.id.clone()),
        };
        self.ui
            .tag_list
            .start_modal(Box::new(crate::ui::modal::TagModal::for_tag(&tag)));
        self.mode = Mode::Editing;
    }

    /// Close the editor without touching the store
    fn cancel_edit(&mut self) {
        self.ui.tag_list.close_modal();
        self.editor = EditorContext::default();
        self.mode = Mode::Normal;
    }

    fn submit_edit(&mut self, tx: UnboundedSender<Action>) {
        if self.mode != Mode::Editing || !self.editor.open {
            return;
        }

        // An invalid form never reaches the store; the modal stays open
        // showing field errors
        if !self.ui.tag_list.validate_modal() {
            return;
        }

        let Some((tag_id, form)) = self.ui.tag_list.modal_tag_form() else {
            return;
        };

        self.mode = Mode::Processing;
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            match store.update_tag(&tag_id, form).await {
                Ok(_) => {
                    let _ = tx.send(Action::TagUpdated);
                }
                Err(e) => {
                    let _ = tx.send(Action::Error(e));
                }
            }
            let _ = tx.send(Action::ExitProcessing);
        });
    }

    /// A successful write closes the editor and refreshes the list
    fn tag_updated(&mut self, tx: &UnboundedSender<Action>) -> Result<()> {
        self.ui.tag_list.close_modal();
        self.editor = EditorContext::default();
        self.mode = Mode::Normal;
        tx.send(Action::RefreshTags)?;
        Ok(())
    }

    fn exit_processing(&mut self) {
        if self.mode != Mode::Processing {
            return;
        }
        self.mode = if self.editor.open {
            Mode::Editing
        } else {
            Mode::Normal
        };
    }

    fn toggle_help(&mut self) {
        if self.mode == Mode::Help {
            self.mode = Mode::Normal;
        } else {
            self.mode = Mode::Help;
        }
    }

    fn handle_key_event(
        &mut self,
        key: KeyEvent,
        action_tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<()> {
        use crossterm::event::KeyCode;

        match self.mode {
            Mode::Normal => match key.code {
                KeyCode::Char('q') => action_tx.send(Action::Quit)?,
                KeyCode::Esc => action_tx.send(Action::SelectNone)?,
                KeyCode::Char('r') => action_tx.send(Action::RefreshTags)?,
                KeyCode::Char('?') => action_tx.send(Action::ToggleHelp)?,
                KeyCode::Char('j') | KeyCode::Down => action_tx.send(Action::SelectNext)?,
                KeyCode::Char('k') | KeyCode::Up => action_tx.send(Action::SelectPrevious)?,
                KeyCode::Char('g') | KeyCode::Home => action_tx.send(Action::SelectFirst)?,
                KeyCode::Char('G') | KeyCode::End => action_tx.send(Action::SelectLast)?,
                KeyCode::Char('e') | KeyCode::Enter => action_tx.send(Action::StartEditTag)?,
                _ => {}
            },
            Mode::Editing => {
                // The modal gets first refusal; unconsumed keys fall
                // through to cancel/submit
                let consumed = self.ui.tag_list.handle_modal_key_event(key)?;
                if !consumed {
                    match key.code {
                        KeyCode::Esc => action_tx.send(Action::CancelEdit)?,
                        KeyCode::Enter => action_tx.send(Action::SubmitEdit)?,
                        _ => {}
                    }
                }
            }
            Mode::Processing => {
                // Ignore input while processing
            }
            Mode::Help => match key.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
                    action_tx.send(Action::ToggleHelp)?
                }
                _ => {}
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagForm;
    use crate::ui::modal::TagModal;
    use chrono::Utc;

    fn tag(id: &str, name: &str, color: Option<&str>) -> Tag {
        Tag {
            id: TagId(id.to_string()),
            name: name.to_string(),
            color: color.map(str::to_string),
            updated_at: Utc::now(),
        }
    }

    async fn app_with_tags(dir: &tempfile::TempDir, tags: Vec<Tag>) -> App {
        let store = TagStore::at_path(dir.path().join("tags.json"));
        for tag in tags {
            store.insert_tag(tag).await.unwrap();
        }
        App::new(store).unwrap()
    }

    fn open_editor_for(app: &mut App, tag: &Tag) {
        app.editor = EditorContext {
            open: true,
            tag_id: Some(tag.id.clone()),
        };
        app.ui.tag_list.start_modal(Box::new(TagModal::for_tag(tag)));
        app.mode = Mode::Editing;
    }

    #[tokio::test]
    async fn test_invalid_submit_never_reaches_store() {
        let dir = tempfile::tempdir().unwrap();
        let target = tag("t1", "U", None);
        let mut app = app_with_tags(&dir, vec![target.clone()]).await;
        open_editor_for(&mut app, &target);

        let (tx, mut rx) = mpsc::unbounded_channel();
        app.submit_edit(tx);

        // Still editing, nothing dispatched, store untouched
        assert_eq!(app.mode, Mode::Editing);
        assert!(app.editor.open);
        assert!(rx.try_recv().is_err());
        let tags = app.store.all_tags().await.unwrap();
        assert_eq!(tags[0].name, "U");
    }

    #[tokio::test]
    async fn test_submit_updates_tag_and_reports_success() {
        let dir = tempfile::tempdir().unwrap();
        let target = tag("t1", "Urgent", Some("#ff0000"));
        let mut app = app_with_tags(&dir, vec![target.clone()]).await;
        open_editor_for(&mut app, &target);

        let (tx, mut rx) = mpsc::unbounded_channel();
        app.submit_edit(tx);
        assert_eq!(app.mode, Mode::Processing);

        assert!(matches!(rx.recv().await, Some(Action::TagUpdated)));
        assert!(matches!(rx.recv().await, Some(Action::ExitProcessing)));

        let tags = app.store.all_tags().await.unwrap();
        assert_eq!(tags[0].name, "Urgent");
        assert_eq!(tags[0].color.as_deref(), Some("#ff0000"));
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_editor_open() {
        let dir = tempfile::tempdir().unwrap();
        // Target exists in the form but not in the store
        let missing = tag("ghost", "Urgent", None);
        let mut app = app_with_tags(&dir, vec![]).await;
        open_editor_for(&mut app, &missing);

        let (tx, mut rx) = mpsc::unbounded_channel();
        app.submit_edit(tx);

        let action = rx.recv().await.unwrap();
        let Action::Error(msg) = action else {
            panic!("expected error, got {:?}", action);
        };
        app.error(msg);
        assert!(matches!(rx.recv().await, Some(Action::ExitProcessing)));
        app.exit_processing();

        // Back in the still-open editor with the banner showing
        assert_eq!(app.mode, Mode::Editing);
        assert!(app.editor.open);
        assert!(app.error_message.is_some());
    }

    #[tokio::test]
    async fn test_cancel_edit_never_mutates() {
        let dir = tempfile::tempdir().unwrap();
        let target = tag("t1", "Urgent", Some("#ff0000"));
        let mut app = app_with_tags(&dir, vec![target.clone()]).await;
        open_editor_for(&mut app, &target);

        app.cancel_edit();
        assert_eq!(app.mode, Mode::Normal);
        assert!(!app.editor.open);
        assert!(!app.ui.tag_list.has_modal());

        let tags = app.store.all_tags().await.unwrap();
        assert_eq!(tags[0], target);
    }

    #[tokio::test]
    async fn test_refresh_with_missing_target_is_non_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let target = tag("t1", "Urgent", None);
        let mut app = app_with_tags(&dir, vec![]).await;
        open_editor_for(&mut app, &target);

        // Refresh lands with the target gone; the form keeps its values
        app.update_cache(vec![tag("t2", "Other", None)]);
        assert!(app.editor.open);
        let (_, form) = app.ui.tag_list.modal_tag_form().unwrap();
        assert_eq!(form.name, "Urgent");
    }

    #[tokio::test]
    async fn test_error_banner_decays_after_ticks() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_tags(&dir, vec![]).await;

        app.error("boom".to_string());
        assert_eq!(app.mode, Mode::Normal);
        for _ in 0..13 {
            app.next_tick();
        }
        assert!(app.error_message.is_none());
    }

    #[tokio::test]
    async fn test_submit_guard_outside_editing_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_tags(&dir, vec![]).await;

        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        app.submit_edit(tx);
        assert_eq!(app.mode, Mode::Normal);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_modal_form_matches_store_payload_shape() {
        let target = tag("t1", "Urgent", Some("#ff0000"));
        let modal = TagModal::for_tag(&target);
        let expected = TagForm {
            name: "Urgent".to_string(),
            color: Some("#ff0000".to_string()),
        };
        assert_eq!(modal.form(), expected);
    }
}
