use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use edtui::{EditorTheme, EditorView};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::color_picker::{Channel, ColorPickerState};
use super::super::colors::*;
use super::super::tag_editor::{InputField, TagEditor};
use super::super::tui::Frame as TuiFrame;
use super::super::{centered_rect, centered_rect_sized};
use super::Modal;
use crate::tags::{Tag, TagForm, TagId};

const CHANNEL_BAR_WIDTH: usize = 16;

/// Modal for editing a tag's name and color
pub struct TagModal {
    title: String,
    target_id: TagId,
    pub editor: TagEditor,
    pub picker: ColorPickerState,
}

impl TagModal {
    pub fn for_tag(tag: &Tag) -> Self {
        let mut editor = TagEditor::new();
        editor.load_tag(tag);
        let mut picker = ColorPickerState::default();
        picker.reset_to(tag.color.as_deref());
        Self {
            title: "Update Tag".to_string(),
            target_id: tag.id.clone(),
            editor,
            picker,
        }
    }

    /// Re-apply the target record after a background refresh. The form
    /// decides whether anything actually reloads; the picker preview is
    /// only re-seeded when it did.
    pub fn load_target(&mut self, tag: &Tag) {
        self.target_id = tag.id.clone();
        if self.editor.load_tag(tag) && !self.picker.open {
            self.picker.reset_to(tag.color.as_deref());
        }
    }

    pub fn target_id(&self) -> &TagId {
        &self.target_id
    }

    pub fn form(&self) -> TagForm {
        self.editor.form()
    }

    fn handle_picker_key_event(&mut self, key_event: KeyEvent) -> Result<bool> {
        match key_event.code {
            // Close without committing; the preview is kept
            KeyCode::Esc => {
                self.picker.close();
            }
            // Commit is the only path from preview to the form payload
            KeyCode::Enter => {
                let hex = self.picker.selected_hex();
                self.editor.commit_color(hex);
                self.picker.close();
            }
            KeyCode::Char('h') | KeyCode::Left => self.picker.decrease(8),
            KeyCode::Char('l') | KeyCode::Right => self.picker.increase(8),
            KeyCode::Char('H') => self.picker.decrease(1),
            KeyCode::Char('L') => self.picker.increase(1),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => self.picker.next_channel(),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => self.picker.previous_channel(),
            _ => {}
        }
        // The open picker captures all input
        Ok(true)
    }

    fn render_picker(&self, frame: &mut TuiFrame, area: Rect) {
        let popup_area = centered_rect_sized(34, 9, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Pick Color")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER_FOCUSED))
            .style(Style::default().bg(ALT_BG));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Preview swatch
                Constraint::Length(1), // Red
                Constraint::Length(1), // Green
                Constraint::Length(1), // Blue
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let preview = Line::from(vec![
            Span::styled("  ████  ", Style::default().fg(self.picker.preview_color())),
            Span::styled(self.picker.selected_hex(), Style::default().fg(TEXT_FG)),
        ]);
        frame.render_widget(Paragraph::new(preview), chunks[0]);

        for (i, (label, channel)) in [
            ("R", Channel::Red),
            ("G", Channel::Green),
            ("B", Channel::Blue),
        ]
        .into_iter()
        .enumerate()
        {
            let value = self.picker.channel_value(channel);
            let filled = (value as usize * CHANNEL_BAR_WIDTH) / 255;
            let bar = format!(
                "{}{}",
                "█".repeat(filled),
                "░".repeat(CHANNEL_BAR_WIDTH - filled)
            );
            let style = if self.picker.channel == channel {
                Style::default().fg(ACCENT_YELLOW).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(TEXT_DIM)
            };
            let line = Line::from(vec![
                Span::styled(format!(" {} ", label), style),
                Span::styled(bar, style),
                Span::styled(format!(" {:>3}", value), style),
            ]);
            frame.render_widget(Paragraph::new(line), chunks[1 + i]);
        }

        let help = Paragraph::new("h/l: adjust | j/k: channel | Enter: apply | Esc: close")
            .style(Style::default().fg(TEXT_DIM))
            .alignment(Alignment::Center);
        frame.render_widget(help, chunks[5]);
    }
}

impl Modal for TagModal {
    fn title(&self) -> &str {
        &self.title
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<bool> {
        if self.picker.open {
            return self.handle_picker_key_event(key_event);
        }

        match key_event.code {
            KeyCode::Esc => {
                // If the name editor is in insert mode, drop back to normal
                // mode; otherwise let the app handle it (close modal)
                if self.editor.current_input_field == InputField::Name
                    && self.editor.is_name_editor_in_insert_mode()
                {
                    self.editor.set_name_editor_to_normal_mode();
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            // Confirm input; the app turns this into a submit
            KeyCode::Enter => Ok(false),
            KeyCode::Tab => {
                self.editor.next_input_field();
                if self.editor.current_input_field == InputField::Name {
                    self.editor.set_name_editor_to_normal_mode();
                    self.editor.position_cursor_at_end();
                }
                Ok(true)
            }
            KeyCode::BackTab => {
                self.editor.previous_input_field();
                if self.editor.current_input_field == InputField::Name {
                    self.editor.set_name_editor_to_normal_mode();
                    self.editor.position_cursor_at_end();
                }
                Ok(true)
            }
            _ => match self.editor.current_input_field {
                InputField::Name => {
                    self.editor.handle_input_key_event(key_event)?;
                    Ok(true)
                }
                InputField::Color => {
                    // The color field is never free-typed; space opens the
                    // picker, everything else is swallowed
                    if key_event.code == KeyCode::Char(' ') {
                        self.picker.open = true;
                    }
                    Ok(true)
                }
            },
        }
    }

    fn render(&mut self, frame: &mut TuiFrame, area: Rect) {
        let popup_area = centered_rect(50, 40, area);
        frame.render_widget(Clear, popup_area);

        // Render background
        let bg_block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER_EDIT))
            .style(Style::default().bg(NORMAL_BG));
        let inner = bg_block.inner(popup_area);
        frame.render_widget(bg_block, popup_area);

        let chunks = Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Name field
                Constraint::Length(1), // Name error message
                Constraint::Length(3), // Color field
                Constraint::Min(0),    // Spacer
                Constraint::Length(1), // Help text
            ])
            .split(inner);

        // Name field
        let name_focused = self.editor.current_input_field == InputField::Name;
        let name_has_error = self.editor.has_validation_errors();
        let name_border_color = if name_has_error {
            ACCENT_RED
        } else if name_focused && self.editor.is_name_editor_in_insert_mode() {
            BORDER_EDIT
        } else if name_focused {
            BORDER_FOCUSED
        } else {
            BORDER_NORMAL
        };

        let name_block = Block::default()
            .title("Name")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(name_border_color))
            .style(Style::default().bg(NORMAL_BG));
        let name_inner = name_block.inner(chunks[0]);
        frame.render_widget(name_block, chunks[0]);

        let name_theme = if name_focused {
            EditorTheme::default()
                .base(Style::default().bg(NORMAL_BG).fg(TEXT_FG))
                .cursor_style(Style::default().bg(TEXT_FG).fg(NORMAL_BG))
                .selection_style(Style::default().bg(SELECTED_BG).fg(TEXT_FG))
                .hide_status_line()
        } else {
            EditorTheme::default()
                .base(Style::default().bg(NORMAL_BG).fg(TEXT_FG))
                .hide_status_line()
                .hide_cursor()
        };
        let name_editor_view = EditorView::new(&mut self.editor.name_editor).theme(name_theme);
        frame.render_widget(name_editor_view, name_inner);

        // Render name error message if present
        if let Some(error) = &self.editor.name_error {
            let error_paragraph =
                Paragraph::new(error.as_str()).style(Style::default().fg(ACCENT_RED).bg(NORMAL_BG));
            frame.render_widget(error_paragraph, chunks[1]);
        }

        // Color field: swatch + committed hex, picker-driven only
        let color_focused = self.editor.current_input_field == InputField::Color;
        let color_border_color = if color_focused {
            BORDER_FOCUSED
        } else {
            BORDER_NORMAL
        };
        let color_block = Block::default()
            .title("Color")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color_border_color))
            .style(Style::default().bg(NORMAL_BG));
        let color_inner = color_block.inner(chunks[2]);
        frame.render_widget(color_block, chunks[2]);

        let committed = self.editor.color().map(str::to_string);
        let swatch_color = tag_swatch_color(committed.as_deref());
        let color_line = Line::from(vec![
            Span::styled("●● ", Style::default().fg(swatch_color)),
            Span::styled(
                committed.unwrap_or_else(|| "(none)".to_string()),
                Style::default().fg(TEXT_FG),
            ),
            Span::styled(
                if color_focused {
                    "  (space to pick)"
                } else {
                    ""
                },
                Style::default().fg(TEXT_DIM),
            ),
        ]);
        frame.render_widget(Paragraph::new(color_line), color_inner);

        // Help text
        let help = Paragraph::new("Tab: switch field | Enter: save | Esc: cancel")
            .style(Style::default().fg(TEXT_DIM).bg(NORMAL_BG))
            .alignment(Alignment::Center);
        frame.render_widget(help, chunks[4]);

        if self.picker.open {
            self.render_picker(frame, area);
        }
    }

    fn validate(&mut self) -> bool {
        self.editor.validate()
    }

    fn has_validation_errors(&self) -> bool {
        self.editor.has_validation_errors()
    }
}
