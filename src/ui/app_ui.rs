use anyhow::Result;
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph},
};

use super::colors::*;
use super::tag_list::TagList;
use super::tui::Frame as TuiFrame;
use super::centered_rect;
use crate::app::Mode;
use crate::tags::Tag;

pub struct AppUI {
    pub tag_list: TagList,
}

impl AppUI {
    pub fn new() -> Self {
        Self {
            tag_list: TagList::new(),
        }
    }

    pub fn draw(
        &mut self,
        f: &mut TuiFrame,
        area: Rect,
        mode: Mode,
        tags: &[Tag],
        error_message: &Option<String>,
        tags_loaded: bool,
    ) -> Result<()> {
        // Set consistent background for entire screen
        let background = Block::default().style(Style::default().bg(NORMAL_BG));
        f.render_widget(background, area);

        // Main vertical layout: Header, Content, Footer
        let main_chunks = Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(10),   // Content area (tag list + details)
                Constraint::Length(3), // Footer
            ])
            .split(area);

        // Content area split horizontally: tag list on left, details on right
        let content_chunks = Layout::default()
            .direction(ratatui::layout::Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[1]);

        self.render_header(f, main_chunks[0], mode, error_message);
        self.render_tag_list(f, content_chunks[0], tags, tags_loaded);
        self.render_tag_details(f, content_chunks[1], tags);
        self.render_footer(f, main_chunks[2], mode);

        // Render overlays
        if let Some(modal) = &mut self.tag_list.current_modal {
            modal.render(f, area);
        } else if mode == Mode::Help {
            self.render_help_overlay(f, area);
        }

        Ok(())
    }

    fn render_header(
        &self,
        f: &mut TuiFrame,
        area: Rect,
        mode: Mode,
        error_message: &Option<String>,
    ) {
        let (title, style) = if let Some(err) = error_message {
            (
                Line::from(vec![
                    Span::styled("❌ ", Style::default().fg(ACCENT_RED).bold()),
                    Span::styled("Error: ", Style::default().fg(TEXT_WHITE).bold()),
                    Span::styled(err, Style::default().fg(TEXT_WHITE)),
                ]),
                Style::default().bg(ACCENT_RED),
            )
        } else {
            let (icon, text, accent_color) = match mode {
                Mode::Processing => ("⏳", " Processing...", ACCENT_YELLOW),
                Mode::Editing => ("✏️", " Edit Tag", ACCENT_GREEN),
                Mode::Help => ("❓", " Help", Color::Cyan),
                Mode::Normal => ("🏷️", " Tagdeck", HEADER_FG),
            };

            (
                Line::from(vec![
                    Span::styled(icon, Style::default().fg(accent_color).bold()),
                    Span::styled(text, Style::default().fg(HEADER_FG).bold()),
                ]),
                Style::default().bg(NORMAL_BG),
            )
        };

        let header = Paragraph::new(title)
            .style(style)
            .alignment(ratatui::layout::Alignment::Center)
            .block(Block::default());

        f.render_widget(header, area);
    }

    fn render_tag_list(&mut self, f: &mut TuiFrame, area: Rect, tags: &[Tag], tags_loaded: bool) {
        let border_color = if self.tag_list.has_modal() {
            BORDER_NORMAL
        } else {
            BORDER_FOCUSED
        };

        let block = Block::default()
            .title(" Tags ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(NORMAL_BG));

        if tags.is_empty() {
            let msg = if tags_loaded {
                "No tags found"
            } else {
                "Loading tags..."
            };
            let placeholder = Paragraph::new(msg)
                .style(Style::default().fg(TEXT_FG))
                .block(block)
                .alignment(ratatui::layout::Alignment::Center);
            f.render_widget(placeholder, area);
            return;
        }

        let selected = self.tag_list.selected_index();
        let items: Vec<ListItem> = tags
            .iter()
            .enumerate()
            .map(|(i, tag)| {
                let is_selected = Some(i) == selected;
                let bg_color = if i % 2 == 0 { NORMAL_BG } else { ALT_BG };

                let mut spans = vec![];
                if is_selected {
                    spans.push(Span::styled("▶ ", Style::default().fg(TEXT_FG)));
                } else {
                    spans.push(Span::raw("  "));
                }
                spans.push(Span::styled(
                    "●",
                    Style::default().fg(tag_swatch_color(tag.color.as_deref())),
                ));
                spans.push(Span::raw(" "));
                spans.push(Span::styled(&tag.name, Style::default().fg(TEXT_FG)));
                if let Some(color) = &tag.color {
                    spans.push(Span::raw("  "));
                    spans.push(Span::styled(color, Style::default().fg(TEXT_DIM)));
                }

                ListItem::new(Line::from(spans)).style(Style::default().bg(bg_color))
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(SELECTED_BG)
                .add_modifier(Modifier::BOLD),
        );

        f.render_stateful_widget(list, area, &mut self.tag_list.state);
    }

    fn render_tag_details(&self, f: &mut TuiFrame, area: Rect, tags: &[Tag]) {
        let block = Block::default()
            .title(" Details ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER_NORMAL))
            .style(Style::default().bg(NORMAL_BG))
            .padding(Padding::uniform(1));

        let tag = self
            .tag_list
            .selected_index()
            .and_then(|i| tags.get(i));

        let Some(tag) = tag else {
            let placeholder = Paragraph::new("Select a tag to see details")
                .style(Style::default().fg(TEXT_DIM))
                .block(block)
                .alignment(ratatui::layout::Alignment::Center);
            f.render_widget(placeholder, area);
            return;
        };

        let updated: DateTime<Local> = tag.updated_at.with_timezone(&Local);
        let lines = vec![
            Line::from(vec![
                Span::styled("Name:    ", Style::default().fg(ACCENT_YELLOW)),
                Span::styled(&tag.name, Style::default().fg(TEXT_FG)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Color:   ", Style::default().fg(ACCENT_YELLOW)),
                Span::styled(
                    "●● ",
                    Style::default().fg(tag_swatch_color(tag.color.as_deref())),
                ),
                Span::styled(
                    tag.color.as_deref().unwrap_or("(none)"),
                    Style::default().fg(TEXT_FG),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Updated: ", Style::default().fg(ACCENT_YELLOW)),
                Span::styled(
                    updated.format("%m/%d/%Y %I:%M %p").to_string(),
                    Style::default().fg(TEXT_FG),
                ),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .block(block)
            .style(Style::default().fg(TEXT_FG));
        f.render_widget(paragraph, area);
    }

    fn render_footer(&self, f: &mut TuiFrame, area: Rect, mode: Mode) {
        let footer_text = match mode {
            Mode::Processing => "Updating tags...",
            Mode::Editing => "Tab: switch field | Enter: save | Esc: cancel",
            Mode::Help => "Press ? or Esc to close help",
            Mode::Normal => "e/Enter: edit tag | r: refresh | ?: Help | q: Quit",
        };

        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(TEXT_FG).bg(NORMAL_BG))
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(BORDER_NORMAL)),
            );

        f.render_widget(footer, area);
    }

    fn render_help_overlay(&self, f: &mut TuiFrame, area: Rect) {
        let popup_area = centered_rect(70, 60, area);

        // Clear the area
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT_YELLOW))
            .style(Style::default().bg(NORMAL_BG))
            .padding(Padding::uniform(1));

        let help_text = vec![
            Line::from(Span::styled(
                "Navigation",
                Style::default().fg(ACCENT_YELLOW).bold(),
            )),
            Line::from(""),
            Line::from("  ↑ / k          Move selection up"),
            Line::from("  ↓ / j          Move selection down"),
            Line::from("  g / Home       Jump to first tag"),
            Line::from("  G / End        Jump to last tag"),
            Line::from("  Esc            Clear selection"),
            Line::from(""),
            Line::from(Span::styled(
                "Tag Actions",
                Style::default().fg(Color::Yellow).bold(),
            )),
            Line::from(""),
            Line::from("  e / Enter      Edit selected tag"),
            Line::from("  r              Refresh tag list"),
            Line::from(""),
            Line::from(Span::styled(
                "Tag Editing",
                Style::default().fg(Color::Yellow).bold(),
            )),
            Line::from(""),
            Line::from("  Tab            Next field"),
            Line::from("  Shift+Tab      Previous field"),
            Line::from("  Space          Open color picker (on color field)"),
            Line::from("  Enter          Save tag"),
            Line::from("  Esc            Cancel"),
            Line::from(""),
            Line::from(Span::styled(
                "General",
                Style::default().fg(Color::Yellow).bold(),
            )),
            Line::from(""),
            Line::from("  ?              Toggle this help screen"),
            Line::from("  q              Quit application"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(block)
            .style(Style::default().fg(TEXT_FG));

        f.render_widget(paragraph, popup_area);
    }
}
