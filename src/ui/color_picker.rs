use ratatui::style::Color;

use crate::ui::colors::parse_hex_rgb;

/// RGB channel currently under adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    #[default]
    Red,
    Green,
    Blue,
}

/// Swatch-picker state. The preview channels change freely while the
/// picker is open; nothing leaves this struct until the caller reads
/// `selected_hex` on an explicit commit.
#[derive(Debug, Clone, Default)]
pub struct ColorPickerState {
    pub open: bool,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub channel: Channel,
}

impl ColorPickerState {
    /// Seed the preview from a committed value. Malformed or missing
    /// values start the preview at white.
    pub fn reset_to(&mut self, committed: Option<&str>) {
        let (r, g, b) = committed.and_then(parse_hex_rgb).unwrap_or((255, 255, 255));
        self.r = r;
        self.g = g;
        self.b = b;
        self.channel = Channel::Red;
    }

    pub fn open_with(&mut self, committed: Option<&str>) {
        self.reset_to(committed);
        self.open = true;
    }

    /// Close the picker. The preview channels are deliberately kept so a
    /// reopened picker resumes where the user left off.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Lowercase `#rrggbb` for the current preview
    pub fn selected_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn preview_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    pub fn next_channel(&mut self) {
        self.channel = match self.channel {
            Channel::Red => Channel::Green,
            Channel::Green => Channel::Blue,
            Channel::Blue => Channel::Red,
        };
    }

    pub fn previous_channel(&mut self) {
        self.channel = match self.channel {
            Channel::Red => Channel::Blue,
            Channel::Green => Channel::Red,
            Channel::Blue => Channel::Green,
        };
    }

    pub fn increase(&mut self, amount: u8) {
        let value = self.channel_value_mut();
        *value = value.saturating_add(amount);
    }

    pub fn decrease(&mut self, amount: u8) {
        let value = self.channel_value_mut();
        *value = value.saturating_sub(amount);
    }

    pub fn channel_value(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    fn channel_value_mut(&mut self) -> &mut u8 {
        match self.channel {
            Channel::Red => &mut self.r,
            Channel::Green => &mut self.g,
            Channel::Blue => &mut self.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_from_committed_value() {
        let mut picker = ColorPickerState::default();
        picker.open_with(Some("#102030"));
        assert!(picker.open);
        assert_eq!((picker.r, picker.g, picker.b), (0x10, 0x20, 0x30));
        assert_eq!(picker.selected_hex(), "#102030");
    }

    #[test]
    fn test_seed_defaults_to_white() {
        let mut picker = ColorPickerState::default();
        picker.open_with(None);
        assert_eq!(picker.selected_hex(), "#ffffff");

        picker.open_with(Some("not-a-color"));
        assert_eq!(picker.selected_hex(), "#ffffff");
    }

    #[test]
    fn test_adjust_saturates_at_bounds() {
        let mut picker = ColorPickerState::default();
        picker.open_with(Some("#f80000"));

        picker.increase(8);
        assert_eq!(picker.r, 255);
        picker.increase(8);
        assert_eq!(picker.r, 255);

        picker.next_channel();
        picker.decrease(8);
        assert_eq!(picker.g, 0);
    }

    #[test]
    fn test_channel_cycle() {
        let mut picker = ColorPickerState::default();
        assert_eq!(picker.channel, Channel::Red);
        picker.next_channel();
        assert_eq!(picker.channel, Channel::Green);
        picker.next_channel();
        assert_eq!(picker.channel, Channel::Blue);
        picker.next_channel();
        assert_eq!(picker.channel, Channel::Red);
        picker.previous_channel();
        assert_eq!(picker.channel, Channel::Blue);
    }

    #[test]
    fn test_close_keeps_preview() {
        let mut picker = ColorPickerState::default();
        picker.open_with(Some("#000000"));
        picker.increase(8);
        picker.close();
        assert!(!picker.open);
        assert_eq!(picker.r, 8);
    }
}
