use ratatui::style::Color;

// ============================================================================
// Background Colors
// ============================================================================

/// Main background color for most UI elements
pub const NORMAL_BG: Color = Color::Rgb(19, 19, 19);

/// Alternate background color for visual variety
pub const ALT_BG: Color = Color::Rgb(25, 25, 25);

/// Background color for selected items and header
pub const SELECTED_BG: Color = Color::Rgb(36, 36, 36);

// ============================================================================
// Text/Foreground Colors
// ============================================================================

/// Standard text color
pub const TEXT_FG: Color = Color::Rgb(200, 200, 200);

/// Header text color
pub const HEADER_FG: Color = Color::Rgb(200, 200, 200);

/// White text for high contrast
pub const TEXT_WHITE: Color = Color::White;

/// Dimmed text for secondary information
pub const TEXT_DIM: Color = Color::Rgb(120, 120, 120);

// ============================================================================
// Border Colors
// ============================================================================

/// Normal border color
pub const BORDER_NORMAL: Color = Color::Rgb(116, 116, 116);

/// Border color for the focused field/pane
pub const BORDER_FOCUSED: Color = Color::Rgb(165, 165, 165);

/// Border color for the edit modal (blue accent)
pub const BORDER_EDIT: Color = Color::Blue;

// ============================================================================
// Semantic Colors
// ============================================================================

/// Swatch color for tags without an assigned color
pub const SWATCH_NONE: Color = Color::Gray;

// ============================================================================
// Accent Colors
// ============================================================================

/// Yellow accent for labels and the active input
pub const ACCENT_YELLOW: Color = Color::Yellow;

/// Green accent for success/confirmation
pub const ACCENT_GREEN: Color = Color::Green;

/// Red accent for errors/cancellation
pub const ACCENT_RED: Color = Color::Red;

/// Parse a `#rrggbb` string into its channels
pub fn parse_hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Parse a `#rrggbb` string into a terminal color, falling back to the
/// neutral swatch for missing or malformed values
pub fn tag_swatch_color(hex: Option<&str>) -> Color {
    hex.and_then(parse_hex_rgb)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(SWATCH_NONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_rgb() {
        assert_eq!(parse_hex_rgb("#ff0000"), Some((255, 0, 0)));
        assert_eq!(parse_hex_rgb("#00FF7f"), Some((0, 255, 127)));
        assert_eq!(parse_hex_rgb("ff0000"), None);
        assert_eq!(parse_hex_rgb("#ff00"), None);
        assert_eq!(parse_hex_rgb("#zzzzzz"), None);
    }

    #[test]
    fn test_tag_swatch_color() {
        assert_eq!(
            tag_swatch_color(Some("#102030")),
            Color::Rgb(0x10, 0x20, 0x30)
        );
        assert_eq!(tag_swatch_color(None), SWATCH_NONE);
        assert_eq!(tag_swatch_color(Some("garbage")), SWATCH_NONE);
    }
}
