use ratatui::style::Color;
use tracing::warn;

use telecue_core::DisplayConfig;

/// Runtime colors for the prompter and its status bar
#[derive(Debug, Clone)]
pub struct Theme {
    // Prompter colors, from the display settings
    pub text: Color,
    pub background: Color,

    // Status bar colors
    pub bar_bg: Color,
    pub bar_fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(0xff, 0xff, 0xff),
            background: Color::Rgb(0x00, 0x00, 0x00),
            // Gruvbox Material chrome
            bar_bg: Color::Rgb(0x45, 0x40, 0x3d),
            bar_fg: Color::Rgb(0xd4, 0xbe, 0x98),
            muted: Color::Rgb(0xa8, 0x99, 0x84),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            warning: Color::Rgb(0xe7, 0x8a, 0x4e),
        }
    }
}

impl Theme {
    /// Build a theme from the display settings, keeping defaults for
    /// colors that fail to parse
    pub fn from_display(display: &DisplayConfig) -> Self {
        let defaults = Self::default();
        Self {
            text: color_or(&display.text_color, defaults.text),
            background: color_or(&display.background_color, defaults.background),
            ..defaults
        }
    }
}

fn color_or(value: &str, fallback: Color) -> Color {
    parse_hex_color(value).unwrap_or_else(|| {
        warn!("Invalid color '{}', using default", value);
        fallback
    })
}

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        // Short form: RGB -> RRGGBB
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        // Full form: RRGGBB
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_from_display_falls_back() {
        let display = DisplayConfig {
            text_color: "#ffff00".to_string(),
            background_color: "navy".to_string(),
            ..Default::default()
        };
        let theme = Theme::from_display(&display);
        assert_eq!(theme.text, Color::Rgb(255, 255, 0));
        assert_eq!(theme.background, Theme::default().background);
    }
}
