use ratatui::layout::Rect;

use telecue_core::config::{Alignment, DisplayConfig, MAX_FRAME_PADDING, MAX_LINE_SPACING};

use crate::scroll::{LayoutMetrics, LayoutProvider};

/// Wrapped script text inside the prompter frame
///
/// Terminal rows map onto position units through `units_per_row`, so the
/// scroll engine sees the same kind of extents a pixel surface would
/// report. Wrapping is redone whenever the text, the viewport or a display
/// setting changes; [`LayoutProvider::measure`] only reads the cache.
#[derive(Debug, Clone)]
pub struct TextLayout {
    text: String,
    display: DisplayConfig,
    /// Size of the prompter area before padding
    viewport: (u16, u16),
    rows: Vec<String>,
}

impl TextLayout {
    pub fn new(text: impl Into<String>, display: DisplayConfig) -> Self {
        let mut layout = Self {
            text: text.into(),
            display: display.sanitized(),
            viewport: (0, 0),
            rows: Vec::new(),
        };
        layout.rewrap();
        layout
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    /// Wrapped rows, without spacing rows
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        if self.viewport != (width, height) {
            self.viewport = (width, height);
            self.rewrap();
        }
    }

    /// Returns the padding actually applied
    pub fn set_frame_padding(&mut self, padding: u16) -> u16 {
        self.display.frame_padding = padding.min(MAX_FRAME_PADDING);
        self.rewrap();
        self.display.frame_padding
    }

    pub fn set_line_spacing(&mut self, spacing: u16) -> u16 {
        self.display.line_spacing = spacing.min(MAX_LINE_SPACING);
        self.display.line_spacing
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.display.alignment = alignment;
    }

    /// Terminal rows taken by one wrapped row including its spacing
    #[inline]
    pub fn row_stride(&self) -> u16 {
        1 + self.display.line_spacing
    }

    /// Area the text is drawn into once the frame padding is removed
    pub fn text_area(&self, area: Rect) -> Rect {
        let (width, height) = padded_size(area.width, area.height, self.display.frame_padding);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }

    fn rewrap(&mut self) {
        let (width, _) = padded_size(self.viewport.0, self.viewport.1, self.display.frame_padding);
        self.rows = wrap_text(&self.text, width as usize);
    }
}

impl LayoutProvider for TextLayout {
    fn measure(&self) -> LayoutMetrics {
        let (_, visible_rows) =
            padded_size(self.viewport.0, self.viewport.1, self.display.frame_padding);
        let unit = self.display.units_per_row;
        let content_rows = self.rows.len() as f64 * f64::from(self.row_stride());
        LayoutMetrics::new(f64::from(visible_rows) * unit, content_rows * unit)
    }
}

/// Width and height left after padding. Vertical padding is half the
/// horizontal one since terminal cells are roughly twice as tall as wide.
fn padded_size(width: u16, height: u16, padding: u16) -> (u16, u16) {
    let horizontal = padding.min(width.saturating_sub(1) / 2);
    let vertical = (padding / 2).min(height.saturating_sub(1) / 2);
    (
        width.saturating_sub(horizontal * 2),
        height.saturating_sub(vertical * 2),
    )
}

/// Soft-wrap every paragraph to `width` columns. Blank lines are kept.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return text.lines().map(str::to_string).collect();
    }

    let mut rows = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            rows.push(String::new());
            continue;
        }
        rows.extend(textwrap::wrap(line, width).into_iter().map(|piece| piece.into_owned()));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display() -> DisplayConfig {
        DisplayConfig {
            units_per_row: 10.0,
            line_spacing: 0,
            frame_padding: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_measure_uses_rows_and_units() {
        let mut layout = TextLayout::new("one\ntwo\nthree", display());
        layout.set_viewport(40, 20);
        let metrics = layout.measure();
        assert_eq!(metrics.container_extent, 200.0);
        assert_eq!(metrics.content_extent, 30.0);
    }

    #[test]
    fn test_line_spacing_scales_content() {
        let mut layout = TextLayout::new("one\ntwo", display());
        layout.set_viewport(40, 20);
        layout.set_line_spacing(2);
        assert_eq!(layout.row_stride(), 3);
        assert_eq!(layout.measure().content_extent, 60.0);
        assert_eq!(layout.set_line_spacing(99), MAX_LINE_SPACING);
    }

    #[test]
    fn test_wraps_to_padded_width() {
        let mut layout = TextLayout::new("aaaa bbbb cccc", display());
        layout.set_viewport(14, 10);
        assert_eq!(layout.rows().len(), 1);

        layout.set_frame_padding(3);
        // 14 - 2*3 = 8 columns
        assert_eq!(layout.rows(), &["aaaa", "bbbb", "cccc"]);
    }

    #[test]
    fn test_blank_lines_are_rows() {
        let mut layout = TextLayout::new("a\n\nb", display());
        layout.set_viewport(10, 10);
        assert_eq!(layout.rows().len(), 3);
        assert_eq!(layout.rows()[1], "");
    }

    #[test]
    fn test_unsized_viewport_is_degenerate() {
        let layout = TextLayout::new("hello", display());
        assert!(layout.measure().is_degenerate());
    }

    #[test]
    fn test_empty_text_has_no_content() {
        let mut layout = TextLayout::new("", display());
        layout.set_viewport(10, 10);
        assert_eq!(layout.measure().content_extent, 0.0);
    }

    #[test]
    fn test_text_area_is_centered() {
        let layout = TextLayout::new(
            "x",
            DisplayConfig {
                frame_padding: 4,
                ..display()
            },
        );
        let area = layout.text_area(Rect::new(0, 0, 40, 20));
        assert_eq!(area, Rect::new(4, 2, 32, 16));
    }

    #[test]
    fn test_padding_never_swallows_area() {
        assert_eq!(padded_size(3, 3, 40), (1, 1));
        assert_eq!(padded_size(0, 0, 4), (0, 0));
    }
}
