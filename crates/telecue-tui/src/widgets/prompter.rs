use ratatui::{
    layout::{Alignment as TextAlignment, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Paragraph},
    Frame,
};

use telecue_core::Alignment;

use crate::app::{App, Mode};
use crate::layout::TextLayout;

pub struct PrompterWidget;

impl PrompterWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let style = Style::default()
            .fg(app.theme.text)
            .bg(app.theme.background);
        frame.render_widget(Block::default().style(style), area);

        let layout = app.engine.layout();
        let text_area = layout.text_area(area);

        // Offset of the content top in terminal rows; the preview starts at the top
        let shift = match app.mode {
            Mode::Ready => 0,
            Mode::Presenting => {
                (app.engine.offset() / layout.display().units_per_row).floor() as i64
            }
        };

        let lines = visible_lines(layout, text_area.height, shift);
        let paragraph = Paragraph::new(lines)
            .alignment(text_alignment(layout.display().alignment))
            .style(style);
        frame.render_widget(paragraph, text_area);
    }
}

/// Lines for each screen row of a text area `height` rows tall, with the
/// first content row `shift` rows below its top
fn visible_lines(layout: &TextLayout, height: u16, shift: i64) -> Vec<Line<'static>> {
    let stride = i64::from(layout.row_stride());
    let rows = layout.rows();

    (0..i64::from(height))
        .map(|y| {
            let content_row = y - shift;
            if content_row < 0 || content_row % stride != 0 {
                return Line::default();
            }
            usize::try_from(content_row / stride)
                .ok()
                .and_then(|index| rows.get(index))
                .map(|row| Line::from(row.clone()))
                .unwrap_or_default()
        })
        .collect()
}

fn text_alignment(alignment: Alignment) -> TextAlignment {
    match alignment {
        Alignment::Left => TextAlignment::Left,
        Alignment::Center => TextAlignment::Center,
        Alignment::Right => TextAlignment::Right,
    }
}
