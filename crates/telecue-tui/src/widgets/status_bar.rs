use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Mode};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let bar = Style::default().fg(theme.bar_fg).bg(theme.bar_bg);

        let (mode_str, mode_style) = match app.mode {
            Mode::Ready => (" READY ", bar.fg(theme.muted)),
            Mode::Presenting if app.engine.is_playing() => (" LIVE ", bar.fg(theme.accent)),
            Mode::Presenting => (" PAUSED ", bar.fg(theme.warning)),
        };

        let status_text = if let Some(msg) = app.status_message() {
            format!(" {}", msg)
        } else {
            let mut text = format!(
                " {} | {:.1}x | {}",
                app.script.title(),
                app.engine.speed(),
                app.engine.direction().label()
            );
            if let Some(percent) = app.progress_percent() {
                text.push_str(&format!(" | {}%", percent));
            }
            text
        };

        let help_hint = match app.mode {
            Mode::Ready => " space:present q:quit ",
            Mode::Presenting => " space:pause \u{2191}/\u{2193}:nudge +/-:speed d:dir esc:exit ",
        };

        let used = mode_str.width() + status_text.width() + help_hint.width();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(mode_str, mode_style.add_modifier(Modifier::BOLD)),
            Span::styled(status_text, bar),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(theme.muted)),
        ]);

        frame.render_widget(Paragraph::new(line).style(bar), area);
    }
}
