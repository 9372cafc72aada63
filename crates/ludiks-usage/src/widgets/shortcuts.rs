use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::AppState;

pub struct ShortcutsWidget;

impl ShortcutsWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let key_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(Color::Gray);

        let mut spans = vec![
            Span::styled("Press ", text_style),
            Span::styled("q", key_style),
            Span::styled(" to quit, ", text_style),
            Span::styled("r", key_style),
            Span::styled(" to reload, ", text_style),
            Span::styled("d", key_style),
            Span::styled(" for cost breakdown", text_style),
        ];

        if state.banner().is_some() {
            spans.push(Span::styled(", ", text_style));
            spans.push(Span::styled("x", key_style));
            spans.push(Span::styled(" to dismiss the quota banner", text_style));
        }

        let shortcuts = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);

        frame.render_widget(shortcuts, area);
    }
}
