use ludiks_billing::BannerKind;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};

use crate::AppState;

pub struct BannerWidget;

impl BannerWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(banner) = state.banner() else {
            return;
        };

        let color = match banner.kind() {
            BannerKind::Warning => Color::Yellow,
            BannerKind::Exceeded => Color::Red,
        };

        let text = vec![
            Line::from(Span::styled(
                banner.message(),
                Style::default().fg(Color::White),
            )),
            Line::from(Span::styled(
                "Press x to dismiss",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(banner.title())
                    .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
            )
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, area);
    }
}
