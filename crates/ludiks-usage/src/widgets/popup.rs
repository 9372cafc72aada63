use ludiks_billing::format::{format_amount, format_events, format_rate};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::AppState;

pub struct PopupWidget;

impl PopupWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let popup_area = centered_rect(70, 70, area);

        frame.render_widget(Clear, popup_area);

        let breakdown_text = Self::create_breakdown_text(state);

        let popup = Paragraph::new(breakdown_text)
            .block(
                Block::bordered()
                    .title("Cost Breakdown")
                    .title_alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Cyan)),
            )
            .alignment(Alignment::Left);

        frame.render_widget(popup, popup_area);
    }

    fn create_breakdown_text(state: &AppState) -> Vec<Line<'static>> {
        let summary = state.summary();
        let currency = state.currency().to_string();
        let estimator = state.billing.estimator();

        let mut text = vec![
            Line::from(vec![
                Span::styled("Billable Events: ", Style::default().fg(Color::White)),
                Span::styled(
                    format_events(estimator.billable_events(summary.events_used())),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(" "),
        ];

        if summary.breakdown().is_empty() {
            text.push(Line::from(Span::styled(
                "Usage is within the free allowance.",
                Style::default().fg(Color::Green),
            )));
        }

        for charge in summary.breakdown() {
            text.push(Line::from(vec![
                Span::styled(
                    format!("  {:<22}", charge.tier().label()),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!(
                        "{:>12} x {:<18}",
                        format_events(charge.events()),
                        format_rate(charge.tier().price_per_event(), &currency)
                    ),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format_amount(charge.subtotal(), &currency),
                    Style::default().fg(Color::Green),
                ),
            ]));
        }

        let minimum_applied = summary.charged_amount() > summary.estimated_cost();

        text.extend(vec![
            Line::from(" "),
            Line::from(vec![
                Span::styled("Estimate: ", Style::default().fg(Color::White)),
                Span::styled(
                    format_amount(summary.estimated_cost(), &currency),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(vec![
                Span::styled("Amount Due: ", Style::default().fg(Color::White)),
                Span::styled(
                    format_amount(summary.charged_amount(), &currency),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    if minimum_applied {
                        " (minimum billing amount)"
                    } else {
                        ""
                    },
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(" "),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "d",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to close", Style::default().fg(Color::Gray)),
            ]),
        ]);

        text
    }
}
