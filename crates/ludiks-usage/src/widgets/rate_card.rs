use ludiks_billing::format::{format_amount, format_events, format_rate};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::AppState;

pub struct RateCardWidget;

impl RateCardWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let config = state.billing.config();
        let currency = config.currency();
        let events_used = state.summary().events_used();
        let current_tier = config.tiers().tier_for(events_used).copied();

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Free allowance: ", Style::default().fg(Color::White)),
                Span::styled(
                    format!("{} events/month", format_events(config.free_tier_limit())),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled("   Minimum bill: ", Style::default().fg(Color::White)),
                Span::styled(
                    format_amount(config.min_billing_amount(), currency),
                    Style::default().fg(Color::Cyan),
                ),
            ]),
            Line::from(" "),
        ];

        for tier in config.tiers() {
            let is_current = current_tier.as_ref() == Some(tier);
            let style = if is_current {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if tier.is_free() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };

            lines.push(Line::from(vec![
                Span::styled(if is_current { "> " } else { "  " }, style),
                Span::styled(format!("{:<22}", tier.label()), style),
                Span::styled(format_rate(tier.price_per_event(), currency), style),
            ]));
        }

        let card = Paragraph::new(lines)
            .block(Block::bordered().title("Rate Card"))
            .alignment(Alignment::Left);

        frame.render_widget(card, area);
    }
}
