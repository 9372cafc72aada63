use ludiks_billing::format::{format_amount, format_events};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::AppState;

pub struct StatisticsWidget;

impl StatisticsWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let summary = state.summary();
        let quota = summary.quota();
        let currency = state.currency();

        let quota_text = if quota.is_unlimited() {
            " / unlimited".to_string()
        } else {
            format!(
                " / {} ({} left)",
                format_events(quota.events_quota()),
                format_events(quota.remaining().unwrap_or(0))
            )
        };

        let mut stats_text = vec![
            Line::from(vec![
                Span::styled("Data Status: ", Style::default().fg(Color::White)),
                Span::styled(
                    if state.data_loaded {
                        "Loaded".to_string()
                    } else if state.is_loading {
                        "Loading...".to_string()
                    } else {
                        "No data".to_string()
                    },
                    Style::default()
                        .fg(if state.data_loaded {
                            Color::Green
                        } else {
                            Color::Red
                        })
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Events: ", Style::default().fg(Color::White)),
                Span::styled(
                    format_events(summary.events_used()),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(quota_text, Style::default().fg(Color::Gray)),
            ]),
            Line::from(vec![
                Span::styled("Estimated Cost: ", Style::default().fg(Color::White)),
                Span::styled(
                    format_amount(summary.estimated_cost(), currency),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(vec![
                Span::styled("Amount Due: ", Style::default().fg(Color::White)),
                Span::styled(
                    format_amount(summary.charged_amount(), currency),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if let Some(error) = &state.error_message {
            stats_text.push(Line::from(vec![
                Span::styled("Error: ", Style::default().fg(Color::Red)),
                Span::styled(
                    error.chars().take(60).collect::<String>()
                        + if error.chars().count() > 60 { "..." } else { "" },
                    Style::default().fg(Color::Red),
                ),
            ]));
        } else {
            stats_text.push(Line::from(vec![
                Span::styled("Last Update: ", Style::default().fg(Color::White)),
                Span::styled(
                    state.last_update.format("%H:%M:%S UTC").to_string(),
                    Style::default().fg(Color::Cyan),
                ),
            ]));
        }

        let stats = Paragraph::new(stats_text)
            .block(Block::bordered().title("Statistics"))
            .alignment(Alignment::Left);

        frame.render_widget(stats, area);
    }
}
