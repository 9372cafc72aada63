use ludiks_billing::format::{format_events, format_percentage};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Gauge},
    Frame,
};

use super::level_color;
use crate::AppState;

pub struct ProgressBarsWidget;

impl ProgressBarsWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let summary = state.summary();
        let quota = summary.quota();

        let (percent, label) = if quota.is_unlimited() {
            (0, "Unlimited".to_string())
        } else {
            (
                quota.display_percentage() as u16,
                format_percentage(quota.percentage()),
            )
        };

        let quota_gauge = Gauge::default()
            .block(Block::bordered().title("Event Quota"))
            .gauge_style(Style::default().fg(level_color(quota.level())))
            .percent(percent)
            .label(label);

        frame.render_widget(quota_gauge, chunks[0]);

        let free_limit = state.billing.config().free_tier_limit();
        let free_percentage = if free_limit == 0 {
            100.0
        } else {
            (summary.events_used() as f64 / free_limit as f64 * 100.0).min(100.0)
        };
        let free_gauge = Gauge::default()
            .block(Block::bordered().title(format!(
                "Free Allowance ({} events)",
                format_events(free_limit)
            )))
            .gauge_style(Style::default().fg(if free_percentage >= 100.0 {
                Color::Magenta
            } else {
                Color::Blue
            }))
            .percent(free_percentage as u16)
            .label(format_percentage(free_percentage));

        frame.render_widget(free_gauge, chunks[1]);
    }
}
