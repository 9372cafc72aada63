//! TUI widget modules

pub mod banner;
pub mod header;
pub mod popup;
pub mod progress_bars;
pub mod rate_card;
pub mod shortcuts;
pub mod statistics;

pub use banner::*;
pub use header::*;
pub use popup::*;
pub use progress_bars::*;
pub use rate_card::*;
pub use shortcuts::*;
pub use statistics::*;

use ludiks_billing::QuotaLevel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
};

pub(crate) fn level_color(level: QuotaLevel) -> Color {
    match level {
        QuotaLevel::Unlimited => Color::Blue,
        QuotaLevel::Normal => Color::Green,
        QuotaLevel::Warning => Color::Yellow,
        QuotaLevel::Exceeded => Color::Red,
    }
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
