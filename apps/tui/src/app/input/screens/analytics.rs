use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use conflict_explorer::config::AnalyticsReport;
use crossterm::event::KeyCode;

pub fn handle_analytics_input(app: &mut App, key: KeyCode) {
    let len = AnalyticsReport::ALL.len();
    let index = AnalyticsReport::ALL
        .iter()
        .position(|report| *report == app.analytics_report)
        .unwrap_or(0);

    let next = match key {
        KeyCode::Left => wrap_decrement(index, len),
        KeyCode::Right => wrap_increment(index, len),
        _ => return,
    };
    if let Some(report) = AnalyticsReport::from_index(next) {
        app.analytics_report = report;
    }
}
