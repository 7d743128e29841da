// Rendering for every dashboard screen

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

/// Width of the filter sidebar, in columns.
const SIDEBAR_WIDTH: u16 = 38;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(f.area());

    screens::header::render_header(app, f, rows[0]);

    let body = if app.filter_panel.visible {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(rows[1]);
        screens::filters::render_filter_panel(app, f, columns[0]);
        columns[1]
    } else {
        rows[1]
    };

    match app.screen {
        AppScreen::Explore => screens::explore::render_explore(app, f, body),
        AppScreen::Events => screens::events::render_events(app, f, body),
        AppScreen::Timeline => screens::timeline::render_timeline(app, f, body),
        AppScreen::Regions => screens::regions::render_regions(app, f, body),
        AppScreen::Analytics => screens::analytics::render_analytics(app, f, body),
        AppScreen::EventDetails => screens::details::render_details(app, f, body),
    }

    widgets::status::render_status_line(app, f, rows[2]);

    if app.filter_panel.is_editing() {
        screens::filters::render_edit_popup(app, f);
    }
    if app.show_help {
        screens::help::render_help(f);
    }
}
