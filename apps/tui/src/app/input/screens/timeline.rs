use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_timeline_input(app: &mut App, key: KeyCode) {
    if key == KeyCode::Char('m') {
        app.timeline_metric = app.timeline_metric.next();
    }
}
