use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_details_input(app: &mut App, key: KeyCode) {
    if matches!(key, KeyCode::Esc | KeyCode::Backspace) {
        app.go_back();
    }
}
