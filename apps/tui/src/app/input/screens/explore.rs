use crate::app::state::App;
use conflict_explorer::bus::ViewMessage;
use crossterm::event::KeyCode;

const PAN_STEP: f64 = 0.1;

pub fn handle_explore_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('h') => {
            app.map.layer = app.map.layer.toggled();
        }
        KeyCode::Char('c') => {
            app.bus.publish(ViewMessage::ResetMapView);
        }
        KeyCode::Left => app.map.pan(-PAN_STEP, 0.0),
        KeyCode::Right => app.map.pan(PAN_STEP, 0.0),
        KeyCode::Up => app.map.pan(0.0, PAN_STEP),
        KeyCode::Down => app.map.pan(0.0, -PAN_STEP),
        KeyCode::Char('+' | '=') => app.map.zoom_in(),
        KeyCode::Char('-') => app.map.zoom_out(),
        _ => {}
    }
}
