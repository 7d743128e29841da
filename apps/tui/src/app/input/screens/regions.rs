use crate::app::input::helpers::step_down;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_regions_input(app: &mut App, key: KeyCode) {
    let total_rows = app.regions().data.map_or(0, |regions| regions.len());

    match key {
        KeyCode::Char('s') => {
            app.regions_table.sort = app.regions_table.sort.next();
            app.regions_table.selected = 0;
        }
        KeyCode::Char('d') => {
            app.regions_table.descending = !app.regions_table.descending;
        }
        KeyCode::Up => {
            app.regions_table.selected = app.regions_table.selected.saturating_sub(1);
        }
        KeyCode::Down => {
            app.regions_table.selected = step_down(app.regions_table.selected, 1, total_rows);
        }
        KeyCode::Home => app.regions_table.selected = 0,
        KeyCode::End => app.regions_table.selected = total_rows.saturating_sub(1),
        _ => {}
    }
}
