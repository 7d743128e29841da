use crate::app::input::helpers::step_down;
use crate::app::state::App;
use conflict_explorer::bus::ViewMessage;
use crossterm::event::KeyCode;

const PAGE_JUMP: usize = 5;

pub fn handle_events_input(app: &mut App, key: KeyCode) {
    let page = app.events().data;
    let visible: Vec<String> = page.as_deref().map_or_else(Vec::new, |page| {
        app.table
            .rows(page)
            .iter()
            .map(|event| event.id.clone())
            .collect()
    });
    let total_rows = visible.len();
    let total_pages = page.as_deref().map_or(1, |page| page.total_pages().max(1));

    match key {
        KeyCode::Esc => {
            app.table.search.clear();
            app.table.selected = 0;
        }
        KeyCode::Enter => {
            if let Some(id) = visible.get(app.table.selected) {
                app.bus.publish(ViewMessage::ShowEvent(id.clone()));
            }
        }
        KeyCode::Char('/') => {
            app.table.searching = true;
        }
        KeyCode::Char('s') => {
            let next = app.table.sort.next();
            app.table.sort_by(next);
        }
        KeyCode::Char('d') => {
            let current = app.table.sort;
            app.table.sort_by(current);
        }
        KeyCode::Left => {
            let previous = app.table.page.saturating_sub(1);
            app.set_events_page(previous);
        }
        KeyCode::Right => {
            if app.table.page < total_pages {
                let next = app.table.page + 1;
                app.set_events_page(next);
            }
        }
        KeyCode::Up => {
            app.table.selected = app.table.selected.saturating_sub(1);
        }
        KeyCode::Down => app.table.selected = step_down(app.table.selected, 1, total_rows),
        KeyCode::PageUp => {
            app.table.selected = app.table.selected.saturating_sub(PAGE_JUMP);
        }
        KeyCode::PageDown => {
            app.table.selected = step_down(app.table.selected, PAGE_JUMP, total_rows);
        }
        KeyCode::Home => app.table.selected = 0,
        KeyCode::End => app.table.selected = total_rows.saturating_sub(1),
        _ => {}
    }
}

pub fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.table.search.clear();
            app.table.searching = false;
        }
        KeyCode::Enter => {
            app.table.searching = false;
        }
        KeyCode::Backspace => {
            app.table.search.pop();
        }
        KeyCode::Char(ch) => {
            app.table.search.push(ch);
        }
        _ => return,
    }
    app.table.selected = 0;
}
