use crate::app::filter_panel::{FacetPicker, FilterField, PanelEdit};
use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use conflict_explorer::fetch::LookupStatus;
use crossterm::event::KeyCode;

pub fn handle_panel_input(app: &mut App, key: KeyCode) {
    let len = FilterField::ALL.len();
    match key {
        KeyCode::Esc => app.filter_panel.focused = false,
        KeyCode::Up => {
            app.filter_panel.selected = wrap_decrement(app.filter_panel.selected, len);
        }
        KeyCode::Down => {
            app.filter_panel.selected = wrap_increment(app.filter_panel.selected, len);
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            let filters = app.current_filters();
            let patch = app.filter_panel.field().cleared(&filters, app.filters.today());
            app.apply_patch(patch);
        }
        KeyCode::Enter => begin_edit(app),
        _ => {}
    }
}

fn begin_edit(app: &mut App) {
    let filters = app.current_filters();
    if let Some(patch) = app.filter_panel.cycle(&filters) {
        app.apply_patch(patch);
        return;
    }

    match app.filter_panel.begin_edit(&filters) {
        Some(PanelEdit::Text(entry)) => app.filter_panel.text = Some(entry),
        Some(PanelEdit::Picker(field)) => {
            let Some(lookups) = app.lookups.get() else {
                app.status_message = match app.lookups.status() {
                    LookupStatus::Failed(_) => {
                        "Filter options failed to load (L to retry)".to_string()
                    }
                    _ => "Filter options are still loading".to_string(),
                };
                return;
            };
            app.filter_panel.picker = FacetPicker::open(field, &filters, &lookups);
        }
        None => {}
    }
}

pub fn handle_edit_input(app: &mut App, key: KeyCode) {
    if app.filter_panel.picker.is_some() {
        handle_picker_input(app, key);
    } else {
        handle_text_input(app, key);
    }
}

fn handle_picker_input(app: &mut App, key: KeyCode) {
    let Some(picker) = app.filter_panel.picker.as_mut() else {
        return;
    };

    match key {
        KeyCode::Esc => app.filter_panel.picker = None,
        KeyCode::Enter => {
            let patch = picker.patch();
            app.filter_panel.picker = None;
            app.apply_patch(patch);
        }
        KeyCode::Up => {
            picker.cursor = wrap_decrement(picker.cursor, picker.visible().len());
        }
        KeyCode::Down => {
            picker.cursor = wrap_increment(picker.cursor, picker.visible().len());
        }
        KeyCode::Char(' ') => picker.toggle_current(),
        KeyCode::Char(ch) => picker.push_query(ch),
        KeyCode::Backspace => picker.pop_query(),
        _ => {}
    }
}

fn handle_text_input(app: &mut App, key: KeyCode) {
    let filters = app.current_filters();
    let Some(entry) = app.filter_panel.text.as_mut() else {
        return;
    };

    match key {
        KeyCode::Esc => app.filter_panel.text = None,
        KeyCode::Enter => {
            match entry.patch(&filters) {
                Ok(patch) => {
                    app.filter_panel.text = None;
                    app.apply_patch(patch);
                }
                Err(message) => app.status_message = message,
            }
        }
        KeyCode::Backspace => {
            entry.buffer.pop();
        }
        KeyCode::Char(ch) => entry.buffer.push(ch),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::AppActions;
    use chrono::NaiveDate;
    use conflict_explorer::api::DataSource;
    use conflict_explorer::config::AnalyticsEmbed;
    use conflict_explorer::fetch::FetchConfig;
    use conflict_explorer::filters::{FilterState, FilterStore, Location};
    use std::sync::Arc;
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn app() -> App {
        let location = Arc::new(Location::new());
        let store = FilterStore::new(FilterState::default_for(today()), location.clone())
            .with_clock(today);
        let actions = AppActions::new(
            DataSource::Demo {
                reason: "test".into(),
            },
            FetchConfig::default(),
        );
        let mut app = App::new(actions, AnalyticsEmbed::default(), store, location);
        app.filter_panel.focused = true;
        app
    }

    fn select(app: &mut App, field: FilterField) {
        app.filter_panel.selected = FilterField::ALL
            .iter()
            .position(|candidate| *candidate == field)
            .unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            handle_edit_input(app, KeyCode::Char(ch));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn typed_min_deaths_updates_filters() {
        let mut app = app();
        select(&mut app, FilterField::MinDeaths);
        handle_panel_input(&mut app, KeyCode::Enter);
        type_text(&mut app, "12");
        handle_edit_input(&mut app, KeyCode::Enter);

        assert!(app.filter_panel.text.is_none());
        assert_eq!(app.current_filters().deaths.min(), Some(12));
        assert!(app.location.current().contains("minDeaths=12"));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_date_keeps_entry_open() {
        let mut app = app();
        select(&mut app, FilterField::From);
        handle_panel_input(&mut app, KeyCode::Enter);
        for _ in 0..10 {
            handle_edit_input(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "2024-02-30");
        handle_edit_input(&mut app, KeyCode::Enter);

        assert!(app.filter_panel.text.is_some());
        assert!(app.status_message.contains("invalid date '2024-02-30'"));
    }

    #[tokio::test(start_paused = true)]
    async fn picker_applies_chosen_countries() {
        let mut app = app();
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.update();

        select(&mut app, FilterField::Countries);
        handle_panel_input(&mut app, KeyCode::Enter);
        type_text(&mut app, "B");
        handle_edit_input(&mut app, KeyCode::Char(' '));
        handle_edit_input(&mut app, KeyCode::Enter);

        assert!(app.filter_panel.picker.is_none());
        assert!(app.current_filters().countries.contains("Demo Country B"));
    }

    #[tokio::test(start_paused = true)]
    async fn civilians_cycle_and_clear() {
        let mut app = app();
        select(&mut app, FilterField::HasCivilians);
        handle_panel_input(&mut app, KeyCode::Enter);
        assert_eq!(app.current_filters().has_civilians, Some(true));

        handle_panel_input(&mut app, KeyCode::Char('x'));
        assert_eq!(app.current_filters().has_civilians, None);
    }
}
