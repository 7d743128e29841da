use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod analytics;
mod details;
mod events;
mod explore;
pub mod filters;
mod help;
mod regions;
mod timeline;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    // Text entry owns the keyboard until it is confirmed or cancelled.
    if app.filter_panel.is_editing() {
        filters::handle_edit_input(app, key);
        return;
    }
    if app.screen == AppScreen::Events && app.table.searching {
        events::handle_search_input(app, key);
        return;
    }

    if handle_global_input(app, key) {
        return;
    }

    if app.filter_panel.focused {
        filters::handle_panel_input(app, key);
        return;
    }

    match app.screen {
        AppScreen::Explore => explore::handle_explore_input(app, key),
        AppScreen::Events => events::handle_events_input(app, key),
        AppScreen::Timeline => timeline::handle_timeline_input(app, key),
        AppScreen::Regions => regions::handle_regions_input(app, key),
        AppScreen::Analytics => analytics::handle_analytics_input(app, key),
        AppScreen::EventDetails => details::handle_details_input(app, key),
    }
}

fn handle_global_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.previous_tab(),
        KeyCode::Char(digit @ '1'..='5') => {
            let index = digit as usize - '1' as usize;
            if let Some(screen) = AppScreen::from_index(index) {
                app.enter_screen(screen);
            }
        }
        KeyCode::Char('f') => {
            app.filter_panel.visible = true;
            app.filter_panel.focused = !app.filter_panel.focused;
        }
        KeyCode::Char('F') => {
            app.filter_panel.visible = !app.filter_panel.visible;
            if !app.filter_panel.visible {
                app.filter_panel.focused = false;
            }
        }
        KeyCode::Char('R') => app.reset_filters(),
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('L') => app.retry_lookups(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::AppActions;
    use chrono::NaiveDate;
    use conflict_explorer::api::DataSource;
    use conflict_explorer::config::AnalyticsEmbed;
    use conflict_explorer::fetch::FetchConfig;
    use conflict_explorer::filters::{DateRange, FilterPatch, FilterState, FilterStore, Location};
    use std::sync::Arc;

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
        App::new(actions, AnalyticsEmbed::default(), store, location)
    }

    #[tokio::test(start_paused = true)]
    async fn digits_jump_to_tabs() {
        let mut app = app();
        dispatch_input(&mut app, KeyCode::Char('4'));
        assert_eq!(app.screen, AppScreen::Regions);
        dispatch_input(&mut app, KeyCode::Char('1'));
        assert_eq!(app.screen, AppScreen::Explore);
    }

    #[tokio::test(start_paused = true)]
    async fn help_swallows_other_keys() {
        let mut app = app();
        dispatch_input(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(app.running);

        dispatch_input(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[tokio::test(start_paused = true)]
    async fn search_typing_does_not_quit() {
        let mut app = app();
        dispatch_input(&mut app, KeyCode::Char('2'));
        dispatch_input(&mut app, KeyCode::Char('/'));
        for ch in "iraq".chars() {
            dispatch_input(&mut app, KeyCode::Char(ch));
        }

        assert!(app.running);
        assert_eq!(app.table.search, "iraq");
    }

    #[tokio::test(start_paused = true)]
    async fn reset_key_restores_default_filters() {
        let mut app = app();
        app.apply_patch(FilterPatch::date_range(DateRange::ordered(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 31).unwrap(),
        )));
        app.apply_patch(FilterPatch::countries(["Demo Country A"]));
        assert!(app.location.current().contains("from=2023-01-01"));

        dispatch_input(&mut app, KeyCode::Char('R'));

        let filters = app.current_filters();
        assert!(filters.is_default_for(today()));
        assert_eq!(filters.date_range, DateRange::last_365_days(today()));
        assert!(app.location.current().contains("from=2023-06-16"));
        assert!(!app.location.current().contains("countries"));
    }

    #[tokio::test(start_paused = true)]
    async fn quit_key_stops_the_app() {
        let mut app = app();
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
