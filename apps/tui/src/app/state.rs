use std::sync::Arc;

use conflict_explorer::api::{ApiError, ConflictEvent, Lookups, Page, RegionAgg, SeriesTotals, TimePoint};
use conflict_explorer::bus::{ViewBus, ViewMessage};
use conflict_explorer::config::{AnalyticsEmbed, AnalyticsReport};
use conflict_explorer::fetch::{FetchOrchestrator, FetchResult, FetchStatus, LookupCache, LookupStatus};
use conflict_explorer::filters::{FilterPatch, FilterState, FilterStore, Location};
use conflict_explorer::stats::{window_filters, StatsSummary};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::broadcast::{self, error::TryRecvError};

use super::actions::{AppActions, EventsFeed, EventsQuery, ExploreData, FilterOrchestrator};
use super::filter_panel::FilterPanel;
use super::views::{EventsTable, MapViewport, RegionsTable, TimelineMetric};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Explore,
    Events,
    Timeline,
    Regions,
    Analytics,
    EventDetails,
}

impl AppScreen {
    /// Screens reachable from the tab bar, in order.
    pub const TABS: [Self; 5] = [
        Self::Explore,
        Self::Events,
        Self::Timeline,
        Self::Regions,
        Self::Analytics,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Explore => "Explore",
            Self::Events => "Events",
            Self::Timeline => "Timeline",
            Self::Regions => "Regions",
            Self::Analytics => "Analytics",
            Self::EventDetails => "Event details",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Explore),
            1 => Some(Self::Events),
            2 => Some(Self::Timeline),
            3 => Some(Self::Regions),
            4 => Some(Self::Analytics),
            _ => None,
        }
    }

    pub fn tab_index(self) -> Option<usize> {
        Self::TABS.iter().position(|tab| *tab == self)
    }
}

/// Fetch orchestrators for whichever views are on screen.
///
/// Dropping an orchestrator cancels its timer and any read in flight, so leaving a view is
/// just a matter of clearing its slot.
#[derive(Default)]
pub struct MountedViews {
    pub explore: Option<Arc<FilterOrchestrator<ExploreData>>>,
    pub stats: Option<FilterOrchestrator<SeriesTotals>>,
    pub events: Option<Arc<EventsFeed>>,
    pub timeline: Option<Arc<FilterOrchestrator<Vec<TimePoint>>>>,
    pub regions: Option<Arc<FilterOrchestrator<Vec<RegionAgg>>>>,
    pub details: Option<FetchOrchestrator<String, ConflictEvent>>,
}

pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub previous_screen: AppScreen,
    pub show_help: bool,
    pub status_message: String,
    pub filters: FilterStore,
    pub location: Arc<Location>,
    pub actions: AppActions,
    pub lookups: LookupCache<Lookups>,
    pub bus: ViewBus,
    bus_rx: broadcast::Receiver<ViewMessage>,
    pub analytics: AnalyticsEmbed,
    pub analytics_report: AnalyticsReport,
    pub views: MountedViews,
    pub map: MapViewport,
    pub table: EventsTable,
    pub regions_table: RegionsTable,
    pub timeline_metric: TimelineMetric,
    pub filter_panel: FilterPanel,
    pub throbber: ThrobberState,
}

impl App {
    /// Builds the app on the Explore screen and schedules its first reads.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn new(
        actions: AppActions,
        analytics: AnalyticsEmbed,
        filters: FilterStore,
        location: Arc<Location>,
    ) -> Self {
        let bus = ViewBus::new();
        let bus_rx = bus.subscribe();
        let lookups = actions.lookup_cache();

        let mut app = Self {
            running: true,
            screen: AppScreen::Explore,
            previous_screen: AppScreen::Explore,
            show_help: false,
            status_message: String::new(),
            filters,
            location,
            actions,
            lookups,
            bus,
            bus_rx,
            analytics,
            analytics_report: AnalyticsReport::Timeline,
            views: MountedViews::default(),
            map: MapViewport::default(),
            table: EventsTable::default(),
            regions_table: RegionsTable::default(),
            timeline_metric: TimelineMetric::default(),
            filter_panel: FilterPanel {
                visible: true,
                ..FilterPanel::default()
            },
            throbber: ThrobberState::default(),
        };
        app.mount(AppScreen::Explore);
        app.load_lookups();
        app
    }

    /// Reads the facet vocabulary in the background and announces when it settles.
    pub fn load_lookups(&self) {
        let lookups = self.lookups.clone();
        let bus = self.bus.clone();
        tokio::spawn(async move {
            if let Err(e) = lookups.load().await {
                tracing::warn!(error = %e, "lookup read failed");
            }
            bus.publish(ViewMessage::LookupsSettled);
        });
    }

    pub fn retry_lookups(&mut self) {
        if matches!(self.lookups.status(), LookupStatus::Failed(_)) {
            self.status_message = "Retrying filter options...".to_string();
            self.load_lookups();
        }
    }

    pub fn enter_screen(&mut self, next: AppScreen) {
        if next == self.screen {
            return;
        }
        tracing::debug!(from = self.screen.label(), to = next.label(), "screen change");

        if next == AppScreen::EventDetails {
            // Details open over the current view, which stays mounted underneath.
            self.previous_screen = self.screen;
            self.screen = next;
            return;
        }

        if self.screen == AppScreen::EventDetails {
            self.views.details = None;
            self.screen = self.previous_screen;
            if self.screen == next {
                return;
            }
        }

        self.unmount(self.screen);
        self.previous_screen = self.screen;
        self.screen = next;
        self.mount(next);
    }

    pub fn next_tab(&mut self) {
        let index = self.screen.tab_index().map_or(0, |index| index + 1);
        let next = AppScreen::TABS[index % AppScreen::TABS.len()];
        self.enter_screen(next);
    }

    pub fn previous_tab(&mut self) {
        let len = AppScreen::TABS.len();
        let index = self.screen.tab_index().map_or(0, |index| (index + len - 1) % len);
        self.enter_screen(AppScreen::TABS[index]);
    }

    /// Leaves the details view, or returns to the previous tab.
    pub fn go_back(&mut self) {
        let back = self.previous_screen;
        self.enter_screen(back);
    }

    fn mount(&mut self, screen: AppScreen) {
        let current = self.filters.get();
        match screen {
            AppScreen::Explore => {
                let explore = Arc::new(self.actions.explore());
                self.filters.subscribe(&explore);
                explore.schedule(Arc::clone(&current));
                self.views.explore = Some(explore);

                let stats = self.actions.stats_summary();
                stats.schedule(Arc::new(window_filters(self.filters.today())));
                self.views.stats = Some(stats);
            }
            AppScreen::Events => {
                let feed = Arc::new(self.actions.events_feed());
                self.filters.subscribe(&feed);
                feed.orchestrator().schedule(EventsQuery {
                    filters: current,
                    page: self.table.page,
                });
                self.views.events = Some(feed);
            }
            AppScreen::Timeline => {
                let timeline = Arc::new(self.actions.timeline());
                self.filters.subscribe(&timeline);
                timeline.schedule(current);
                self.views.timeline = Some(timeline);
            }
            AppScreen::Regions => {
                let regions = Arc::new(self.actions.regions());
                self.filters.subscribe(&regions);
                regions.schedule(current);
                self.views.regions = Some(regions);
            }
            AppScreen::Analytics | AppScreen::EventDetails => {}
        }
    }

    fn unmount(&mut self, screen: AppScreen) {
        match screen {
            AppScreen::Explore => {
                self.views.explore = None;
                self.views.stats = None;
            }
            AppScreen::Events => self.views.events = None,
            AppScreen::Timeline => self.views.timeline = None,
            AppScreen::Regions => self.views.regions = None,
            AppScreen::EventDetails => self.views.details = None,
            AppScreen::Analytics => {}
        }
    }

    pub fn apply_patch(&mut self, patch: FilterPatch) {
        self.table.page = 1;
        self.table.selected = 0;
        self.filters.set(patch);
        self.status_message.clear();
    }

    pub fn reset_filters(&mut self) {
        self.table.page = 1;
        self.table.selected = 0;
        self.filters.reset();
        self.status_message = "Filters reset".to_string();
    }

    pub fn current_filters(&self) -> Arc<FilterState> {
        self.filters.get()
    }

    pub fn set_events_page(&mut self, page: u32) {
        let Some(feed) = &self.views.events else {
            return;
        };
        let page = page.max(1);
        if page == self.table.page {
            return;
        }
        self.table.page = page;
        self.table.selected = 0;
        feed.orchestrator().schedule(EventsQuery {
            filters: self.filters.get(),
            page,
        });
    }

    /// Reads the visible views again after a failure.
    pub fn retry(&mut self) {
        if let Some(explore) = &self.views.explore {
            explore.retry();
        }
        if let Some(stats) = &self.views.stats {
            stats.retry();
        }
        if let Some(feed) = &self.views.events {
            feed.orchestrator().retry();
        }
        if let Some(timeline) = &self.views.timeline {
            timeline.retry();
        }
        if let Some(regions) = &self.views.regions {
            regions.retry();
        }
        if let Some(details) = &self.views.details {
            details.retry();
        }
        self.status_message = "Retrying...".to_string();
    }

    pub fn update(&mut self) {
        self.throbber.calc_next();

        loop {
            match self.bus_rx.try_recv() {
                Ok(message) => self.handle_message(message),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "view messages dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    fn handle_message(&mut self, message: ViewMessage) {
        match message {
            ViewMessage::ResetMapView => {
                let explore = self.explore();
                let events = explore.data.as_ref().map_or(&[][..], |data| &data.events);
                self.map.reset(events);
            }
            ViewMessage::ShowEvent(id) => {
                let details = self.actions.event_details();
                details.schedule(id);
                self.views.details = Some(details);
                self.enter_screen(AppScreen::EventDetails);
            }
            ViewMessage::LookupsSettled => {
                if let Some(e) = self.lookups.error() {
                    self.status_message =
                        format!("Filter options unavailable: {} (L to retry)", e.user_message());
                }
            }
        }
    }

    pub fn explore(&self) -> FetchResult<Arc<FilterState>, ExploreData> {
        self.views
            .explore
            .as_ref()
            .map_or_else(FetchResult::idle, |explore| explore.snapshot())
    }

    pub fn stats_summary(&self) -> StatsSummary {
        self.views
            .stats
            .as_ref()
            .map_or(StatsSummary::Loading, |stats| {
                StatsSummary::from_result(&stats.snapshot())
            })
    }

    pub fn events(&self) -> FetchResult<EventsQuery, Page<ConflictEvent>> {
        self.views
            .events
            .as_ref()
            .map_or_else(FetchResult::idle, |feed| feed.orchestrator().snapshot())
    }

    pub fn timeline(&self) -> FetchResult<Arc<FilterState>, Vec<TimePoint>> {
        self.views
            .timeline
            .as_ref()
            .map_or_else(FetchResult::idle, |timeline| timeline.snapshot())
    }

    pub fn regions(&self) -> FetchResult<Arc<FilterState>, Vec<RegionAgg>> {
        self.views
            .regions
            .as_ref()
            .map_or_else(FetchResult::idle, |regions| regions.snapshot())
    }

    pub fn details(&self) -> FetchResult<String, ConflictEvent> {
        self.views
            .details
            .as_ref()
            .map_or_else(FetchResult::idle, FetchOrchestrator::snapshot)
    }

    /// Status and error of the view in front, for the status line.
    pub fn current_status(&self) -> (FetchStatus, Option<ApiError>) {
        fn pick<K, T>(result: FetchResult<K, T>) -> (FetchStatus, Option<ApiError>) {
            (result.status, result.error)
        }

        match self.screen {
            AppScreen::Explore => pick(self.explore()),
            AppScreen::Events => pick(self.events()),
            AppScreen::Timeline => pick(self.timeline()),
            AppScreen::Regions => pick(self.regions()),
            AppScreen::EventDetails => pick(self.details()),
            AppScreen::Analytics => (FetchStatus::Idle, None),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.current_status().0 == FetchStatus::Pending
            || self.lookups.status() == LookupStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use conflict_explorer::api::DataSource;
    use conflict_explorer::fetch::FetchConfig;
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
        App::new(actions, AnalyticsEmbed::default(), store, location)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(400)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn explore_is_mounted_on_start() {
        let app = app();
        settle().await;

        assert_eq!(app.explore().status, FetchStatus::Success);
        assert!(matches!(app.stats_summary(), StatsSummary::Ready(_)));
        assert!(app.views.events.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn switching_tabs_unmounts_previous_view() {
        let mut app = app();
        app.enter_screen(AppScreen::Events);

        assert!(app.views.explore.is_none());
        assert!(app.views.stats.is_none());
        settle().await;
        assert_eq!(app.events().data.unwrap().items.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn filter_change_restarts_events_at_first_page() {
        let mut app = app();
        app.enter_screen(AppScreen::Events);
        settle().await;
        app.set_events_page(3);
        assert_eq!(app.table.page, 3);

        app.apply_patch(FilterPatch::has_civilians(Some(true)));
        assert_eq!(app.table.page, 1);
        settle().await;

        let query = app.events().fetched_for.unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.filters.has_civilians, Some(true));
        assert!(app.location.current().contains("hasCivilians=true"));
    }

    #[tokio::test(start_paused = true)]
    async fn show_event_opens_details_over_current_view() {
        let mut app = app();
        app.enter_screen(AppScreen::Events);
        app.bus.publish(ViewMessage::ShowEvent("demo-2".into()));
        app.update();

        assert_eq!(app.screen, AppScreen::EventDetails);
        assert!(app.views.events.is_some());
        settle().await;
        assert_eq!(app.details().data.unwrap().id, "demo-2");

        app.go_back();
        assert_eq!(app.screen, AppScreen::Events);
        assert!(app.views.details.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_map_view_fits_loaded_events() {
        let mut app = app();
        settle().await;

        app.bus.publish(ViewMessage::ResetMapView);
        app.update();
        assert!(app.map.zoom > MapViewport::MIN_ZOOM);
    }

    #[tokio::test(start_paused = true)]
    async fn tabs_wrap_both_ways() {
        let mut app = app();
        app.previous_tab();
        assert_eq!(app.screen, AppScreen::Analytics);
        app.next_tab();
        assert_eq!(app.screen, AppScreen::Explore);
    }
}
