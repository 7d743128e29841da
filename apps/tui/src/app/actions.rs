use std::sync::Arc;

use conflict_explorer::api::{
    ApiError, ConflictEvent, DataSource, HeatCell, Lookups, Page, RegionAgg, SeriesTotals,
    TimePoint,
};
use conflict_explorer::fetch::{FetchConfig, FetchOrchestrator, FilterFeed, LookupCache};
use conflict_explorer::filters::FilterState;

use crate::app::views::EVENTS_PAGE_SIZE;

/// How many events the map asks for in one read.
pub const MAP_EVENT_LIMIT: u32 = 1000;

/// Events and heat cells for the map, read together.
#[derive(Debug, Clone, PartialEq)]
pub struct ExploreData {
    pub events: Vec<ConflictEvent>,
    pub total_count: u64,
    pub heat: Vec<HeatCell>,
}

/// Request key for the events table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsQuery {
    pub filters: Arc<FilterState>,
    pub page: u32,
}

pub type FilterOrchestrator<T> = FetchOrchestrator<Arc<FilterState>, T>;
pub type EventsFeed = FilterFeed<EventsQuery, Page<ConflictEvent>>;

/// Builds the reads each view needs from one data source.
#[derive(Debug, Clone)]
pub struct AppActions {
    pub source: DataSource,
    pub fetch: FetchConfig,
}

impl AppActions {
    pub const fn new(source: DataSource, fetch: FetchConfig) -> Self {
        Self { source, fetch }
    }

    pub fn lookup_cache(&self) -> LookupCache<Lookups> {
        let source = self.source.clone();
        LookupCache::new(move || {
            let source = source.clone();
            async move { source.lookups().await }
        })
    }

    pub fn explore(&self) -> FilterOrchestrator<ExploreData> {
        let source = self.source.clone();
        FetchOrchestrator::new(self.fetch, move |filters: Arc<FilterState>| {
            let source = source.clone();
            async move {
                let (events, heat) = tokio::try_join!(
                    source.events(&filters, 1, MAP_EVENT_LIMIT),
                    source.heat(&filters)
                )?;
                Ok(ExploreData {
                    total_count: events.total_count,
                    events: events.items,
                    heat,
                })
            }
        })
    }

    /// Filter changes restart the table at page one.
    pub fn events_feed(&self) -> EventsFeed {
        let source = self.source.clone();
        let orchestrator = FetchOrchestrator::new(self.fetch, move |query: EventsQuery| {
            let source = source.clone();
            async move {
                source
                    .events(&query.filters, query.page, EVENTS_PAGE_SIZE)
                    .await
            }
        });
        FilterFeed::new(orchestrator, |filters| EventsQuery {
            filters: Arc::clone(filters),
            page: 1,
        })
    }

    pub fn timeline(&self) -> FilterOrchestrator<Vec<TimePoint>> {
        let source = self.source.clone();
        FetchOrchestrator::new(self.fetch, move |filters: Arc<FilterState>| {
            let source = source.clone();
            async move { source.series(&filters).await }
        })
    }

    pub fn regions(&self) -> FilterOrchestrator<Vec<RegionAgg>> {
        let source = self.source.clone();
        FetchOrchestrator::new(self.fetch, move |filters: Arc<FilterState>| {
            let source = source.clone();
            async move { source.regions(&filters).await }
        })
    }

    /// The 30-day summary is read once per mount, without the quiescence window.
    pub fn stats_summary(&self) -> FilterOrchestrator<SeriesTotals> {
        let source = self.source.clone();
        FetchOrchestrator::new(self.fetch.immediate(), move |filters: Arc<FilterState>| {
            let source = source.clone();
            async move {
                let points = source.series(&filters).await?;
                Ok(SeriesTotals::from_points(&points))
            }
        })
    }

    pub fn event_details(&self) -> FetchOrchestrator<String, ConflictEvent> {
        let source = self.source.clone();
        FetchOrchestrator::new(self.fetch.immediate(), move |id: String| {
            let source = source.clone();
            async move { source.event(&id).await }
        })
    }

    pub async fn event_count(&self, filters: &FilterState) -> Result<u64, ApiError> {
        self.source
            .events(filters, 1, 1)
            .await
            .map(|page| page.total_count)
    }

    pub async fn series(&self, filters: &FilterState) -> Result<Vec<TimePoint>, ApiError> {
        self.source.series(filters).await
    }

    pub async fn regions_for(&self, filters: &FilterState) -> Result<Vec<RegionAgg>, ApiError> {
        self.source.regions(filters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use conflict_explorer::fetch::FetchStatus;
    use std::time::Duration;

    fn actions() -> AppActions {
        AppActions::new(
            DataSource::Demo {
                reason: "test".into(),
            },
            FetchConfig::default(),
        )
    }

    fn filters() -> Arc<FilterState> {
        Arc::new(FilterState::default_for(
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn explore_reads_events_and_heat_together() {
        let explore = actions().explore();
        explore.schedule(filters());
        tokio::time::sleep(Duration::from_millis(400)).await;

        let result = explore.snapshot();
        let data = result.data.unwrap();
        assert_eq!(result.status, FetchStatus::Success);
        assert_eq!(data.events.len(), 2);
        assert_eq!(data.heat.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn stats_summary_totals_the_series() {
        let stats = actions().stats_summary();
        stats.schedule(filters());
        tokio::time::sleep(Duration::from_millis(10)).await;

        let totals = stats.snapshot().data.unwrap();
        assert_eq!(totals.events, 597);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_event_surfaces_not_found() {
        let details = actions().event_details();
        details.schedule("missing".into());
        tokio::time::sleep(Duration::from_millis(10)).await;

        let result = details.snapshot();
        assert_eq!(result.status, FetchStatus::Error);
        assert_eq!(result.error, Some(ApiError::NotFound("event missing".into())));
    }
}
