//! The 30-day summary shown above the map.

use chrono::{Duration, NaiveDate};

use crate::api::SeriesTotals;
use crate::fetch::{FetchResult, FetchStatus};
use crate::filters::{DateRange, FilterPatch, FilterState};

pub const STATS_WINDOW_DAYS: i64 = 30;
pub const UNAVAILABLE_MESSAGE: &str = "Unable to load statistics";

/// Filters for the summary: the last 30 days, nothing else.
pub fn window_filters(today: NaiveDate) -> FilterState {
    let from = today - Duration::days(STATS_WINDOW_DAYS);
    FilterState::default_for(today).merged(FilterPatch::date_range(DateRange::ordered(from, today)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsSummary {
    Loading,
    Ready(SeriesTotals),
    /// A failed read; no substitute numbers are shown.
    Unavailable,
}

impl StatsSummary {
    pub fn from_result<K>(result: &FetchResult<K, SeriesTotals>) -> Self {
        match (result.status, result.data.as_deref()) {
            (FetchStatus::Error, _) => Self::Unavailable,
            (_, Some(totals)) => Self::Ready(*totals),
            (FetchStatus::Idle | FetchStatus::Pending | FetchStatus::Success, None) => {
                Self::Loading
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use std::sync::Arc;

    #[test]
    fn window_covers_last_thirty_days_only() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let filters = window_filters(today);

        assert_eq!(filters.date_range.from(), NaiveDate::from_ymd_opt(2024, 5, 16).unwrap());
        assert_eq!(filters.date_range.to(), today);
        assert_eq!(filters.active_filter_count(), 0);
    }

    #[test]
    fn failed_read_is_unavailable_even_with_earlier_totals() {
        let totals = SeriesTotals {
            events: 3,
            deaths: 9,
            civilians: 1,
        };
        let mut result: FetchResult<(), SeriesTotals> = FetchResult::idle();
        assert_eq!(StatsSummary::from_result(&result), StatsSummary::Loading);

        result.data = Some(Arc::new(totals));
        result.status = FetchStatus::Success;
        assert_eq!(StatsSummary::from_result(&result), StatsSummary::Ready(totals));

        result.status = FetchStatus::Error;
        result.error = Some(ApiError::Network("reset".into()));
        assert_eq!(StatsSummary::from_result(&result), StatsSummary::Unavailable);
    }
}
