use std::sync::{Arc, Mutex, Weak};

use chrono::{Local, NaiveDate};

use super::query;
use super::state::{FilterPatch, FilterState};

/// Where the shareable form of the current view lives.
///
/// Implementations replace the current entry; they never append history.
pub trait AddressBar: Send + Sync {
    fn replace(&self, query: &str);
}

/// Something that reacts to a new filter snapshot, usually by scheduling a fetch.
pub trait FilterSubscriber: Send + Sync {
    fn filters_changed(&self, filters: &Arc<FilterState>);
}

/// In-memory address bar; the dashboard shows it in the header.
#[derive(Debug, Default)]
pub struct Location {
    query: Mutex<String>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> String {
        self.query
            .lock()
            .map(|query| query.clone())
            .unwrap_or_default()
    }
}

impl AddressBar for Location {
    fn replace(&self, query: &str) {
        if let Ok(mut current) = self.query.lock() {
            query.clone_into(&mut *current);
        }
    }
}

/// Owner of the current [`FilterState`] snapshot.
///
/// `set` and `reset` rewrite the address bar first and then notify subscribers, so the
/// address bar never shows a state older than the one being fetched.
pub struct FilterStore {
    current: Arc<FilterState>,
    address_bar: Arc<dyn AddressBar>,
    subscribers: Vec<Weak<dyn FilterSubscriber>>,
    today: fn() -> NaiveDate,
}

impl FilterStore {
    pub fn new(initial: FilterState, address_bar: Arc<dyn AddressBar>) -> Self {
        address_bar.replace(&query::encode(&initial));
        Self {
            current: Arc::new(initial),
            address_bar,
            subscribers: Vec::new(),
            today: local_today,
        }
    }

    /// Builds the initial state from a query string, falling back to defaults.
    pub fn from_query(query_string: &str, address_bar: Arc<dyn AddressBar>) -> Self {
        Self::new(query::decode(query_string), address_bar)
    }

    #[must_use]
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn get(&self) -> Arc<FilterState> {
        Arc::clone(&self.current)
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    /// Registers a subscriber; it is dropped from the list once the last `Arc` to it is gone.
    pub fn subscribe<S>(&mut self, subscriber: &Arc<S>)
    where
        S: FilterSubscriber + 'static,
    {
        let subscriber: Arc<dyn FilterSubscriber> = subscriber.clone();
        self.subscribers.push(Arc::downgrade(&subscriber));
    }

    pub fn set(&mut self, patch: FilterPatch) -> Arc<FilterState> {
        let next = self.current.merged(patch);
        self.publish(next)
    }

    pub fn reset(&mut self) -> Arc<FilterState> {
        let next = FilterState::default_for(self.today());
        self.publish(next)
    }

    fn publish(&mut self, next: FilterState) -> Arc<FilterState> {
        let next = Arc::new(next);
        self.current = Arc::clone(&next);

        let encoded = query::encode(&next);
        tracing::debug!(query = %encoded, "filters updated");
        self.address_bar.replace(&encoded);

        self.subscribers.retain(|subscriber| {
            subscriber.upgrade().is_some_and(|subscriber| {
                subscriber.filters_changed(&next);
                true
            })
        });

        next
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Clarity, ViolenceType};
    use std::collections::BTreeSet;
    use crate::filters::state::{Bounds, DateRange};

    #[derive(Default)]
    struct Journal {
        entries: Mutex<Vec<String>>,
    }

    impl Journal {
        fn push(&self, entry: String) {
            self.entries.lock().unwrap().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.entries.lock().unwrap().clone()
        }
    }

    struct RecordingBar(Arc<Journal>);

    impl AddressBar for RecordingBar {
        fn replace(&self, query: &str) {
            self.0.push(format!("replace {query}"));
        }
    }

    struct RecordingSubscriber(Arc<Journal>);

    impl FilterSubscriber for RecordingSubscriber {
        fn filters_changed(&self, filters: &Arc<FilterState>) {
            self.0.push(format!("schedule {}", query::encode(filters)));
        }
    }

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn store(journal: &Arc<Journal>) -> FilterStore {
        FilterStore::new(
            FilterState::default_for(fixed_today()),
            Arc::new(RecordingBar(Arc::clone(journal))),
        )
        .with_clock(fixed_today)
    }

    #[test]
    fn set_rewrites_address_bar_before_scheduling() {
        let journal = Arc::new(Journal::default());
        let mut store = store(&journal);
        let subscriber = Arc::new(RecordingSubscriber(Arc::clone(&journal)));
        store.subscribe(&subscriber);

        let next = store.set(FilterPatch::countries(["Mali"]));
        let encoded = query::encode(&next);

        let entries = journal.entries();
        assert_eq!(
            &entries[1..],
            &[format!("replace {encoded}"), format!("schedule {encoded}")]
        );
    }

    #[test]
    fn previous_snapshots_are_never_mutated() {
        let journal = Arc::new(Journal::default());
        let mut store = store(&journal);

        let before = store.get();
        store.set(FilterPatch::countries(["Chad"]));

        assert!(before.countries.is_empty());
        assert_eq!(store.get().countries.len(), 1);
    }

    #[test]
    fn reset_restores_default_window_and_clears_everything_else() {
        let journal = Arc::new(Journal::default());
        let mut store = store(&journal);
        let subscriber = Arc::new(RecordingSubscriber(Arc::clone(&journal)));
        store.subscribe(&subscriber);

        let names = |list: &[&str]| -> Option<BTreeSet<String>> {
            Some(list.iter().map(|name| (*name).to_string()).collect())
        };
        store.set(FilterPatch::date_range(DateRange::ordered(
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 9, 30).unwrap(),
        )));
        store.set(FilterPatch::countries(["Mali"]));
        store.set(FilterPatch {
            regions: names(&["Africa"]),
            adm1: names(&["Gao"]),
            sides_a: names(&["Government of Mali"]),
            sides_b: names(&["JNIM"]),
            ..FilterPatch::default()
        });
        store.set(FilterPatch::violence_types(
            [ViolenceType::StateBased, ViolenceType::OneSided].into(),
        ));
        store.set(FilterPatch::clarity(
            Bounds::new(Some(Clarity::High), Some(Clarity::Medium)).unwrap(),
        ));
        store.set(FilterPatch::deaths(Bounds::new(Some(3), Some(9)).unwrap()));
        store.set(FilterPatch::has_civilians(Some(true)));
        assert_eq!(store.get().active_filter_count(), 9);

        let before_reset = journal.entries().len();
        let state = store.reset();

        assert_eq!(state.date_range, DateRange::last_365_days(fixed_today()));
        assert!(state.countries.is_empty());
        assert!(state.regions.is_empty());
        assert!(state.adm1.is_empty());
        assert!(state.sides_a.is_empty());
        assert!(state.sides_b.is_empty());
        assert!(state.violence_types.is_empty());
        assert!(state.deaths.is_unbounded());
        assert!(state.clarity.is_unbounded());
        assert_eq!(state.has_civilians, None);
        assert_eq!(*state, FilterState::default_for(fixed_today()));

        let encoded = query::encode(&state);
        assert_eq!(
            &journal.entries()[before_reset..],
            &[format!("replace {encoded}"), format!("schedule {encoded}")]
        );
    }

    #[test]
    fn dropped_subscribers_are_not_notified() {
        let journal = Arc::new(Journal::default());
        let mut store = store(&journal);
        let subscriber = Arc::new(RecordingSubscriber(Arc::clone(&journal)));
        store.subscribe(&subscriber);
        drop(subscriber);

        store.set(FilterPatch::countries(["Niger"]));

        assert!(journal
            .entries()
            .iter()
            .all(|entry| entry.starts_with("replace")));
    }

    #[test]
    fn location_keeps_only_the_latest_query() {
        let location = Arc::new(Location::new());
        let mut store = FilterStore::new(FilterState::default_for(fixed_today()), location.clone())
            .with_clock(fixed_today);

        store.set(FilterPatch::countries(["Mali"]));
        store.set(FilterPatch::countries(["Chad"]));

        assert!(location.current().contains("countries=Chad"));
        assert!(!location.current().contains("Mali"));
    }
}
