//! Trailing-debounce fetch scheduling with stale-result suppression.
//!
//! A [`FetchOrchestrator`] owns a single logical view of some remote data. Every call to
//! [`FetchOrchestrator::schedule`] restarts the quiescence timer; only the key supplied last
//! is read. Results for a key other than the latest scheduled one are dropped on arrival,
//! and dropping the orchestrator cancels the timer and every in-flight read.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;

use crate::api::ApiError;
use crate::filters::{FilterState, FilterSubscriber};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;
type FetchFn<K, T> = dyn Fn(K) -> BoxFuture<Result<T, ApiError>> + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    pub debounce: Duration,
    pub read_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl FetchConfig {
    /// Same timeout, no quiescence window. Used for one-shot reads such as event details.
    #[must_use]
    pub const fn immediate(self) -> Self {
        Self {
            debounce: Duration::ZERO,
            read_timeout: self.read_timeout,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Pending,
    Success,
    Error,
}

impl FetchStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// What a view renders: the last good data plus the state of the most recent read.
///
/// `data` and `fetched_for` always describe the same successful read. A failed read only
/// touches `status`, `error` and `error_message`.
#[derive(Debug)]
pub struct FetchResult<K, T> {
    pub data: Option<Arc<T>>,
    pub fetched_for: Option<K>,
    pub status: FetchStatus,
    pub error: Option<ApiError>,
    pub error_message: Option<String>,
}

impl<K, T> FetchResult<K, T> {
    pub const fn idle() -> Self {
        Self {
            data: None,
            fetched_for: None,
            status: FetchStatus::Idle,
            error: None,
            error_message: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == FetchStatus::Pending
    }
}

impl<K: Clone, T> Clone for FetchResult<K, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            fetched_for: self.fetched_for.clone(),
            status: self.status,
            error: self.error.clone(),
            error_message: self.error_message.clone(),
        }
    }
}

struct Shared<K> {
    latest: Option<K>,
    /// Bumped by every `schedule`.
    generation: u64,
    /// Generation of the last result that reached the view.
    applied: u64,
    timer: Option<JoinHandle<()>>,
    in_flight: Vec<(u64, AbortHandle)>,
    closed: bool,
}

struct Inner<K, T> {
    config: FetchConfig,
    fetch: Box<FetchFn<K, T>>,
    shared: Mutex<Shared<K>>,
    results: watch::Sender<FetchResult<K, T>>,
}

pub struct FetchOrchestrator<K, T> {
    inner: Arc<Inner<K, T>>,
}

impl<K, T> FetchOrchestrator<K, T>
where
    K: Clone + PartialEq + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub fn new<F, Fut>(config: FetchConfig, fetch: F) -> Self
    where
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (results, _) = watch::channel(FetchResult::idle());
        Self {
            inner: Arc::new(Inner {
                config,
                fetch: Box::new(move |key| Box::pin(fetch(key))),
                shared: Mutex::new(Shared {
                    latest: None,
                    generation: 0,
                    applied: 0,
                    timer: None,
                    in_flight: Vec::new(),
                    closed: false,
                }),
                results,
            }),
        }
    }

    /// Arms the debounce timer for `key`, cancelling any timer that has not fired yet.
    pub fn schedule(&self, key: K) {
        let mut shared = self.inner.lock();
        if shared.closed {
            return;
        }

        shared.generation += 1;
        let generation = shared.generation;
        shared.latest = Some(key.clone());
        if let Some(timer) = shared.timer.take() {
            timer.abort();
        }

        self.inner.results.send_modify(|result| {
            result.status = FetchStatus::Pending;
        });

        let deadline = Instant::now() + self.inner.config.debounce;
        let weak = Arc::downgrade(&self.inner);
        shared.timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(inner) = weak.upgrade() {
                Inner::fire(&inner, generation, key);
            }
        }));
        tracing::debug!(generation, "fetch scheduled");
    }

    /// Reads the latest key again. Does nothing if nothing was ever scheduled.
    pub fn retry(&self) {
        let latest = self.inner.lock().latest.clone();
        if let Some(key) = latest {
            self.schedule(key);
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchResult<K, T>> {
        self.inner.results.subscribe()
    }

    pub fn snapshot(&self) -> FetchResult<K, T> {
        self.inner.results.borrow().clone()
    }

    /// Cancels the pending timer and every in-flight read; later results are never published.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}

impl<K, T> Inner<K, T>
where
    K: Clone + PartialEq + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    fn fire(inner: &Arc<Self>, generation: u64, key: K) {
        let mut shared = inner.lock();
        if shared.closed || shared.generation != generation {
            return;
        }
        shared.timer = None;

        let read = (inner.fetch)(key.clone());
        let read_timeout = inner.config.read_timeout;
        let weak: Weak<Self> = Arc::downgrade(inner);
        let task = tokio::spawn(async move {
            let outcome = tokio::time::timeout(read_timeout, read)
                .await
                .unwrap_or(Err(ApiError::Timeout(read_timeout)));
            if let Some(inner) = weak.upgrade() {
                inner.settle(generation, &key, outcome);
            }
        });
        shared.in_flight.push((generation, task.abort_handle()));
        tracing::debug!(generation, "fetch issued");
    }

    fn settle(&self, generation: u64, key: &K, outcome: Result<T, ApiError>) {
        let mut shared = self.lock();
        shared.in_flight.retain(|(issued, _)| *issued != generation);
        if shared.closed {
            return;
        }
        if shared.latest.as_ref() != Some(key) || generation < shared.applied {
            tracing::debug!(generation, "stale result discarded");
            return;
        }
        shared.applied = generation;
        let superseded = shared.generation != generation;

        match outcome {
            Ok(data) => self.results.send_modify(|result| {
                result.data = Some(Arc::new(data));
                result.fetched_for = Some(key.clone());
                result.error = None;
                result.error_message = None;
                if !superseded {
                    result.status = FetchStatus::Success;
                }
            }),
            Err(err) => {
                tracing::warn!(generation, error = %err, "fetch failed");
                self.results.send_modify(|result| {
                    result.error_message = Some(err.user_message().to_string());
                    result.error = Some(err);
                    if !superseded {
                        result.status = FetchStatus::Error;
                    }
                });
            }
        }
    }
}

impl<K, T> Inner<K, T> {
    fn lock(&self) -> MutexGuard<'_, Shared<K>> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn shutdown(&self) {
        let mut shared = self.lock();
        if shared.closed {
            return;
        }
        shared.closed = true;
        if let Some(timer) = shared.timer.take() {
            timer.abort();
        }
        for (_, task) in shared.in_flight.drain(..) {
            task.abort();
        }
    }
}

impl<K, T> Drop for FetchOrchestrator<K, T> {
    fn drop(&mut self) {
        self.inner.shutdown();
    }
}

impl<T> FilterSubscriber for FetchOrchestrator<Arc<FilterState>, T>
where
    T: Send + Sync + 'static,
{
    fn filters_changed(&self, filters: &Arc<FilterState>) {
        self.schedule(Arc::clone(filters));
    }
}

/// Feeds filter changes into an orchestrator whose key is derived from the filters,
/// e.g. the events table, which restarts at page one whenever the filters change.
pub struct FilterFeed<K, T> {
    orchestrator: FetchOrchestrator<K, T>,
    key_for: Box<dyn Fn(&Arc<FilterState>) -> K + Send + Sync>,
}

impl<K, T> FilterFeed<K, T>
where
    K: Clone + PartialEq + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub fn new<F>(orchestrator: FetchOrchestrator<K, T>, key_for: F) -> Self
    where
        F: Fn(&Arc<FilterState>) -> K + Send + Sync + 'static,
    {
        Self {
            orchestrator,
            key_for: Box::new(key_for),
        }
    }

    pub const fn orchestrator(&self) -> &FetchOrchestrator<K, T> {
        &self.orchestrator
    }
}

impl<K, T> FilterSubscriber for FilterFeed<K, T>
where
    K: Clone + PartialEq + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    fn filters_changed(&self, filters: &Arc<FilterState>) {
        self.orchestrator.schedule((self.key_for)(filters));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterPatch, FilterStore, Location};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, Ordering};

    type Reads = Arc<Mutex<Vec<u32>>>;

    fn recording<F, Fut>(
        config: FetchConfig,
        reply: F,
    ) -> (FetchOrchestrator<u32, u32>, Reads)
    where
        F: Fn(u32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<u32, ApiError>> + Send + 'static,
    {
        let reads: Reads = Arc::default();
        let log = Arc::clone(&reads);
        let orchestrator = FetchOrchestrator::new(config, move |key| {
            log.lock().unwrap().push(key);
            reply(key)
        });
        (orchestrator, reads)
    }

    async fn wait(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_schedules_issues_one_read_for_last_key() {
        let (orchestrator, reads) =
            recording(FetchConfig::default(), |key| async move { Ok(key * 10) });

        orchestrator.schedule(1);
        wait(100).await;
        orchestrator.schedule(2);
        wait(100).await;
        orchestrator.schedule(3);
        assert!(orchestrator.snapshot().is_pending());

        wait(400).await;

        let result = orchestrator.snapshot();
        assert_eq!(*reads.lock().unwrap(), vec![3]);
        assert_eq!(result.status, FetchStatus::Success);
        assert_eq!(result.data.as_deref(), Some(&30));
        assert_eq!(result.fetched_for, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_superseded_read_never_overwrites_newer_result() {
        let (orchestrator, reads) = recording(FetchConfig::default(), |key| async move {
            let delay = if key == 1 { 2_000 } else { 100 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(key)
        });

        orchestrator.schedule(1);
        wait(350).await;
        orchestrator.schedule(2);
        wait(500).await;
        assert_eq!(orchestrator.snapshot().fetched_for, Some(2));

        wait(3_000).await;

        let result = orchestrator.snapshot();
        assert_eq!(*reads.lock().unwrap(), vec![1, 2]);
        assert_eq!(result.fetched_for, Some(2));
        assert_eq!(result.data.as_deref(), Some(&2));
        assert_eq!(result.status, FetchStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn older_read_for_requeued_key_shows_data_but_stays_pending() {
        let attempts = Arc::new(Mutex::new(0_u32));
        let counter = Arc::clone(&attempts);
        let (orchestrator, reads) = recording(FetchConfig::default(), move |key| {
            let attempt = {
                let mut attempts = counter.lock().unwrap();
                *attempts += 1;
                *attempts
            };
            async move {
                let delay = if attempt == 1 { 600 } else { 500 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(key * 10 + attempt)
            }
        });

        orchestrator.schedule(1);
        wait(350).await;
        orchestrator.schedule(2);
        wait(100).await;
        orchestrator.schedule(1);
        wait(500).await;

        let interim = orchestrator.snapshot();
        assert_eq!(interim.data.as_deref(), Some(&11));
        assert_eq!(interim.fetched_for, Some(1));
        assert_eq!(interim.status, FetchStatus::Pending);

        wait(400).await;

        let result = orchestrator.snapshot();
        assert_eq!(*reads.lock().unwrap(), vec![1, 1]);
        assert_eq!(result.data.as_deref(), Some(&12));
        assert_eq!(result.status, FetchStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_reports_error_and_keeps_last_good_data() {
        let (orchestrator, _reads) = recording(FetchConfig::default(), |key| async move {
            if key == 2 {
                std::future::pending::<()>().await;
            }
            Ok(key)
        });

        orchestrator.schedule(1);
        wait(400).await;
        orchestrator.schedule(2);
        wait(300 + 10_000 + 100).await;

        let result = orchestrator.snapshot();
        assert_eq!(result.status, FetchStatus::Error);
        assert_eq!(result.error, Some(ApiError::Timeout(DEFAULT_READ_TIMEOUT)));
        assert_eq!(
            result.error_message.as_deref(),
            Some("The events API took too long to respond.")
        );
        assert_eq!(result.data.as_deref(), Some(&1));
        assert_eq!(result.fetched_for, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_read_is_not_retried_until_asked() {
        let attempts = Arc::new(Mutex::new(0_u32));
        let counter = Arc::clone(&attempts);
        let (orchestrator, reads) = recording(FetchConfig::default(), move |key| {
            let attempt = {
                let mut attempts = counter.lock().unwrap();
                *attempts += 1;
                *attempts
            };
            async move {
                if attempt == 1 {
                    Err(ApiError::Status {
                        status: 503,
                        message: "Service Unavailable".into(),
                    })
                } else {
                    Ok(key)
                }
            }
        });

        orchestrator.schedule(7);
        wait(1_000).await;
        assert_eq!(orchestrator.snapshot().status, FetchStatus::Error);
        assert_eq!(reads.lock().unwrap().len(), 1);

        orchestrator.retry();
        wait(400).await;

        let result = orchestrator.snapshot();
        assert_eq!(result.status, FetchStatus::Success);
        assert_eq!(result.error_message, None);
        assert_eq!(*reads.lock().unwrap(), vec![7, 7]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels_timer_and_in_flight_reads() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);
        let (orchestrator, reads) = recording(FetchConfig::default(), move |key| {
            let flag = Arc::clone(&flag);
            async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                flag.store(true, Ordering::SeqCst);
                Ok(key)
            }
        });
        let receiver = orchestrator.subscribe();

        orchestrator.schedule(1);
        wait(350).await;
        drop(orchestrator);
        wait(5_000).await;

        assert_eq!(*reads.lock().unwrap(), vec![1]);
        assert!(!finished.load(Ordering::SeqCst));
        let last = receiver.borrow();
        assert_eq!(last.status, FetchStatus::Pending);
        assert!(last.data.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_before_debounce_elapses_issues_nothing() {
        let (orchestrator, reads) =
            recording(FetchConfig::default(), |key| async move { Ok(key) });

        orchestrator.schedule(1);
        wait(100).await;
        orchestrator.shutdown();
        orchestrator.schedule(2);
        wait(1_000).await;

        assert!(reads.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn store_updates_flow_into_subscribed_orchestrator() {
        fn today() -> NaiveDate {
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        }

        let mut store = FilterStore::new(FilterState::default_for(today()), Arc::new(Location::new()))
            .with_clock(today);
        let orchestrator = Arc::new(FetchOrchestrator::new(
            FetchConfig::default(),
            |filters: Arc<FilterState>| async move { Ok(filters.countries.len()) },
        ));
        store.subscribe(&orchestrator);

        store.set(FilterPatch::countries(["Mali"]));
        store.set(FilterPatch::countries(["Mali", "Niger"]));
        wait(400).await;

        let result = orchestrator.snapshot();
        assert_eq!(result.fetched_for, Some(store.get()));
        assert_eq!(result.data.as_deref(), Some(&2));
    }

    #[tokio::test(start_paused = true)]
    async fn filter_feed_derives_keys_from_filters() {
        let orchestrator = FetchOrchestrator::new(
            FetchConfig::default(),
            |(filters, page): (Arc<FilterState>, u32)| async move {
                Ok(format!("{}@{page}", filters.countries.len()))
            },
        );
        let feed = FilterFeed::new(orchestrator, |filters| (Arc::clone(filters), 1));
        let filters = Arc::new(FilterState::default_for(
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        ));

        feed.filters_changed(&filters);
        wait(400).await;

        assert_eq!(
            feed.orchestrator().snapshot().data.as_deref().map(String::as_str),
            Some("0@1")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_config_skips_quiescence_window() {
        let (orchestrator, _reads) = recording(FetchConfig::default().immediate(), |key| async move {
            Ok(key)
        });

        orchestrator.schedule(5);
        wait(1).await;

        assert_eq!(orchestrator.snapshot().data.as_deref(), Some(&5));
    }
}
