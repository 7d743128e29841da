use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::api::ApiError;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;
type Loader<T> = dyn Fn() -> BoxFuture<Result<T, ApiError>> + Send + Sync;
type Outcome<T> = Option<Result<Arc<T>, ApiError>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStatus {
    Idle,
    Pending,
    Ready,
    Failed(String),
}

enum Slot<T> {
    Idle,
    Pending(watch::Receiver<Outcome<T>>),
    Ready(Arc<T>),
    Failed(ApiError),
}

struct Inner<T> {
    loader: Box<Loader<T>>,
    slot: Mutex<Slot<T>>,
}

/// Read-once cache for a vocabulary that is fetched on first use.
///
/// Concurrent `load` calls share a single read. A successful value is kept for the lifetime
/// of the cache; a failure is reported to every waiter and then forgotten, so the next
/// `load` issues a fresh read.
pub struct LookupCache<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for LookupCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> LookupCache<T>
where
    T: Send + Sync + 'static,
{
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                loader: Box::new(move || Box::pin(loader())),
                slot: Mutex::new(Slot::Idle),
            }),
        }
    }

    /// Returns the cached value, joining or starting the read as needed.
    pub async fn load(&self) -> Result<Arc<T>, ApiError> {
        let mut receiver = match self.begin() {
            Ok(value) => return Ok(value),
            Err(receiver) => receiver,
        };

        let outcome = receiver
            .wait_for(Option::is_some)
            .await
            .map(|outcome| outcome.clone());

        match outcome {
            Ok(Some(result)) => result,
            Ok(None) | Err(_) => {
                let err = ApiError::Network("lookup read was cancelled".into());
                let mut slot = self.inner.lock();
                if matches!(*slot, Slot::Pending(_)) {
                    *slot = Slot::Failed(err.clone());
                }
                Err(err)
            }
        }
    }

    /// Starts the read in the background unless it is already running or done.
    pub fn start(&self) {
        let _ = self.begin();
    }

    pub fn status(&self) -> LookupStatus {
        match &*self.inner.lock() {
            Slot::Idle => LookupStatus::Idle,
            Slot::Pending(_) => LookupStatus::Pending,
            Slot::Ready(_) => LookupStatus::Ready,
            Slot::Failed(err) => LookupStatus::Failed(err.user_message().to_string()),
        }
    }

    pub fn get(&self) -> Option<Arc<T>> {
        match &*self.inner.lock() {
            Slot::Ready(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<ApiError> {
        match &*self.inner.lock() {
            Slot::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    fn begin(&self) -> Result<Arc<T>, watch::Receiver<Outcome<T>>> {
        let mut slot = self.inner.lock();
        match &*slot {
            Slot::Ready(value) => Ok(Arc::clone(value)),
            Slot::Pending(receiver) => Err(receiver.clone()),
            Slot::Idle | Slot::Failed(_) => {
                let (sender, receiver) = watch::channel(None);
                let read = (self.inner.loader)();
                let inner = Arc::clone(&self.inner);
                tokio::spawn(async move {
                    let outcome = read.await.map(Arc::new);
                    {
                        let mut slot = inner.lock();
                        *slot = match &outcome {
                            Ok(value) => Slot::Ready(Arc::clone(value)),
                            Err(err) => {
                                tracing::warn!(error = %err, "lookup read failed");
                                Slot::Failed(err.clone())
                            }
                        };
                    }
                    sender.send_replace(Some(outcome));
                });
                tracing::debug!("lookup read issued");
                *slot = Slot::Pending(receiver.clone());
                Err(receiver)
            }
        }
    }
}

impl<T> Inner<T> {
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting<F>(reads: &Arc<AtomicUsize>, outcome: F) -> LookupCache<Vec<String>>
    where
        F: Fn(usize) -> Result<Vec<String>, ApiError> + Send + Sync + 'static,
    {
        let reads = Arc::clone(reads);
        let outcome = Arc::new(outcome);
        LookupCache::new(move || {
            let attempt = reads.fetch_add(1, Ordering::SeqCst) + 1;
            let outcome = Arc::clone(&outcome);
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                outcome(attempt)
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_loads_share_one_read() {
        let reads = Arc::new(AtomicUsize::new(0));
        let cache = counting(&reads, |_| Ok(vec!["Mali".into()]));

        let (first, second) = tokio::join!(cache.load(), cache.load());

        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
        assert_eq!(cache.status(), LookupStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn ready_value_is_served_without_reading_again() {
        let reads = Arc::new(AtomicUsize::new(0));
        let cache = counting(&reads, |_| Ok(vec!["Niger".into()]));

        cache.load().await.unwrap();
        let again = cache.load().await.unwrap();

        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(*again, vec!["Niger".to_string()]);
        assert_eq!(cache.get().as_deref(), Some(&vec!["Niger".to_string()]));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_shared_then_forgotten_on_retry() {
        let reads = Arc::new(AtomicUsize::new(0));
        let cache = counting(&reads, |attempt| {
            if attempt == 1 {
                Err(ApiError::Network("connection refused".into()))
            } else {
                Ok(vec!["Chad".into()])
            }
        });

        let (first, second) = tokio::join!(cache.load(), cache.load());
        assert_eq!(first.unwrap_err(), ApiError::Network("connection refused".into()));
        assert!(second.is_err());
        assert!(matches!(cache.status(), LookupStatus::Failed(_)));
        assert!(cache.get().is_none());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(reads.load(Ordering::SeqCst), 1);

        let retried = cache.load().await.unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert_eq!(*retried, vec!["Chad".to_string()]);
        assert!(cache.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn start_issues_read_in_background() {
        let reads = Arc::new(AtomicUsize::new(0));
        let cache = counting(&reads, |_| Ok(Vec::new()));
        assert_eq!(cache.status(), LookupStatus::Idle);

        cache.start();
        cache.start();
        assert_eq!(cache.status(), LookupStatus::Pending);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.status(), LookupStatus::Ready);
    }
}
