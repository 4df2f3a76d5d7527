// ── Single-document store ──
//
// Same fetch contract as `ResourceStore` (generation counter, request
// tokens, notify on failure, last good value kept) over one cached
// document instead of a sequence.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use schoolhub_api::{ApiClient, Endpoint, ListQuery, PageMeta};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::resource::FetchOutcome;
use super::tokens::{OpKind, PendingOps};
use crate::error::CoreError;
use crate::notify::{Notification, Notifier};

pub struct DocumentStore<T> {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    endpoint: Endpoint,
    value: watch::Sender<Option<Arc<T>>>,
    meta: ArcSwap<PageMeta>,
    generation: AtomicU64,
    pending: Arc<PendingOps>,
}

impl<T: DeserializeOwned + Send + Sync + 'static> DocumentStore<T> {
    pub fn new(api: Arc<ApiClient>, notifier: Arc<dyn Notifier>, endpoint: Endpoint) -> Self {
        let (value, _) = watch::channel(None);
        Self {
            api,
            notifier,
            endpoint,
            value,
            meta: ArcSwap::from_pointee(PageMeta::new()),
            generation: AtomicU64::new(0),
            pending: PendingOps::new(),
        }
    }

    pub async fn fetch(&self, query: &ListQuery) -> Result<FetchOutcome, CoreError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = self.pending.begin(OpKind::Fetch, None);

        match self.api.document::<T>(&self.endpoint, query).await {
            Ok(doc) => {
                let applied = self.value.send_if_modified(|value| {
                    if !self.is_current(generation) {
                        return false;
                    }
                    *value = Some(Arc::new(doc.entity));
                    true
                });
                if !applied {
                    debug!(generation, "discarding stale {} response", self.endpoint.plural);
                    return Ok(FetchOutcome::Stale);
                }
                self.meta.store(Arc::new(doc.meta));
                Ok(FetchOutcome::Applied { count: 1 })
            }
            Err(e) if !self.is_current(generation) => {
                debug!(generation, error = %e, "ignoring failure of stale {} fetch", self.endpoint.plural);
                Ok(FetchOutcome::Stale)
            }
            Err(e) => {
                warn!(error = %e, "{} request failed", self.endpoint.entity);
                let fallback = format!("Failed to load {}", self.endpoint.plural);
                let message = e.server_message().map_or(fallback, str::to_owned);
                self.notifier
                    .notify(Notification::error(self.endpoint.plural, message));
                Err(e.into())
            }
        }
    }

    /// The last successfully fetched document.
    pub fn get(&self) -> Option<Arc<T>> {
        self.value.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<T>>> {
        self.value.subscribe()
    }

    pub fn meta(&self) -> Arc<PageMeta> {
        self.meta.load_full()
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.invalidate();
        self.value.send_replace(None);
        self.meta.store(Arc::new(PageMeta::new()));
    }

    pub fn busy(&self) -> bool {
        self.pending.is_busy()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
