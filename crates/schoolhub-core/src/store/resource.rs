// ── Generic resource store ──
//
// fetch -> cache -> mutate -> server-wins patch -> notify, implemented
// once and instantiated per backend collection.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use schoolhub_api::{ActionRoute, ApiClient, ListQuery, PageMeta};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::collection::{EntityCollection, Snapshot};
use super::tokens::{OpKind, PendingOp, PendingOps};
use crate::error::CoreError;
use crate::model::{Placement, Resource};
use crate::notify::{Notification, Notifier};
use crate::stream::EntityStream;
use crate::view::{Facets, ViewFilter};

/// Result of a fetch that reached the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The cache now holds the response.
    Applied { count: usize },
    /// A newer fetch, `invalidate` or `reset` superseded this one; its
    /// response was discarded and nothing was notified.
    Stale,
}

impl FetchOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// What a successful action does to the cached entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEffect {
    /// The response carries the updated entity; patch it in.
    Replace,
    /// The entity leaves this collection (an approved request is no
    /// longer pending).
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome<E> {
    Replaced(Arc<E>),
    Removed(Arc<E>),
}

impl<E> ActionOutcome<E> {
    pub fn into_inner(self) -> Arc<E> {
        match self {
            Self::Replaced(e) | Self::Removed(e) => e,
        }
    }
}

/// Cache and operations for one backend collection.
///
/// Every operation is independent: none queue behind another, responses
/// apply in completion order, and each holds its own request token while
/// in flight. Failures leave the cache untouched, fire one notification
/// and come back as a `CoreError` the caller is free to ignore.
pub struct ResourceStore<E: Resource> {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    cache: EntityCollection<E>,
    meta: ArcSwap<PageMeta>,
    last_query: ArcSwap<ListQuery>,
    generation: AtomicU64,
    pending: Arc<PendingOps>,
}

impl<E: Resource> ResourceStore<E> {
    pub fn new(api: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            cache: EntityCollection::new(),
            meta: ArcSwap::from_pointee(PageMeta::new()),
            last_query: ArcSwap::from_pointee(ListQuery::default()),
            generation: AtomicU64::new(0),
            pending: PendingOps::new(),
        }
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Load the collection, replacing the cache wholesale on success.
    pub async fn fetch(&self, query: &ListQuery) -> Result<FetchOutcome, CoreError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.last_query.store(Arc::new(query.clone()));
        let _guard = self.pending.begin(OpKind::Fetch, None);
        let endpoint = E::ENDPOINT;

        match self.api.list::<E>(&endpoint, query).await {
            Ok(page) => {
                let count = page.items.len();
                let applied = self
                    .cache
                    .replace_if(page.items, || self.is_current(generation));
                if !applied {
                    debug!(generation, "discarding stale {} response", endpoint.plural);
                    return Ok(FetchOutcome::Stale);
                }
                self.meta.store(Arc::new(page.meta));
                debug!(count, generation, "loaded {}", endpoint.plural);
                Ok(FetchOutcome::Applied { count })
            }
            Err(e) if !self.is_current(generation) => {
                debug!(generation, error = %e, "ignoring failure of stale {} fetch", endpoint.plural);
                Ok(FetchOutcome::Stale)
            }
            Err(e) => Err(self.fail(e, None, format!("Failed to load {}", endpoint.plural))),
        }
    }

    /// Re-run the most recent fetch with the same query.
    pub async fn refetch(&self) -> Result<FetchOutcome, CoreError> {
        let query = self.last_query.load_full();
        self.fetch(&query).await
    }

    /// POST a new entity and insert the server's copy at this collection's
    /// placement.
    pub async fn create<B: Serialize + Sync>(&self, input: &B) -> Result<Arc<E>, CoreError> {
        let endpoint = E::ENDPOINT;
        if E::PLACEMENT == Placement::ReadOnly {
            return Err(self.unsupported("create"));
        }
        let _guard = self.pending.begin(OpKind::Create, None);

        match self.api.create::<E, B>(&endpoint, input).await {
            Ok(mutation) => {
                let entity = self.cache.insert(mutation.entity, E::PLACEMENT);
                info!(id = %entity.key(), "created {}", endpoint.entity);
                self.notify(Notification::success(
                    endpoint.plural,
                    mutation
                        .message
                        .unwrap_or_else(|| format!("{} created", capitalized(endpoint.entity))),
                ));
                Ok(entity)
            }
            Err(e) => Err(self.fail(e, None, format!("Failed to create {}", endpoint.entity))),
        }
    }

    /// PUT a patch and replace the cached entity with the server's version.
    pub async fn update<B: Serialize + Sync>(
        &self,
        id: &E::Key,
        patch: &B,
    ) -> Result<Arc<E>, CoreError> {
        let endpoint = E::ENDPOINT;
        if E::PLACEMENT == Placement::ReadOnly {
            return Err(self.unsupported("update"));
        }
        let _guard = self.pending.begin(OpKind::Update, Some(id.to_string()));

        match self.api.update::<E, B>(&endpoint, id.as_ref(), patch).await {
            Ok(mutation) => {
                let entity = self.patch_in(id, mutation.entity)?;
                info!(%id, "updated {}", endpoint.entity);
                self.notify(Notification::success(
                    endpoint.plural,
                    mutation
                        .message
                        .unwrap_or_else(|| format!("{} updated", capitalized(endpoint.entity))),
                ));
                Ok(entity)
            }
            Err(e) => Err(self.fail(e, Some(id), format!("Failed to update {}", endpoint.entity))),
        }
    }

    /// DELETE an entity and splice it out of the cache. Returns the removed
    /// entry. No confirmation happens here.
    pub async fn delete(&self, id: &E::Key) -> Result<Arc<E>, CoreError> {
        let endpoint = E::ENDPOINT;
        if E::PLACEMENT == Placement::ReadOnly {
            return Err(self.unsupported("delete"));
        }
        let _guard = self.pending.begin(OpKind::Delete, Some(id.to_string()));

        match self.api.delete(&endpoint, id.as_ref()).await {
            Ok(ack) => {
                let removed = self.splice_out(id)?;
                info!(%id, "deleted {}", endpoint.entity);
                self.notify(Notification::success(
                    endpoint.plural,
                    ack.message
                        .unwrap_or_else(|| format!("{} deleted", capitalized(endpoint.entity))),
                ));
                Ok(removed)
            }
            Err(e) => Err(self.fail(e, Some(id), format!("Failed to delete {}", endpoint.entity))),
        }
    }

    /// Run a single-entity transition (`PATCH /:id/approve` and friends).
    /// The cache is patched by id, and only on success.
    pub async fn action(
        &self,
        id: &E::Key,
        route: &ActionRoute,
        effect: ActionEffect,
        body: Option<&Value>,
    ) -> Result<ActionOutcome<E>, CoreError> {
        let endpoint = E::ENDPOINT;
        let _guard = self.pending.begin(OpKind::Action, Some(id.to_string()));

        let (outcome, message) = match effect {
            ActionEffect::Replace => {
                match self.api.action::<E>(&endpoint, id.as_ref(), route, body).await {
                    Ok(mutation) => (
                        ActionOutcome::Replaced(self.patch_in(id, mutation.entity)?),
                        mutation.message,
                    ),
                    Err(e) => return Err(self.action_failed(e, id, route)),
                }
            }
            ActionEffect::Remove => {
                match self.api.action_ack(&endpoint, id.as_ref(), route, body).await {
                    Ok(ack) => (ActionOutcome::Removed(self.splice_out(id)?), ack.message),
                    Err(e) => return Err(self.action_failed(e, id, route)),
                }
            }
        };

        info!(%id, action = route.suffix, "{} {}", endpoint.entity, route.past);
        self.notify(Notification::success(
            endpoint.plural,
            message.unwrap_or_else(|| format!("{} {}", capitalized(endpoint.entity), route.past)),
        ));
        Ok(outcome)
    }

    /// Supersede any in-flight fetch: its response will be discarded.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Invalidate and drop the cached data, as when a view goes away.
    pub fn reset(&self) {
        self.invalidate();
        self.cache.clear();
        self.meta.store(Arc::new(PageMeta::new()));
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current cached sequence, in server order.
    pub fn snapshot(&self) -> Snapshot<E> {
        self.cache.snapshot()
    }

    pub fn subscribe(&self) -> EntityStream<E> {
        EntityStream::new(self.cache.subscribe())
    }

    pub fn get(&self, id: &E::Key) -> Option<Arc<E>> {
        self.cache.get(id)
    }

    /// Like [`get`](Self::get), but a miss is a `NotFound` error.
    pub fn require(&self, id: &E::Key) -> Result<Arc<E>, CoreError> {
        self.get(id).ok_or_else(|| not_found::<E>(id))
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bumped on every cache change.
    pub fn version(&self) -> u64 {
        self.cache.version()
    }

    /// Top-level fields that came with the last applied list response.
    pub fn meta(&self) -> Arc<PageMeta> {
        self.meta.load_full()
    }

    /// Client-side filtered and ordered projection of the cache.
    pub fn view(&self, filter: &ViewFilter) -> Vec<Arc<E>>
    where
        E: Facets,
    {
        filter.apply(&self.snapshot())
    }

    // ── In-flight tracking ───────────────────────────────────────────

    /// `true` while any operation on this store is outstanding.
    pub fn busy(&self) -> bool {
        self.pending.is_busy()
    }

    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.pending.subscribe_busy()
    }

    pub fn pending(&self) -> Vec<PendingOp> {
        self.pending.list()
    }

    pub fn is_pending(&self, kind: OpKind) -> bool {
        self.pending.is_pending(kind)
    }

    /// `true` while an item-level operation on `id` is outstanding.
    pub fn is_pending_for(&self, id: &E::Key) -> bool {
        self.pending.is_pending_for(id.as_ref())
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    fn patch_in(&self, id: &E::Key, entity: E) -> Result<Arc<E>, CoreError> {
        self.cache
            .replace_one(id, entity)
            .ok_or_else(|| self.stale_id(id))
    }

    fn splice_out(&self, id: &E::Key) -> Result<Arc<E>, CoreError> {
        self.cache.remove(id).ok_or_else(|| self.stale_id(id))
    }

    /// The backend accepted the change but the cache has no such entity.
    fn stale_id(&self, id: &E::Key) -> CoreError {
        let endpoint = E::ENDPOINT;
        warn!(%id, "{} not in cache; leaving it unchanged", endpoint.entity);
        self.notify(Notification::warning(
            endpoint.plural,
            format!(
                "{} {id} is no longer in the list; refresh to see the latest",
                capitalized(endpoint.entity)
            ),
        ));
        not_found::<E>(id)
    }

    fn action_failed(&self, err: schoolhub_api::Error, id: &E::Key, route: &ActionRoute) -> CoreError {
        self.fail(
            err,
            Some(id),
            format!("Failed to {} {}", route.name, E::ENDPOINT.entity),
        )
    }

    /// Notify with the server's message (or `fallback`) and translate.
    fn fail(&self, err: schoolhub_api::Error, id: Option<&E::Key>, fallback: String) -> CoreError {
        let endpoint = E::ENDPOINT;
        warn!(error = %err, "{} request failed", endpoint.entity);
        let message = err.server_message().map_or(fallback, str::to_owned);
        self.notify(Notification::error(endpoint.plural, message));

        match id {
            Some(id) if err.is_not_found() => not_found::<E>(id),
            _ => err.into(),
        }
    }

    fn unsupported(&self, operation: &str) -> CoreError {
        let endpoint = E::ENDPOINT;
        self.notify(Notification::error(
            endpoint.plural,
            format!("Failed to {operation} {}", endpoint.entity),
        ));
        CoreError::Unsupported {
            operation: operation.into(),
            entity_type: endpoint.entity.into(),
        }
    }
}

fn not_found<E: Resource>(id: &E::Key) -> CoreError {
    CoreError::NotFound {
        entity_type: capitalized(E::ENDPOINT.entity),
        identifier: id.to_string(),
    }
}

/// "book request" -> "Book request".
pub(crate) fn capitalized(noun: &str) -> String {
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
