// ── Ordered reactive entity collection ──
//
// The cached sequence of one backend collection, in server order.
// Snapshots are published through a `watch` channel so readers never
// block writers; every change bumps a version counter.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{Placement, Resource};

/// A point-in-time view of a collection, cheap to clone.
pub type Snapshot<E> = Arc<Vec<Arc<E>>>;

/// A reactive, ordered collection for a single entity type.
///
/// All writes go through `send_if_modified`, so a patch that matches no
/// entity neither wakes subscribers nor bumps the version.
pub(crate) struct EntityCollection<E: Resource> {
    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full ordered snapshot.
    snapshot: watch::Sender<Snapshot<E>>,
}

impl<E: Resource> EntityCollection<E> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self { version, snapshot }
    }

    /// Replace the whole sequence if `still_current()` holds at the moment
    /// of writing. Returns whether the write happened.
    pub(crate) fn replace_if(&self, items: Vec<E>, still_current: impl FnOnce() -> bool) -> bool {
        let applied = self.snapshot.send_if_modified(|snap| {
            if !still_current() {
                return false;
            }
            *snap = Arc::new(items.into_iter().map(Arc::new).collect());
            true
        });
        if applied {
            self.bump_version();
        }
        applied
    }

    /// Insert a new entity at the given placement.
    pub(crate) fn insert(&self, entity: E, placement: Placement) -> Arc<E> {
        let entity = Arc::new(entity);
        self.snapshot.send_modify(|snap| {
            let mut next = Vec::with_capacity(snap.len() + 1);
            match placement {
                Placement::Prepend => {
                    next.push(Arc::clone(&entity));
                    next.extend(snap.iter().cloned());
                }
                Placement::Append | Placement::ReadOnly => {
                    next.extend(snap.iter().cloned());
                    next.push(Arc::clone(&entity));
                }
            }
            *snap = Arc::new(next);
        });
        self.bump_version();
        entity
    }

    /// Swap the entity keyed `key` for `entity`, in place. Returns the new
    /// entry, or `None` (cache untouched) when nothing matched.
    pub(crate) fn replace_one(&self, key: &E::Key, entity: E) -> Option<Arc<E>> {
        let entity = Arc::new(entity);
        let replaced = self.snapshot.send_if_modified(|snap| {
            let Some(pos) = snap.iter().position(|e| e.key() == key) else {
                return false;
            };
            let mut next: Vec<Arc<E>> = snap.iter().cloned().collect();
            next[pos] = Arc::clone(&entity);
            *snap = Arc::new(next);
            true
        });
        if !replaced {
            return None;
        }
        self.bump_version();
        Some(entity)
    }

    /// Splice out the entity keyed `key`. Others keep their order.
    pub(crate) fn remove(&self, key: &E::Key) -> Option<Arc<E>> {
        let mut removed = None;
        self.snapshot.send_if_modified(|snap| {
            let Some(pos) = snap.iter().position(|e| e.key() == key) else {
                return false;
            };
            let mut next: Vec<Arc<E>> = snap.iter().cloned().collect();
            removed = Some(next.remove(pos));
            *snap = Arc::new(next);
            true
        });
        if removed.is_some() {
            self.bump_version();
        }
        removed
    }

    /// Look up an entity by key.
    pub(crate) fn get(&self, key: &E::Key) -> Option<Arc<E>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|e| e.key() == key)
            .cloned()
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Snapshot<E> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Snapshot<E>> {
        self.snapshot.subscribe()
    }

    /// Remove all entities.
    pub(crate) fn clear(&self) {
        let cleared = self.snapshot.send_if_modified(|snap| {
            if snap.is_empty() {
                return false;
            }
            *snap = Arc::new(Vec::new());
            true
        });
        if cleared {
            self.bump_version();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{EntityId, Event};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn event(id: &str, title: &str) -> Event {
        serde_json::from_value(json!({ "_id": id, "title": title })).unwrap()
    }

    fn ids(col: &EntityCollection<Event>) -> Vec<String> {
        col.snapshot().iter().map(|e| e.id.to_string()).collect()
    }

    fn seeded() -> EntityCollection<Event> {
        let col = EntityCollection::new();
        assert!(col.replace_if(
            vec![event("e1", "Sports Day"), event("e2", "Science Fair"), event("e3", "PTA")],
            || true,
        ));
        col
    }

    #[test]
    fn replace_if_respects_guard() {
        let col = seeded();
        assert!(!col.replace_if(vec![], || false));
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn insert_honours_placement() {
        let col = seeded();
        col.insert(event("e0", "Orientation"), Placement::Prepend);
        col.insert(event("e4", "Graduation"), Placement::Append);
        assert_eq!(ids(&col), ["e0", "e1", "e2", "e3", "e4"]);
    }

    #[test]
    fn replace_one_keeps_position() {
        let col = seeded();
        let updated = col
            .replace_one(&EntityId::from("e2"), event("e2", "Science Fair (moved)"))
            .unwrap();
        assert_eq!(updated.title.as_deref(), Some("Science Fair (moved)"));
        assert_eq!(ids(&col), ["e1", "e2", "e3"]);
        assert_eq!(
            col.get(&EntityId::from("e2")).unwrap().title.as_deref(),
            Some("Science Fair (moved)")
        );
    }

    #[test]
    fn replace_one_unknown_key_is_a_no_op() {
        let col = seeded();
        let before = col.version();
        assert!(col.replace_one(&EntityId::from("nope"), event("nope", "x")).is_none());
        assert_eq!(col.version(), before);
        assert_eq!(ids(&col), ["e1", "e2", "e3"]);
    }

    #[test]
    fn remove_splices_exactly_one() {
        let col = seeded();
        let removed = col.remove(&EntityId::from("e2")).unwrap();
        assert_eq!(removed.title.as_deref(), Some("Science Fair"));
        assert_eq!(ids(&col), ["e1", "e3"]);
        assert!(col.remove(&EntityId::from("e2")).is_none());
    }

    #[test]
    fn clear_empties_everything() {
        let col = seeded();
        col.clear();
        assert_eq!(col.len(), 0);
        assert!(col.snapshot().is_empty());
    }

    #[test]
    fn subscribers_see_mutations() {
        let col = seeded();
        let mut rx = col.subscribe();
        rx.mark_unchanged();

        col.remove(&EntityId::from("e1"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 2);

        col.remove(&EntityId::from("missing"));
        assert!(!rx.has_changed().unwrap());
    }
}
