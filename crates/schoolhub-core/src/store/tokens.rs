// ── In-flight request tokens ──
//
// Each store operation takes a token for its lifetime. The token set
// replaces a single busy flag: unrelated operations don't mask each
// other, and the store-wide `busy` flag is derived from "any token
// outstanding".

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use strum::Display;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OpKind {
    Fetch,
    Create,
    Update,
    Delete,
    Action,
    Export,
}

/// One outstanding operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOp {
    pub token: u64,
    pub kind: OpKind,
    /// Entity id for item-level operations.
    pub target: Option<String>,
}

pub(crate) struct PendingOps {
    next_token: AtomicU64,
    ops: DashMap<u64, PendingOp>,
    busy: watch::Sender<bool>,
}

impl PendingOps {
    pub(crate) fn new() -> Arc<Self> {
        let (busy, _) = watch::channel(false);
        Arc::new(Self {
            next_token: AtomicU64::new(1),
            ops: DashMap::new(),
            busy,
        })
    }

    /// Register an operation. It stays pending until the guard drops.
    pub(crate) fn begin(self: &Arc<Self>, kind: OpKind, target: Option<String>) -> PendingGuard {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.ops.insert(
            token,
            PendingOp {
                token,
                kind,
                target,
            },
        );
        self.sync_busy();
        PendingGuard {
            ops: Arc::clone(self),
            token,
        }
    }

    pub(crate) fn is_busy(&self) -> bool {
        !self.ops.is_empty()
    }

    pub(crate) fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    /// Outstanding operations, oldest first.
    pub(crate) fn list(&self) -> Vec<PendingOp> {
        let mut ops: Vec<PendingOp> = self.ops.iter().map(|r| r.value().clone()).collect();
        ops.sort_by_key(|op| op.token);
        ops
    }

    pub(crate) fn is_pending(&self, kind: OpKind) -> bool {
        self.ops.iter().any(|r| r.kind == kind)
    }

    pub(crate) fn is_pending_for(&self, target: &str) -> bool {
        self.ops
            .iter()
            .any(|r| r.target.as_deref() == Some(target))
    }

    fn finish(&self, token: u64) {
        self.ops.remove(&token);
        self.sync_busy();
    }

    // The closure runs under the watch lock and re-reads the token set,
    // so the last writer always publishes the current state.
    fn sync_busy(&self) {
        self.busy.send_if_modified(|busy| {
            let now = !self.ops.is_empty();
            if *busy == now {
                return false;
            }
            *busy = now;
            true
        });
    }
}

/// Keeps one operation registered; dropping it (on completion, error or
/// cancellation) releases the token.
pub(crate) struct PendingGuard {
    ops: Arc<PendingOps>,
    token: u64,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.ops.finish(self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_follows_token_set() {
        let ops = PendingOps::new();
        let busy = ops.subscribe_busy();
        assert!(!*busy.borrow());

        let a = ops.begin(OpKind::Delete, Some("e1".into()));
        let b = ops.begin(OpKind::Action, Some("e2".into()));
        assert!(ops.is_busy());
        assert!(*busy.borrow());
        assert!(ops.is_pending_for("e1"));
        assert!(ops.is_pending(OpKind::Action));

        drop(a);
        assert!(ops.is_busy());
        assert!(!ops.is_pending_for("e1"));
        assert!(ops.is_pending_for("e2"));

        drop(b);
        assert!(!ops.is_busy());
        assert!(!*busy.borrow());
    }

    #[test]
    fn list_is_ordered_by_token() {
        let ops = PendingOps::new();
        let _f = ops.begin(OpKind::Fetch, None);
        let _c = ops.begin(OpKind::Create, None);

        let kinds: Vec<OpKind> = ops.list().into_iter().map(|op| op.kind).collect();
        assert_eq!(kinds, [OpKind::Fetch, OpKind::Create]);
    }
}
