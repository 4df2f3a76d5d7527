// ── Remote collection stores ──
//
// One store per backend collection, each owning its cached data, its
// in-flight request tokens and a handle to the shared client and
// notifier. Stores never coordinate with each other.

mod actions;
mod collection;
mod document;
mod export;
mod resource;
mod tokens;

pub use collection::Snapshot;
pub use document::DocumentStore;
pub use export::ExportStore;
pub use resource::{ActionEffect, ActionOutcome, FetchOutcome, ResourceStore};
pub use tokens::{OpKind, PendingOp};
