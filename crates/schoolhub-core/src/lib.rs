//! Client-side data layer between `schoolhub-api` and front ends.
//!
//! - **[`ResourceStore<E>`]**: one per backend collection. Fetch, cache,
//!   create, update, delete and single-entity actions, with the server's
//!   response always winning. Failures surface as one [`Notification`] and
//!   a typed [`CoreError`]; the cache is only touched on success.
//!
//! - **Request tokens**: every in-flight operation holds its own token
//!   ([`PendingOp`]); the store-wide `busy()` flag is derived from them.
//!   Fetches carry a generation number so a superseded response never
//!   overwrites a newer one ([`FetchOutcome::Stale`]).
//!
//! - **[`EntityStream<E>`]**: subscription handle with `current()` /
//!   `latest()` / `changed()` for re-rendering on cache changes.
//!
//! - **Derived views** ([`view`]): pure client-side search, category and
//!   date ordering over a snapshot.
//!
//! - **[`Portal`]**: composition root owning the shared client, the
//!   injected [`Notifier`] and every store.

pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod portal;
pub mod requests;
pub mod store;
pub mod stream;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{PortalConfig, TlsVerification};
pub use error::CoreError;
pub use notify::{ChannelNotifier, Level, Notification, Notifier, TracingNotifier};
pub use portal::{Portal, RefreshFailure};
pub use requests::*;
pub use store::{
    ActionEffect, ActionOutcome, DocumentStore, ExportStore, FetchOutcome, OpKind, PendingOp,
    ResourceStore, Snapshot,
};
pub use stream::EntityStream;
pub use view::{Facets, SortOrder, ViewFilter};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Announcement, Book, BookIssue, BookRequest, DashboardAnalytics, EntityId, Event, Extra,
    FeeComponent, FeeStructure, Librarian, Placement, Record, Ref, Resource, TimetableSlot,
};

pub use schoolhub_api::{Blob, ListQuery, PageMeta};
