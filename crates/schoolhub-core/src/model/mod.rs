// ── Domain model ──
//
// One record type per backend collection. A record is the server payload
// as received with a typed view over the fields this client reads; only
// `_id` is required, and a cached entity re-serializes to what the
// backend sent.

pub mod common;
pub mod entity_id;

pub mod announcement;
pub mod dashboard;
pub mod event;
pub mod fee;
pub mod librarian;
pub mod library;
pub mod timetable;

use std::fmt;
use std::hash::Hash;

use schoolhub_api::Endpoint;
use serde::de::DeserializeOwned;

// ── Re-exports ──────────────────────────────────────────────────────

pub use entity_id::EntityId;

pub use common::{Extra, Record, Ref};

pub use announcement::{Announcement, AnnouncementFields};
pub use dashboard::{DashboardAnalytics, DashboardFields};
pub use event::{Event, EventFields};
pub use fee::{FeeComponent, FeeStructure, FeeStructureFields};
pub use librarian::{Librarian, LibrarianFields};
pub use library::{Book, BookFields, BookIssue, BookIssueFields, BookRequest, BookRequestFields};
pub use timetable::{TimetableSlot, TimetableSlotFields};

/// Where `create` inserts the server's new entity in the cached sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Append,
    Prepend,
    /// The collection is never written from this client.
    ReadOnly,
}

/// A record type served by one backend collection.
///
/// The store never looks past [`key`](Resource::key): every other field is
/// the server's business.
pub trait Resource: DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    type Key: Clone + Eq + Hash + fmt::Display + AsRef<str> + Send + Sync + 'static;

    /// Collection path, envelope shapes and user-facing nouns.
    const ENDPOINT: Endpoint;

    const PLACEMENT: Placement;

    fn key(&self) -> &Self::Key;
}
