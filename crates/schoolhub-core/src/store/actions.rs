// ── Per-collection state transitions ──
//
// Thin typed wrappers over `ResourceStore::action`, one per backend
// transition route.

use std::sync::Arc;

use schoolhub_api::endpoints::{APPROVE, PIN, REJECT, RETURN, RSVP};
use serde_json::json;

use super::resource::{ActionEffect, ActionOutcome, ResourceStore};
use crate::error::CoreError;
use crate::model::{Announcement, BookIssue, BookRequest, EntityId, Event};

impl ResourceStore<Announcement> {
    /// Pin or unpin. The backend flips the flag and returns the announcement.
    pub async fn toggle_pin(&self, id: &EntityId) -> Result<Arc<Announcement>, CoreError> {
        self.action(id, &PIN, ActionEffect::Replace, None)
            .await
            .map(ActionOutcome::into_inner)
    }
}

impl ResourceStore<Event> {
    /// Record the caller's RSVP. `status` (e.g. `going`, `maybe`) is sent
    /// only when given; the backend defaults to attending.
    pub async fn rsvp(&self, id: &EntityId, status: Option<&str>) -> Result<Arc<Event>, CoreError> {
        let body = status.map(|s| json!({ "status": s }));
        self.action(id, &RSVP, ActionEffect::Replace, body.as_ref())
            .await
            .map(ActionOutcome::into_inner)
    }
}

impl ResourceStore<BookRequest> {
    /// Approve a pending request. It leaves the pending list; the removed
    /// request is returned.
    pub async fn approve(&self, id: &EntityId) -> Result<Arc<BookRequest>, CoreError> {
        self.action(id, &APPROVE, ActionEffect::Remove, None)
            .await
            .map(ActionOutcome::into_inner)
    }

    /// Reject a pending request, optionally with a reason for the student.
    pub async fn reject(
        &self,
        id: &EntityId,
        reason: Option<&str>,
    ) -> Result<Arc<BookRequest>, CoreError> {
        let body = reason.map(|r| json!({ "reason": r }));
        self.action(id, &REJECT, ActionEffect::Remove, body.as_ref())
            .await
            .map(ActionOutcome::into_inner)
    }
}

impl ResourceStore<BookIssue> {
    /// Mark an issued book as returned. The issue stays in the list with
    /// the server's updated status.
    pub async fn return_book(&self, id: &EntityId) -> Result<Arc<BookIssue>, CoreError> {
        self.action(id, &RETURN, ActionEffect::Replace, None)
            .await
            .map(ActionOutcome::into_inner)
    }
}
