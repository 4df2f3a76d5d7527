// ── Library circulation domain types ──
//
// Books, pending borrow requests and active issues. Requests and issues
// reference a book and a student, either by id or as populated documents.

use chrono::{DateTime, Utc};
use schoolhub_api::Endpoint;
use schoolhub_api::endpoints::{LIBRARY_BOOKS, LIBRARY_ISSUES, LIBRARY_REQUESTS};
use serde::Deserialize;

use super::common::{Record, Ref, lenient};
use super::entity_id::EntityId;
use super::{Placement, Resource};
use crate::view::{Facets, parse_loose_date};

// ── Book ────────────────────────────────────────────────────────────

pub type Book = Record<BookFields>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookFields {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub isbn: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_copies: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub available_copies: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
}

impl Resource for Book {
    type Key = EntityId;

    const ENDPOINT: Endpoint = LIBRARY_BOOKS;
    const PLACEMENT: Placement = Placement::Prepend;

    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Facets for BookFields {
    fn haystack(&self) -> Vec<&str> {
        [&self.title, &self.author, &self.isbn]
            .into_iter()
            .filter_map(Option::as_deref)
            .collect()
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_loose_date)
    }

    fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

// ── BookRequest ─────────────────────────────────────────────────────

/// A student's request to borrow a book, awaiting librarian review.
pub type BookRequest = Record<BookRequestFields>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequestFields {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient")]
    pub book: Option<Ref>,
    #[serde(default, deserialize_with = "lenient")]
    pub student: Option<Ref>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
}

impl BookRequestFields {
    pub fn book_label(&self) -> &str {
        self.book.as_ref().map_or("-", Ref::label)
    }

    pub fn student_label(&self) -> &str {
        self.student.as_ref().map_or("-", Ref::label)
    }
}

impl Resource for BookRequest {
    type Key = EntityId;

    const ENDPOINT: Endpoint = LIBRARY_REQUESTS;
    const PLACEMENT: Placement = Placement::Append;

    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Facets for BookRequestFields {
    fn haystack(&self) -> Vec<&str> {
        vec![self.book_label(), self.student_label()]
    }

    fn category(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_loose_date)
    }

    fn title(&self) -> &str {
        self.book_label()
    }
}

// ── BookIssue ───────────────────────────────────────────────────────

/// A book currently (or formerly) lent to a student.
pub type BookIssue = Record<BookIssueFields>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookIssueFields {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient")]
    pub book: Option<Ref>,
    #[serde(default, deserialize_with = "lenient")]
    pub student: Option<Ref>,
    #[serde(default, deserialize_with = "lenient")]
    pub issue_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub return_date: Option<String>,
    /// `issued`, `returned` or `overdue`.
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub fine: Option<f64>,
}

impl BookIssueFields {
    pub fn book_label(&self) -> &str {
        self.book.as_ref().map_or("-", Ref::label)
    }

    pub fn student_label(&self) -> &str {
        self.student.as_ref().map_or("-", Ref::label)
    }

    pub fn is_returned(&self) -> bool {
        self.return_date.is_some() || self.status.as_deref() == Some("returned")
    }
}

impl Resource for BookIssue {
    type Key = EntityId;

    const ENDPOINT: Endpoint = LIBRARY_ISSUES;
    const PLACEMENT: Placement = Placement::Prepend;

    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Facets for BookIssueFields {
    fn haystack(&self) -> Vec<&str> {
        vec![self.book_label(), self.student_label()]
    }

    fn category(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        self.due_date.as_deref().and_then(parse_loose_date)
    }

    fn title(&self) -> &str {
        self.book_label()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn book_keeps_unknown_fields() {
        let raw = json!({
            "_id": "b1",
            "title": "Dune",
            "author": "Frank Herbert",
            "availableCopies": 2,
            "shelf": "F-12"
        });
        let book: Book = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(book.available_copies, Some(2));
        assert_eq!(book.get("shelf"), Some(&json!("F-12")));
        assert_eq!(serde_json::to_value(&book).unwrap(), raw);
    }

    #[test]
    fn issue_with_populated_refs() {
        let issue: BookIssue = serde_json::from_value(json!({
            "_id": "i1",
            "book": { "_id": "b1", "title": "Dune" },
            "student": "s7",
            "dueDate": "2025-03-15",
            "status": "issued"
        }))
        .unwrap();
        assert_eq!(issue.book_label(), "Dune");
        assert_eq!(issue.student_label(), "s7");
        assert!(!issue.is_returned());
    }

    #[test]
    fn request_round_trips_with_nulls() {
        let raw = json!({
            "_id": "r1",
            "book": { "_id": "b1", "title": "Dune", "copies": 3 },
            "student": null,
            "status": "pending"
        });
        let req: BookRequest = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(req.student_label(), "-");
        assert_eq!(serde_json::to_value(&req).unwrap(), raw);
    }

    #[test]
    fn issue_round_trips_returned_record() {
        let raw = json!({ "_id": "i2", "returnDate": "2025-03-10", "fine": 0 });
        let issue: BookIssue = serde_json::from_value(raw.clone()).unwrap();
        assert!(issue.is_returned());
        assert!(issue.fine.is_some_and(|f| f.abs() < f64::EPSILON));
        assert_eq!(serde_json::to_value(&issue).unwrap(), raw);
    }
}
