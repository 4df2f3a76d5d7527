// Backend collection descriptors
//
// One `Endpoint` per REST collection. The path is relative to the
// configured base URL; `/path` serves list/create and `/path/:id` serves
// item-level mutation.

use reqwest::Method;

use crate::envelope::{ItemShape, ListShape};

/// Static description of one backend resource collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Singular entity noun used in messages ("announcement").
    pub entity: &'static str,
    /// Plural noun used in messages ("announcements").
    pub plural: &'static str,
    /// Collection path relative to the base URL ("library/books").
    pub path: &'static str,
    pub list: ListShape,
    pub item: ItemShape,
}

impl Endpoint {
    /// Path segments of the collection.
    pub fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

/// A single-entity state transition such as `PATCH /library/requests/:id/approve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRoute {
    /// Verb phrase used in failure messages ("approve").
    pub name: &'static str,
    /// Completion phrase used in success messages ("approved").
    pub past: &'static str,
    pub method: Method,
    /// Path segment appended after the id.
    pub suffix: &'static str,
}

// ── Collections ─────────────────────────────────────────────────────

pub const ANNOUNCEMENTS: Endpoint = Endpoint {
    entity: "announcement",
    plural: "announcements",
    path: "announcements",
    list: ListShape::Field("announcements"),
    item: ItemShape::Field("announcement"),
};

pub const EVENTS: Endpoint = Endpoint {
    entity: "event",
    plural: "events",
    path: "events",
    list: ListShape::Bare,
    item: ItemShape::Field("event"),
};

pub const LIBRARY_BOOKS: Endpoint = Endpoint {
    entity: "book",
    plural: "books",
    path: "library/books",
    list: ListShape::Field("books"),
    item: ItemShape::Field("book"),
};

pub const LIBRARY_REQUESTS: Endpoint = Endpoint {
    entity: "book request",
    plural: "book requests",
    path: "library/requests",
    list: ListShape::Field("requests"),
    item: ItemShape::Field("request"),
};

pub const LIBRARY_ISSUES: Endpoint = Endpoint {
    entity: "book issue",
    plural: "book issues",
    path: "library/issues",
    list: ListShape::Field("issues"),
    item: ItemShape::Field("issue"),
};

pub const LIBRARIANS: Endpoint = Endpoint {
    entity: "librarian",
    plural: "librarians",
    path: "librarians",
    list: ListShape::Field("librarians"),
    item: ItemShape::Field("librarian"),
};

pub const FEE_STRUCTURES: Endpoint = Endpoint {
    entity: "fee structure",
    plural: "fee structures",
    path: "fees/structures",
    list: ListShape::Field("feeStructures"),
    item: ItemShape::Field("feeStructure"),
};

pub const TEACHER_TIMETABLE: Endpoint = Endpoint {
    entity: "timetable slot",
    plural: "timetable",
    path: "teacher/timetable",
    list: ListShape::Field("timetable"),
    item: ItemShape::Bare,
};

/// Single-document resource; `list` is unused.
pub const DASHBOARD_ANALYTICS: Endpoint = Endpoint {
    entity: "dashboard analytics",
    plural: "dashboard analytics",
    path: "dashboard/analytics",
    list: ListShape::Bare,
    item: ItemShape::Field("analytics"),
};

/// Binary spreadsheet download.
pub const ATTENDANCE_SUMMARY_EXPORT: &str = "attendance/summary/export";

// ── Actions ─────────────────────────────────────────────────────────

pub const PIN: ActionRoute = ActionRoute {
    name: "toggle pin for",
    past: "pin updated",
    method: Method::PATCH,
    suffix: "pin",
};

pub const RSVP: ActionRoute = ActionRoute {
    name: "RSVP to",
    past: "RSVP recorded",
    method: Method::POST,
    suffix: "rsvp",
};

pub const APPROVE: ActionRoute = ActionRoute {
    name: "approve",
    past: "approved",
    method: Method::PATCH,
    suffix: "approve",
};

pub const REJECT: ActionRoute = ActionRoute {
    name: "reject",
    past: "rejected",
    method: Method::PATCH,
    suffix: "reject",
};

pub const RETURN: ActionRoute = ActionRoute {
    name: "return",
    past: "returned",
    method: Method::PATCH,
    suffix: "return",
};
