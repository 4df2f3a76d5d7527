// ── Derived views over cached collections ──
//
// Client-side search, category match and ordering applied to a store
// snapshot without re-querying the backend. Pure functions of
// (snapshot, filter): the same inputs always give the same sequence.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use strum::{Display, EnumString};

/// The fields of a record that derived views look at.
pub trait Facets {
    /// Text fields matched by a search.
    fn haystack(&self) -> Vec<&str>;

    fn category(&self) -> Option<&str> {
        None
    }

    /// The date a record sorts by (event date, creation time, due date).
    fn date(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Label used for alphabetical ordering.
    fn title(&self) -> &str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum SortOrder {
    /// Keep the backend's order.
    #[default]
    Server,
    /// Oldest first; undated records last.
    DateAsc,
    /// Newest first; undated records last.
    DateDesc,
    /// Case-insensitive by title.
    Title,
}

/// Parameters of a derived view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub search: Option<String>,
    /// Exact category (case-insensitive). `"all"` matches everything.
    pub category: Option<String>,
    pub order: SortOrder,
}

impl ViewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn matches<E: Facets>(&self, entity: &E) -> bool {
        self.matches_search(entity) && self.matches_category(entity)
    }

    /// Filter and order a snapshot. Sorting is stable, so ties keep the
    /// backend's relative order.
    pub fn apply<E: Facets>(&self, items: &[Arc<E>]) -> Vec<Arc<E>> {
        let mut out: Vec<Arc<E>> = items
            .iter()
            .filter(|e| self.matches::<E>(e))
            .cloned()
            .collect();

        match self.order {
            SortOrder::Server => {}
            SortOrder::DateAsc => out.sort_by(|a, b| by_date(a.date(), b.date(), false)),
            SortOrder::DateDesc => out.sort_by(|a, b| by_date(a.date(), b.date(), true)),
            SortOrder::Title => out.sort_by_cached_key(|e| e.title().to_lowercase()),
        }
        out
    }

    fn matches_search<E: Facets>(&self, entity: &E) -> bool {
        let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return true;
        };
        let needle = needle.to_lowercase();
        entity
            .haystack()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_category<E: Facets>(&self, entity: &E) -> bool {
        let Some(wanted) = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
        else {
            return true;
        };
        entity
            .category()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case(wanted))
    }
}

fn by_date(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, newest_first: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if newest_first => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Parse the date formats the backend emits: RFC 3339 timestamps, naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as UTC) and plain `YYYY-MM-DD`.
pub fn parse_loose_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
