// ── School event domain type ──

use chrono::{DateTime, Utc};
use schoolhub_api::Endpoint;
use schoolhub_api::endpoints::EVENTS;
use serde::Deserialize;

use super::common::{Record, lenient};
use super::entity_id::EntityId;
use super::{Placement, Resource};
use crate::view::{Facets, parse_loose_date};

pub type Event = Record<EventFields>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFields {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Start date, `YYYY-MM-DD` or a full timestamp.
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rsvp_count: Option<u32>,
}

impl Resource for Event {
    type Key = EntityId;

    const ENDPOINT: Endpoint = EVENTS;
    const PLACEMENT: Placement = Placement::Append;

    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Facets for EventFields {
    fn haystack(&self) -> Vec<&str> {
        [&self.title, &self.description, &self.location]
            .into_iter()
            .filter_map(Option::as_deref)
            .collect()
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_loose_date)
    }

    fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn round_trips_payload() {
        let raw = json!({
            "_id": "e1",
            "title": "Sports Day",
            "date": "2025-03-01",
            "location": null,
            "rsvpCount": 12,
            "organiser": { "_id": "t1", "name": "Ms Iyer" }
        });
        let e: Event = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(e.rsvp_count, Some(12));
        assert_eq!(e.location, None);
        assert_eq!(serde_json::to_value(&e).unwrap(), raw);
    }

    #[test]
    fn untitled_event_still_sorts_by_date() {
        let e: Event = serde_json::from_value(json!({ "_id": "e2", "date": "2025-03-02" })).unwrap();
        assert!(e.date().is_some());
        assert!(e.haystack().is_empty());
    }
}
