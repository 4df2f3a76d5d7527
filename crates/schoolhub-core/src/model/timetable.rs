// ── Teacher timetable domain type ──

use schoolhub_api::Endpoint;
use schoolhub_api::endpoints::TEACHER_TIMETABLE;
use serde::Deserialize;

use super::common::{Record, lenient};
use super::entity_id::EntityId;
use super::{Placement, Resource};
use crate::view::Facets;

/// One period in the signed-in teacher's weekly timetable.
pub type TimetableSlot = Record<TimetableSlotFields>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableSlotFields {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient")]
    pub day: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub period: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub subject: Option<String>,
    #[serde(rename = "class", default, deserialize_with = "lenient")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub room: Option<String>,
}

impl Resource for TimetableSlot {
    type Key = EntityId;

    const ENDPOINT: Endpoint = TEACHER_TIMETABLE;
    const PLACEMENT: Placement = Placement::ReadOnly;

    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Facets for TimetableSlotFields {
    fn haystack(&self) -> Vec<&str> {
        [&self.day, &self.subject, &self.class_name, &self.room]
            .into_iter()
            .filter_map(Option::as_deref)
            .collect()
    }

    fn category(&self) -> Option<&str> {
        self.day.as_deref()
    }

    fn title(&self) -> &str {
        self.subject
            .as_deref()
            .or(self.day.as_deref())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn slot_without_day_is_kept() {
        let raw = json!({ "_id": "t1", "period": 3, "subject": "Physics", "class": "10A" });
        let slot: TimetableSlot = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(slot.day, None);
        assert_eq!(slot.category(), None);
        assert_eq!(slot.class_name.as_deref(), Some("10A"));
        assert_eq!(serde_json::to_value(&slot).unwrap(), raw);
    }
}
