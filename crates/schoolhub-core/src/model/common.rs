// ── Common types shared across the domain model ──

use std::ops::Deref;

use chrono::{DateTime, Utc};

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use super::entity_id::EntityId;
use crate::view::Facets;

/// A JSON object as the backend sent it.
pub type Extra = Map<String, Value>;

/// A backend document: the payload exactly as received plus a typed view
/// `F` over the fields this client reads.
///
/// Serializing a record writes the payload back untouched, so explicit
/// `null`s and fields `F` doesn't name survive a trip through the cache.
/// Field access goes through `Deref` to the typed view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record<F> {
    view: F,
    raw: Extra,
}

impl<F> Record<F> {
    /// The payload as received.
    pub fn raw(&self) -> &Extra {
        &self.raw
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.raw.get(field)
    }

    pub fn into_raw(self) -> Extra {
        self.raw
    }
}

impl<F> Deref for Record<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.view
    }
}

impl<'de, F: DeserializeOwned> Deserialize<'de> for Record<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Extra::deserialize(deserializer)?;
        let view = F::deserialize(Value::Object(raw.clone())).map_err(de::Error::custom)?;
        Ok(Self { view, raw })
    }
}

impl<F> Serialize for Record<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<F: Facets> Facets for Record<F> {
    fn haystack(&self) -> Vec<&str> {
        self.view.haystack()
    }

    fn category(&self) -> Option<&str> {
        self.view.category()
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        self.view.date()
    }

    fn title(&self) -> &str {
        self.view.title()
    }
}

/// Field deserializer for typed views: a value of the wrong shape reads
/// as absent instead of failing the whole record.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A reference to another document: either a bare id or the populated
/// document the backend joined in (`{ "_id": ..., "title": ... }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref {
    Id(EntityId),
    Populated {
        #[serde(rename = "_id")]
        id: EntityId,
        #[serde(flatten)]
        fields: Extra,
    },
}

impl Ref {
    pub fn id(&self) -> &EntityId {
        match self {
            Self::Id(id) | Self::Populated { id, .. } => id,
        }
    }

    /// Best human-readable label: `title`, then `name`, then the id.
    pub fn label(&self) -> &str {
        match self {
            Self::Id(id) => id.as_str(),
            Self::Populated { id, fields } => ["title", "name", "email"]
                .iter()
                .find_map(|k| fields.get(*k).and_then(Value::as_str))
                .unwrap_or(id.as_str()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
    struct Named {
        #[serde(default, deserialize_with = "lenient")]
        name: Option<String>,
    }

    #[test]
    fn record_serializes_payload_verbatim() {
        let raw = json!({ "_id": "x1", "name": null, "nested": { "a": [1, 2] } });
        let record: Record<Named> = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.name, None);
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn lenient_field_of_wrong_shape_reads_as_absent() {
        let record: Record<Named> = serde_json::from_value(json!({ "name": 42 })).unwrap();
        assert_eq!(record.name, None);
        assert_eq!(record.get("name"), Some(&json!(42)));
    }

    #[test]
    fn record_rejects_non_object_payload() {
        assert!(serde_json::from_value::<Record<Named>>(json!("x1")).is_err());
    }

    #[test]
    fn bare_id_reference() {
        let r: Ref = serde_json::from_value(json!("b1")).unwrap();
        assert_eq!(r, Ref::Id(EntityId::from("b1")));
        assert_eq!(r.label(), "b1");
    }

    #[test]
    fn populated_reference_prefers_title() {
        let r: Ref =
            serde_json::from_value(json!({ "_id": "b1", "title": "Dune", "author": "Herbert" }))
                .unwrap();
        assert_eq!(r.id().as_str(), "b1");
        assert_eq!(r.label(), "Dune");
    }

    #[test]
    fn populated_reference_falls_back_to_name() {
        let r: Ref = serde_json::from_value(json!({ "_id": "s4", "name": "Asha Rao" })).unwrap();
        assert_eq!(r.label(), "Asha Rao");
    }
}
