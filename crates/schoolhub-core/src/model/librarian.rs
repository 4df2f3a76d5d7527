// ── Librarian domain type ──

use schoolhub_api::Endpoint;
use schoolhub_api::endpoints::LIBRARIANS;
use serde::Deserialize;

use super::common::{Record, lenient};
use super::entity_id::EntityId;
use super::{Placement, Resource};
use crate::view::Facets;

pub type Librarian = Record<LibrarianFields>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarianFields {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub employee_id: Option<String>,
}

impl Resource for Librarian {
    type Key = EntityId;

    const ENDPOINT: Endpoint = LIBRARIANS;
    const PLACEMENT: Placement = Placement::Append;

    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Facets for LibrarianFields {
    fn haystack(&self) -> Vec<&str> {
        [&self.name, &self.email, &self.employee_id]
            .into_iter()
            .filter_map(Option::as_deref)
            .collect()
    }

    fn title(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
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
            "_id": "l1",
            "name": "R. Menon",
            "phone": null,
            "user": { "_id": "u9", "role": "librarian" }
        });
        let l: Librarian = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(l.name.as_deref(), Some("R. Menon"));
        assert_eq!(serde_json::to_value(&l).unwrap(), raw);
    }
}
