// ── Fee structure domain types ──

use chrono::{DateTime, Utc};
use schoolhub_api::Endpoint;
use schoolhub_api::endpoints::FEE_STRUCTURES;
use serde::{Deserialize, Serialize};

use super::common::{Extra, Record, lenient};
use super::entity_id::EntityId;
use super::{Placement, Resource};
use crate::view::{Facets, parse_loose_date};

/// One line of a fee structure (tuition, transport, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeComponent {
    pub name: String,
    pub amount: f64,
    #[serde(flatten)]
    pub extra: Extra,
}

pub type FeeStructure = Record<FeeStructureFields>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStructureFields {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "class", default, deserialize_with = "lenient")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub academic_year: Option<String>,
    /// Absent when the backend omits the list or any line is malformed.
    #[serde(default, deserialize_with = "lenient")]
    pub components: Option<Vec<FeeComponent>>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub due_date: Option<String>,
}

impl FeeStructureFields {
    pub fn components(&self) -> &[FeeComponent] {
        self.components.as_deref().unwrap_or_default()
    }

    /// The backend's total, or the sum of the components when it sent none.
    pub fn total(&self) -> f64 {
        self.total_amount
            .unwrap_or_else(|| self.components().iter().map(|c| c.amount).sum())
    }
}

impl Resource for FeeStructure {
    type Key = EntityId;

    const ENDPOINT: Endpoint = FEE_STRUCTURES;
    const PLACEMENT: Placement = Placement::Append;

    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Facets for FeeStructureFields {
    fn haystack(&self) -> Vec<&str> {
        [&self.name, &self.class_name, &self.academic_year]
            .into_iter()
            .filter_map(Option::as_deref)
            .collect()
    }

    fn category(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        self.due_date.as_deref().and_then(parse_loose_date)
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
    fn total_falls_back_to_component_sum() {
        let fee: FeeStructure = serde_json::from_value(json!({
            "_id": "f1",
            "name": "Grade 10 (2025)",
            "class": "10",
            "components": [
                { "name": "Tuition", "amount": 1200.0 },
                { "name": "Transport", "amount": 300.5 }
            ]
        }))
        .unwrap();
        assert!((fee.total() - 1500.5).abs() < f64::EPSILON);
        assert_eq!(fee.class_name.as_deref(), Some("10"));
    }

    #[test]
    fn malformed_components_keep_the_record() {
        let raw = json!({
            "_id": "f2",
            "components": [{ "label": "Tuition" }],
            "totalAmount": null
        });
        let fee: FeeStructure = serde_json::from_value(raw.clone()).unwrap();
        assert!(fee.components().is_empty());
        assert!(fee.total().abs() < f64::EPSILON);
        assert_eq!(serde_json::to_value(&fee).unwrap(), raw);
    }
}
