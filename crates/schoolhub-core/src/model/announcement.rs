// ── Announcement domain type ──

use chrono::{DateTime, Utc};
use schoolhub_api::Endpoint;
use schoolhub_api::endpoints::ANNOUNCEMENTS;
use serde::Deserialize;

use super::common::{Record, lenient};
use super::entity_id::EntityId;
use super::{Placement, Resource};
use crate::view::{Facets, parse_loose_date};

pub type Announcement = Record<AnnouncementFields>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementFields {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    /// `low`, `medium`, `high` or `urgent`.
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_pinned: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
}

impl AnnouncementFields {
    pub fn pinned(&self) -> bool {
        self.is_pinned == Some(true)
    }
}

impl Resource for Announcement {
    type Key = EntityId;

    const ENDPOINT: Endpoint = ANNOUNCEMENTS;
    const PLACEMENT: Placement = Placement::Prepend;

    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Facets for AnnouncementFields {
    fn haystack(&self) -> Vec<&str> {
        self.title.iter().chain(&self.content).map(String::as_str).collect()
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
