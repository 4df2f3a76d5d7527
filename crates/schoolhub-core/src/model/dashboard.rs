// ── Dashboard analytics document ──

use serde::Deserialize;

use super::common::{Record, lenient};

/// Headline numbers for the admin dashboard. A single document, not a
/// collection; chart series the backend adds stay in the raw payload.
pub type DashboardAnalytics = Record<DashboardFields>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFields {
    #[serde(default, deserialize_with = "lenient")]
    pub total_students: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_teachers: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_classes: Option<u64>,
    /// Percentage, 0-100.
    #[serde(default, deserialize_with = "lenient")]
    pub attendance_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub fees_collected: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub fees_pending: Option<f64>,
}

impl DashboardFields {
    /// Wire names of the typed fields.
    pub const KNOWN: &'static [&'static str] = &[
        "totalStudents",
        "totalTeachers",
        "totalClasses",
        "attendanceRate",
        "feesCollected",
        "feesPending",
    ];
}
