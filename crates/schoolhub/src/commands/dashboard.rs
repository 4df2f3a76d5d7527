//! Dashboard analytics.

use schoolhub_core::model::DashboardFields;
use schoolhub_core::{DashboardAnalytics, ListQuery, Portal};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, detail_block};

use super::util;

fn count(n: Option<u64>) -> String {
    n.map_or_else(|| "-".into(), |n| n.to_string())
}

fn amount(n: Option<f64>) -> String {
    n.map_or_else(|| "-".into(), |n| format!("{n:.2}"))
}

fn detail(d: &DashboardAnalytics) -> String {
    // Scalar extras the backend adds over time; nested blocks only show in JSON.
    let extras: Vec<(&str, String)> = d
        .raw()
        .iter()
        .filter(|(k, _)| !DashboardFields::KNOWN.contains(&k.as_str()))
        .filter(|(_, v)| !v.is_object() && !v.is_array())
        .map(|(k, v)| (k.as_str(), v.as_str().map_or_else(|| v.to_string(), str::to_owned)))
        .collect();

    let mut fields = vec![
        ("Students", count(d.total_students)),
        ("Teachers", count(d.total_teachers)),
        ("Classes", count(d.total_classes)),
        (
            "Attendance",
            d.attendance_rate
                .map_or_else(|| "-".into(), |r| format!("{r:.1}%")),
        ),
        ("Fees collected", amount(d.fees_collected)),
        ("Fees pending", amount(d.fees_pending)),
    ];
    fields.extend(extras);
    detail_block(&fields)
}

pub async fn handle(portal: &Portal, global: &GlobalOpts) -> Result<(), CliError> {
    let store = portal.dashboard();
    util::with_spinner("Loading dashboard", global, store.fetch(&ListQuery::default())).await?;

    let Some(analytics) = store.get() else {
        return Err(CliError::ApiError {
            status: None,
            message: "Backend returned no dashboard data".into(),
        });
    };
    let out = output::render_single(&global.output, analytics.as_ref(), detail, |_| {
        "dashboard".into()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_includes_scalar_extras() {
        let d: DashboardAnalytics = serde_json::from_value(serde_json::json!({
            "totalStudents": 420,
            "attendanceRate": 93.456,
            "activeNotices": 3,
            "recentActivity": [{"kind": "login"}],
        }))
        .unwrap_or_default();
        let text = detail(&d);
        assert!(text.contains("Students:"));
        assert!(text.contains("420"));
        assert!(text.contains("93.5%"));
        assert!(text.contains("activeNotices"));
        assert!(!text.contains("recentActivity"));
        assert!(!text.contains("totalStudents"));
    }
}
