//! Teacher timetable (read-only).

use std::sync::Arc;

use tabled::Tabled;

use schoolhub_core::{Portal, TimetableSlot};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output::or_dash;

use super::util;

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Room")]
    room: String,
}

impl From<&Arc<TimetableSlot>> for SlotRow {
    fn from(s: &Arc<TimetableSlot>) -> Self {
        let time = match (s.start_time.as_deref(), s.end_time.as_deref()) {
            (Some(start), Some(end)) => format!("{start}-{end}"),
            (Some(start), None) => start.to_owned(),
            _ => "-".into(),
        };
        Self {
            day: or_dash(s.day.as_deref()),
            period: s.period.map(|p| p.to_string()).unwrap_or_default(),
            time,
            subject: or_dash(s.subject.as_deref()),
            class: or_dash(s.class_name.as_deref()),
            room: or_dash(s.room.as_deref()),
        }
    }
}

pub async fn handle(portal: &Portal, args: ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::list(portal.timetable(), &args, global, |s| SlotRow::from(s)).await
}
