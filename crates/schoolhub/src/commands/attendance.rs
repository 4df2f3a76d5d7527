//! Attendance report downloads.

use std::path::{Path, PathBuf};

use bytesize::ByteSize;

use schoolhub_core::Portal;

use crate::cli::{AttendanceArgs, AttendanceCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

/// Where to write the export: `--out`, else the backend's suggested name
/// reduced to its final component.
fn target_path(out: Option<PathBuf>, suggested: Option<&str>, fallback: &str) -> PathBuf {
    out.unwrap_or_else(|| {
        let name = suggested
            .and_then(|s| Path::new(s).file_name())
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback);
        PathBuf::from(name)
    })
}

pub async fn handle(
    portal: &Portal,
    args: AttendanceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AttendanceCommand::Export { out, filter, force } => {
            let query = util::filter_query(&filter)?;
            let store = portal.attendance_summary();

            let blob =
                util::with_spinner("Downloading attendance summary", global, store.download(&query))
                    .await?;

            let path = target_path(out, blob.filename.as_deref(), store.default_filename());
            if path.exists() && !force {
                return Err(CliError::Validation {
                    field: "out".into(),
                    reason: format!("{} already exists (use --force to overwrite)", path.display()),
                });
            }
            std::fs::write(&path, &blob.bytes)?;

            if !global.quiet {
                let size = ByteSize::b(u64::try_from(blob.len()).unwrap_or(u64::MAX));
                eprintln!("Saved {} ({size})", path.display());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggested_name_is_stripped_to_file_name() {
        let path = target_path(None, Some("../../etc/report.xlsx"), "attendance-summary.xlsx");
        assert_eq!(path, PathBuf::from("report.xlsx"));
    }

    #[test]
    fn explicit_out_wins() {
        let path = target_path(
            Some(PathBuf::from("june.xlsx")),
            Some("report.xlsx"),
            "attendance-summary.xlsx",
        );
        assert_eq!(path, PathBuf::from("june.xlsx"));
    }

    #[test]
    fn falls_back_to_default() {
        let path = target_path(None, None, "attendance-summary.xlsx");
        assert_eq!(path, PathBuf::from("attendance-summary.xlsx"));
    }
}
