//! Command dispatch: bridges CLI args -> portal stores -> output formatting.

pub mod announcements;
pub mod attendance;
pub mod config_cmd;
pub mod dashboard;
pub mod events;
pub mod fees;
pub mod librarians;
pub mod library;
pub mod timetable;
pub mod util;

use schoolhub_core::Portal;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, portal: &Portal, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Announcements(args) => announcements::handle(portal, args, global).await,
        Command::Events(args) => events::handle(portal, args, global).await,
        Command::Library(args) => library::handle(portal, args, global).await,
        Command::Librarians(args) => librarians::handle(portal, args, global).await,
        Command::Fees(args) => fees::handle(portal, args, global).await,
        Command::Timetable(args) => timetable::handle(portal, args, global).await,
        Command::Dashboard => dashboard::handle(portal, global).await,
        Command::Attendance(args) => attendance::handle(portal, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
