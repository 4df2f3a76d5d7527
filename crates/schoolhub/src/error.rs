//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use schoolhub_config::ConfigError;
use schoolhub_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(schoolhub::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(schoolhub::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(schoolhub::auth_failed),
        help(
            "The session cookie is missing, expired or lacks permission.\n\
             Store a fresh one with: schoolhub config set-session"
        )
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(schoolhub::not_found),
        help("Run: schoolhub {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Cannot {operation} a {resource_type}")]
    #[diagnostic(
        code(schoolhub::unsupported),
        help("This collection is read-only.")
    )]
    Unsupported {
        operation: String,
        resource_type: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(schoolhub::api_error))]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(schoolhub::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(schoolhub::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: schoolhub config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(schoolhub::no_config),
        help(
            "Create a profile with: schoolhub config init\n\
             Or pass --base-url / set SCHOOLHUB_BASE_URL.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(schoolhub::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(schoolhub::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(schoolhub::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::PERMISSION,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

/// The list command that shows entities of `entity_type`.
fn list_command_for(entity_type: &str) -> String {
    match entity_type.to_lowercase().as_str() {
        "announcement" => "announcements list",
        "event" => "events list",
        "book" => "library books list",
        "book request" => "library requests list",
        "book issue" => "library issues list",
        "librarian" => "librarians list",
        "fee structure" => "fees list",
        "timetable slot" => "timetable",
        _ => "--help",
    }
    .into()
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout => CliError::Timeout,

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command_for(&entity_type),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Rejected {
                message,
                status: 401 | 403,
            } => CliError::AuthFailed { message },

            CoreError::Rejected { message, status } => CliError::ApiError {
                status: Some(status),
                message,
            },

            CoreError::Api {
                status: Some(status @ (401 | 403)),
                ..
            } => CliError::AuthFailed {
                message: format!("Backend refused the session (HTTP {status})"),
            },

            CoreError::Api { message, status } => CliError::ApiError { status, message },

            CoreError::Unsupported {
                operation,
                entity_type,
            } => CliError::Unsupported {
                operation,
                resource_type: entity_type,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                status: None,
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_points_at_the_right_list_command() {
        let err = CliError::from(CoreError::NotFound {
            entity_type: "Book request".into(),
            identifier: "r9".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        match err {
            CliError::NotFound { list_command, .. } => {
                assert_eq!(list_command, "library requests list");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn forbidden_maps_to_auth() {
        let err = CliError::from(CoreError::Rejected {
            message: "Admins only".into(),
            status: 403,
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert_eq!(err.to_string(), "Admins only");
    }
}
