//! Clap derive structures for the `schoolhub` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use schoolhub_core::SortOrder;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// schoolhub -- command-line client for a SchoolHub backend
#[derive(Debug, Parser)]
#[command(
    name = "schoolhub",
    version,
    about = "Manage a SchoolHub school portal from the command line",
    long_about = "Command-line client for a SchoolHub school-management backend.\n\n\
        Lists and edits announcements, events, the library, librarians and\n\
        fee structures, shows the dashboard and downloads attendance reports.\n\
        Authenticates with an existing session cookie.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "SCHOOLHUB_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL, e.g. https://school.example/api (overrides profile)
    #[arg(long, short = 'u', env = "SCHOOLHUB_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Session cookie as name=value (overrides profile)
    #[arg(long, env = "SCHOOLHUB_SESSION", global = true, hide_env_values = true)]
    pub session_cookie: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SCHOOLHUB_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SCHOOLHUB_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SCHOOLHUB_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage announcements
    #[command(alias = "ann", alias = "a")]
    Announcements(AnnouncementsArgs),

    /// Manage school events
    #[command(alias = "ev", alias = "e")]
    Events(EventsArgs),

    /// Manage library books, borrow requests and issues
    #[command(alias = "lib")]
    Library(LibraryArgs),

    /// Manage librarian accounts
    Librarians(LibrariansArgs),

    /// Manage fee structures
    Fees(FeesArgs),

    /// Show the signed-in teacher's timetable
    #[command(alias = "tt")]
    Timetable(ListArgs),

    /// Show dashboard analytics
    #[command(alias = "dash")]
    Dashboard,

    /// Attendance reports
    Attendance(AttendanceArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Filtering shared by every list command.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Server-side search text
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Server-side category filter
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Server-side priority filter
    #[arg(long)]
    pub priority: Option<String>,

    /// Extra server-side filter as key=value (repeatable)
    #[arg(long, short = 'f', value_name = "KEY=VALUE")]
    pub filter: Vec<String>,

    /// Client-side substring match over the fetched rows
    #[arg(long = "match", short = 'm', value_name = "TEXT")]
    pub r#match: Option<String>,

    /// Client-side ordering: server, date-asc, date-desc or title
    #[arg(long, value_name = "ORDER", default_value_t, value_parser = SortOrder::from_str)]
    pub sort: SortOrder,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ANNOUNCEMENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AnnouncementsArgs {
    #[command(subcommand)]
    pub command: AnnouncementsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AnnouncementsCommand {
    /// List announcements
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one announcement
    Get {
        /// Announcement ID
        id: String,
    },

    /// Post a new announcement
    Create {
        /// Headline
        #[arg(long, required_unless_present = "from_file")]
        title: Option<String>,

        /// Body text
        #[arg(long, required_unless_present = "from_file")]
        content: Option<String>,

        /// Category (e.g. academic, sports)
        #[arg(long)]
        category: Option<String>,

        /// Priority (low, normal, high)
        #[arg(long)]
        priority: Option<String>,

        /// Recipients (all, students, teachers, parents)
        #[arg(long)]
        recipients: Option<String>,

        /// Limit to these classes (comma-separated, e.g. 10A,10B)
        #[arg(long, value_delimiter = ',')]
        classes: Option<Vec<String>>,

        /// Create from JSON file
        #[arg(long, short = 'F', conflicts_with_all = &["title", "content"])]
        from_file: Option<PathBuf>,
    },

    /// Edit an announcement
    Update {
        /// Announcement ID
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        #[arg(long)]
        recipients: Option<String>,

        #[arg(long, value_delimiter = ',')]
        classes: Option<Vec<String>>,

        /// Load full payload from JSON file
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Delete an announcement
    Delete {
        /// Announcement ID
        id: String,
    },

    /// Toggle the pinned flag
    Pin {
        /// Announcement ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List events
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one event
    Get {
        /// Event ID
        id: String,
    },

    /// Schedule an event
    Create {
        #[arg(long, required_unless_present = "from_file")]
        title: Option<String>,

        /// Start date (YYYY-MM-DD or RFC 3339)
        #[arg(long, required_unless_present = "from_file")]
        date: Option<String>,

        /// End date
        #[arg(long)]
        end_date: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Create from JSON file
        #[arg(long, short = 'F', conflicts_with_all = &["title", "date"])]
        from_file: Option<PathBuf>,
    },

    /// Edit an event
    Update {
        /// Event ID
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        end_date: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Load full payload from JSON file
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Cancel (delete) an event
    Delete {
        /// Event ID
        id: String,
    },

    /// Record an RSVP for the signed-in user
    Rsvp {
        /// Event ID
        id: String,

        /// RSVP status (e.g. going, maybe, declined)
        #[arg(long)]
        status: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LIBRARY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LibraryArgs {
    #[command(subcommand)]
    pub command: LibraryCommand,
}

#[derive(Debug, Subcommand)]
pub enum LibraryCommand {
    /// Manage the book catalogue
    Books(BooksArgs),

    /// Review pending borrow requests
    #[command(alias = "req")]
    Requests(RequestsArgs),

    /// Track issued books
    Issues(IssuesArgs),
}

#[derive(Debug, Args)]
pub struct BooksArgs {
    #[command(subcommand)]
    pub command: BooksCommand,
}

#[derive(Debug, Subcommand)]
pub enum BooksCommand {
    /// List books
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one book
    Get {
        /// Book ID
        id: String,
    },

    /// Add a book to the catalogue
    Create {
        #[arg(long, required_unless_present = "from_file")]
        title: Option<String>,

        #[arg(long, required_unless_present = "from_file")]
        author: Option<String>,

        #[arg(long)]
        isbn: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Number of copies owned
        #[arg(long, default_value = "1")]
        copies: u32,

        /// Create from JSON file
        #[arg(long, short = 'F', conflicts_with_all = &["title", "author"])]
        from_file: Option<PathBuf>,
    },

    /// Edit a book
    Update {
        /// Book ID
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        isbn: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        copies: Option<u32>,

        /// Load full payload from JSON file
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Remove a book from the catalogue
    Delete {
        /// Book ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct RequestsArgs {
    #[command(subcommand)]
    pub command: RequestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RequestsCommand {
    /// List pending borrow requests
    #[command(alias = "ls")]
    List(ListArgs),

    /// Approve a request (issues the book)
    Approve {
        /// Request ID
        id: String,
    },

    /// Reject a request
    Reject {
        /// Request ID
        id: String,

        /// Reason shown to the student
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct IssuesArgs {
    #[command(subcommand)]
    pub command: IssuesCommand,
}

#[derive(Debug, Subcommand)]
pub enum IssuesCommand {
    /// List issued books
    #[command(alias = "ls")]
    List(ListArgs),

    /// Issue a book directly to a student
    Create {
        /// Book ID
        #[arg(long)]
        book: String,

        /// Student ID
        #[arg(long)]
        student: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,
    },

    /// Mark an issued book as returned
    Return {
        /// Issue ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LIBRARIANS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LibrariansArgs {
    #[command(subcommand)]
    pub command: LibrariansCommand,
}

#[derive(Debug, Subcommand)]
pub enum LibrariansCommand {
    /// List librarians
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one librarian
    Get {
        /// Librarian ID
        id: String,
    },

    /// Create a librarian account
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        employee_id: Option<String>,
    },

    /// Edit a librarian account
    Update {
        /// Librarian ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Remove a librarian account
    Delete {
        /// Librarian ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FEES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FeesArgs {
    #[command(subcommand)]
    pub command: FeesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FeesCommand {
    /// List fee structures
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one fee structure with its components
    Get {
        /// Fee structure ID
        id: String,
    },

    /// Create a fee structure
    Create {
        #[arg(long, required_unless_present = "from_file")]
        name: Option<String>,

        /// Class the structure applies to
        #[arg(long, required_unless_present = "from_file")]
        class: Option<String>,

        /// Academic year (e.g. 2025-26)
        #[arg(long)]
        academic_year: Option<String>,

        /// Fee component as NAME=AMOUNT (repeatable)
        #[arg(long = "component", value_name = "NAME=AMOUNT")]
        components: Vec<String>,

        #[arg(long)]
        due_date: Option<String>,

        /// Create from JSON file
        #[arg(long, short = 'F', conflicts_with_all = &["name", "class"])]
        from_file: Option<PathBuf>,
    },

    /// Edit a fee structure
    Update {
        /// Fee structure ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        class: Option<String>,

        #[arg(long)]
        academic_year: Option<String>,

        /// Replace all components, NAME=AMOUNT (repeatable)
        #[arg(long = "component", value_name = "NAME=AMOUNT")]
        components: Vec<String>,

        #[arg(long)]
        due_date: Option<String>,

        /// Load full payload from JSON file
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Delete a fee structure
    Delete {
        /// Fee structure ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ATTENDANCE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AttendanceArgs {
    #[command(subcommand)]
    pub command: AttendanceCommand,
}

#[derive(Debug, Subcommand)]
pub enum AttendanceCommand {
    /// Download the attendance summary spreadsheet
    Export {
        /// Output file (defaults to the name the backend suggests)
        #[arg(long, short = 'O')]
        out: Option<PathBuf>,

        /// Report filter as key=value, e.g. class=10A (repeatable)
        #[arg(long, short = 'f', value_name = "KEY=VALUE")]
        filter: Vec<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Key: base_url, session_cookie_env, ca_cert, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a session cookie in the system keyring
    SetSession {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
