// ── Composition root ──
//
// Owns the one shared `ApiClient`, the injected notifier and every store.
// Front ends build a `Portal` once and hand out references; there are no
// global singletons.

use std::sync::Arc;

use schoolhub_api::endpoints::{ATTENDANCE_SUMMARY_EXPORT, DASHBOARD_ANALYTICS};
use schoolhub_api::{ApiClient, ListQuery, TlsMode, TransportConfig};
use tracing::{debug, info};

use crate::config::{PortalConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{
    Announcement, Book, BookIssue, BookRequest, DashboardAnalytics, Event, FeeStructure,
    Librarian, TimetableSlot,
};
use crate::notify::Notifier;
use crate::store::{DocumentStore, ExportStore, FetchOutcome, ResourceStore};

const ATTENDANCE_SUMMARY_FILENAME: &str = "attendance-summary.xlsx";

/// Cheaply cloneable handle to every SchoolHub store.
#[derive(Clone)]
pub struct Portal {
    inner: Arc<PortalInner>,
}

struct PortalInner {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    announcements: ResourceStore<Announcement>,
    events: ResourceStore<Event>,
    books: ResourceStore<Book>,
    book_requests: ResourceStore<BookRequest>,
    book_issues: ResourceStore<BookIssue>,
    librarians: ResourceStore<Librarian>,
    fee_structures: ResourceStore<FeeStructure>,
    timetable: ResourceStore<TimetableSlot>,
    dashboard: DocumentStore<DashboardAnalytics>,
    attendance_summary: ExportStore,
}

/// A collection that failed to load during `refresh_all`.
#[derive(Debug)]
pub struct RefreshFailure {
    pub collection: &'static str,
    pub error: CoreError,
}

impl Portal {
    /// Build the shared client from `config` (cookie jar always on, session
    /// cookie seeded when configured) and create every store.
    pub fn new(config: &PortalConfig, notifier: Arc<dyn Notifier>) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: tls_to_transport(&config.tls),
            timeout: config.timeout,
            cookie_jar: None,
        };

        let api = ApiClient::new(config.base_url.clone(), &transport)?;
        if let Some(ref cookie) = config.session_cookie {
            api.seed_session_cookie(cookie);
        }
        debug!(base_url = %config.base_url, "portal client ready");

        Ok(Self::with_client(api, notifier))
    }

    /// Wrap an existing client (tests point this at a mock server).
    pub fn with_client(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        let api = Arc::new(api);

        let inner = PortalInner {
            announcements: ResourceStore::new(Arc::clone(&api), Arc::clone(&notifier)),
            events: ResourceStore::new(Arc::clone(&api), Arc::clone(&notifier)),
            books: ResourceStore::new(Arc::clone(&api), Arc::clone(&notifier)),
            book_requests: ResourceStore::new(Arc::clone(&api), Arc::clone(&notifier)),
            book_issues: ResourceStore::new(Arc::clone(&api), Arc::clone(&notifier)),
            librarians: ResourceStore::new(Arc::clone(&api), Arc::clone(&notifier)),
            fee_structures: ResourceStore::new(Arc::clone(&api), Arc::clone(&notifier)),
            timetable: ResourceStore::new(Arc::clone(&api), Arc::clone(&notifier)),
            dashboard: DocumentStore::new(
                Arc::clone(&api),
                Arc::clone(&notifier),
                DASHBOARD_ANALYTICS,
            ),
            attendance_summary: ExportStore::new(
                Arc::clone(&api),
                Arc::clone(&notifier),
                ATTENDANCE_SUMMARY_EXPORT,
                "attendance summary",
                ATTENDANCE_SUMMARY_FILENAME,
            ),
            api,
            notifier,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    // ── Store accessors ──────────────────────────────────────────────

    pub fn announcements(&self) -> &ResourceStore<Announcement> {
        &self.inner.announcements
    }

    pub fn events(&self) -> &ResourceStore<Event> {
        &self.inner.events
    }

    pub fn books(&self) -> &ResourceStore<Book> {
        &self.inner.books
    }

    /// Pending borrow requests.
    pub fn book_requests(&self) -> &ResourceStore<BookRequest> {
        &self.inner.book_requests
    }

    pub fn book_issues(&self) -> &ResourceStore<BookIssue> {
        &self.inner.book_issues
    }

    pub fn librarians(&self) -> &ResourceStore<Librarian> {
        &self.inner.librarians
    }

    pub fn fee_structures(&self) -> &ResourceStore<FeeStructure> {
        &self.inner.fee_structures
    }

    /// The signed-in teacher's timetable (read-only).
    pub fn timetable(&self) -> &ResourceStore<TimetableSlot> {
        &self.inner.timetable
    }

    pub fn dashboard(&self) -> &DocumentStore<DashboardAnalytics> {
        &self.inner.dashboard
    }

    pub fn attendance_summary(&self) -> &ExportStore {
        &self.inner.attendance_summary
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.inner.notifier
    }

    // ── Whole-portal operations ──────────────────────────────────────

    /// Fetch every collection and the dashboard concurrently, unfiltered.
    /// Each failure has already been notified by its store; the list is
    /// returned for callers that want to act on it.
    pub async fn refresh_all(&self) -> Vec<RefreshFailure> {
        let query = ListQuery::default();
        let i = &self.inner;

        let (
            announcements,
            events,
            books,
            requests,
            issues,
            librarians,
            fees,
            timetable,
            dashboard,
        ) = futures_util::join!(
            i.announcements.fetch(&query),
            i.events.fetch(&query),
            i.books.fetch(&query),
            i.book_requests.fetch(&query),
            i.book_issues.fetch(&query),
            i.librarians.fetch(&query),
            i.fee_structures.fetch(&query),
            i.timetable.fetch(&query),
            i.dashboard.fetch(&query),
        );

        let results: [(&'static str, Result<FetchOutcome, CoreError>); 9] = [
            ("announcements", announcements),
            ("events", events),
            ("books", books),
            ("book requests", requests),
            ("book issues", issues),
            ("librarians", librarians),
            ("fee structures", fees),
            ("timetable", timetable),
            ("dashboard analytics", dashboard),
        ];

        let failures: Vec<RefreshFailure> = results
            .into_iter()
            .filter_map(|(collection, result)| {
                result
                    .err()
                    .map(|error| RefreshFailure { collection, error })
            })
            .collect();
        info!(failed = failures.len(), "portal refresh complete");
        failures
    }

    /// `true` while any store has an operation in flight.
    pub fn busy(&self) -> bool {
        let i = &self.inner;
        i.announcements.busy()
            || i.events.busy()
            || i.books.busy()
            || i.book_requests.busy()
            || i.book_issues.busy()
            || i.librarians.busy()
            || i.fee_structures.busy()
            || i.timetable.busy()
            || i.dashboard.busy()
            || i.attendance_summary.busy()
    }

    /// Drop every cache and supersede in-flight fetches.
    pub fn reset_all(&self) {
        let i = &self.inner;
        i.announcements.reset();
        i.events.reset();
        i.books.reset();
        i.book_requests.reset();
        i.book_issues.reset();
        i.librarians.reset();
        i.fee_structures.reset();
        i.timetable.reset();
        i.dashboard.reset();
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
