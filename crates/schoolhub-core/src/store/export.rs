// ── Binary export downloads ──

use std::sync::Arc;

use schoolhub_api::{ApiClient, Blob, ListQuery};
use tracing::{info, warn};

use super::tokens::{OpKind, PendingOps};
use crate::error::CoreError;
use crate::notify::{Notification, Notifier};

/// A downloadable report such as the attendance summary spreadsheet.
/// Nothing is cached; each call downloads afresh.
pub struct ExportStore {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    path: &'static str,
    /// Noun used in notifications ("attendance summary").
    label: &'static str,
    default_filename: &'static str,
    pending: Arc<PendingOps>,
}

impl ExportStore {
    pub fn new(
        api: Arc<ApiClient>,
        notifier: Arc<dyn Notifier>,
        path: &'static str,
        label: &'static str,
        default_filename: &'static str,
    ) -> Self {
        Self {
            api,
            notifier,
            path,
            label,
            default_filename,
            pending: PendingOps::new(),
        }
    }

    /// Download the export. The blob's `filename` is always set: the
    /// backend's `Content-Disposition` name, else the store's default.
    pub async fn download(&self, query: &ListQuery) -> Result<Blob, CoreError> {
        let _guard = self.pending.begin(OpKind::Export, None);

        match self.api.download(self.path, query).await {
            Ok(mut blob) => {
                if blob.filename.is_none() {
                    blob.filename = Some(self.default_filename.to_owned());
                }
                info!(len = blob.len(), filename = ?blob.filename, "downloaded {}", self.label);
                Ok(blob)
            }
            Err(e) => {
                warn!(error = %e, "{} download failed", self.label);
                let fallback = format!("Failed to export {}", self.label);
                let message = e.server_message().map_or(fallback, str::to_owned);
                self.notifier.notify(Notification::error(self.label, message));
                Err(e.into())
            }
        }
    }

    pub fn default_filename(&self) -> &'static str {
        self.default_filename
    }

    pub fn busy(&self) -> bool {
        self.pending.is_busy()
    }
}
