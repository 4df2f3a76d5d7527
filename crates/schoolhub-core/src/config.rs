// ── Runtime connection configuration ──
//
// Describes *how* to reach a SchoolHub backend. Carries the session
// cookie and transport tuning but never touches disk: front ends build a
// `PortalConfig` and hand it to `Portal::new`.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for talking to one backend.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// API root, e.g. `https://school.example/api`.
    pub base_url: Url,
    /// An already-issued session cookie (`name=value`), seeded into the
    /// client's cookie jar. Logging in is someone else's job.
    pub session_cookie: Option<SecretString>,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl PortalConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            session_cookie: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_session_cookie(mut self, cookie: SecretString) -> Self {
        self.session_cookie = Some(cookie);
        self
    }
}
