// REST HTTP client
//
// Wraps `reqwest::Client` with base-URL path construction, the shared
// session cookie jar, error-body parsing, and envelope normalization.
// Store logic above this layer only ever sees `Page`, `Mutation`, `Ack`
// and `Blob`.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::endpoints::{ActionRoute, Endpoint};
use crate::envelope::{Ack, Mutation, Page, message_of};
use crate::error::Error;
use crate::query::ListQuery;
use crate::transport::TransportConfig;

/// An opaque binary download (e.g. the attendance spreadsheet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    /// File name suggested by the backend's `Content-Disposition` header.
    pub filename: Option<String>,
}

impl Blob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// HTTP client for the SchoolHub backend.
///
/// One instance is shared by every store. Cookies are kept in a jar so the
/// session travels with every request, mirroring a browser's
/// `credentials: "include"`.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    cookie_jar: Option<Arc<Jar>>,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// A cookie jar is created if the config doesn't already carry one.
    /// `base_url` is the API root, e.g. `https://school.example/api`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let cookie_jar = config.cookie_jar.clone();
        let http = config.build_client()?;
        ensure_base(&base_url)?;
        Ok(Self {
            http,
            base_url,
            cookie_jar,
        })
    }

    /// Wrap a pre-built `reqwest::Client` (caller manages cookies).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            cookie_jar: None,
        }
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Seed an already-issued session cookie (`name=value`) into the jar.
    ///
    /// Returns `false` when this client has no jar of its own.
    pub fn seed_session_cookie(&self, cookie: &SecretString) -> bool {
        let Some(jar) = self.cookie_jar.as_ref() else {
            return false;
        };
        debug!("seeding session cookie");
        jar.add_cookie_str(cookie.expose_secret(), &self.base_url);
        true
    }

    /// The `Cookie` header value that will accompany requests, if any.
    pub fn cookie_header(&self) -> Option<String> {
        let jar = self.cookie_jar.as_ref()?;
        let cookies = jar.cookies(&self.base_url)?;
        cookies.to_str().ok().map(String::from)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// so ids never escape their slot.
    pub(crate) fn url<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    fn collection_url(&self, endpoint: &Endpoint) -> Result<Url, Error> {
        self.url(endpoint.segments())
    }

    fn item_url(&self, endpoint: &Endpoint, id: &str, suffix: Option<&str>) -> Result<Url, Error> {
        let mut segments: Vec<&str> = endpoint.segments().collect();
        segments.push(id);
        segments.extend(suffix);
        self.url(segments)
    }

    // ── Collection operations ────────────────────────────────────────

    /// `GET /{collection}?{query}`, normalized to a `Page`.
    pub async fn list<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        query: &ListQuery,
    ) -> Result<Page<T>, Error> {
        let url = self.collection_url(endpoint)?;
        let params = query.to_pairs();
        debug!("GET {url} params={params:?}");

        let body = Self::send_json(self.http.get(url).query(&params)).await?;
        endpoint.list.normalize(body)
    }

    /// `GET /{collection}` for single-document resources.
    pub async fn document<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        query: &ListQuery,
    ) -> Result<Mutation<T>, Error> {
        let url = self.collection_url(endpoint)?;
        let params = query.to_pairs();
        debug!("GET {url} params={params:?}");

        let body = Self::send_json(self.http.get(url).query(&params)).await?;
        endpoint.item.normalize(body)
    }

    /// `POST /{collection}`.
    pub async fn create<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<Mutation<T>, Error> {
        let url = self.collection_url(endpoint)?;
        debug!("POST {url}");

        let body = Self::send_json(self.http.post(url).json(body)).await?;
        endpoint.item.normalize(body)
    }

    /// `PUT /{collection}/{id}`.
    pub async fn update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        endpoint: &Endpoint,
        id: &str,
        body: &B,
    ) -> Result<Mutation<T>, Error> {
        let url = self.item_url(endpoint, id, None)?;
        debug!("PUT {url}");

        let body = Self::send_json(self.http.put(url).json(body)).await?;
        endpoint.item.normalize(body)
    }

    /// `DELETE /{collection}/{id}`.
    pub async fn delete(&self, endpoint: &Endpoint, id: &str) -> Result<Ack, Error> {
        let url = self.item_url(endpoint, id, None)?;
        debug!("DELETE {url}");

        let body = Self::send_json(self.http.delete(url)).await?;
        Ok(Ack::from_body(body))
    }

    /// `{method} /{collection}/{id}/{suffix}` returning the updated entity.
    pub async fn action<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        id: &str,
        route: &ActionRoute,
        body: Option<&Value>,
    ) -> Result<Mutation<T>, Error> {
        let body = self.send_action(endpoint, id, route, body).await?;
        endpoint.item.normalize(body)
    }

    /// Like [`action`](Self::action), for transitions whose response carries
    /// no entity worth keeping.
    pub async fn action_ack(
        &self,
        endpoint: &Endpoint,
        id: &str,
        route: &ActionRoute,
        body: Option<&Value>,
    ) -> Result<Ack, Error> {
        let body = self.send_action(endpoint, id, route, body).await?;
        Ok(Ack::from_body(body))
    }

    /// `GET /{path}?{query}` as raw bytes.
    pub async fn download(&self, path: &str, query: &ListQuery) -> Result<Blob, Error> {
        let url = self.url(path.split('/').filter(|s| !s.is_empty()))?;
        let params = query.to_pairs();
        debug!("GET {url} params={params:?} (binary)");

        let resp = Self::send(self.http.get(url).query(&params)).await?;
        let headers = resp.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let filename = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename);
        let bytes = resp.bytes().await?;
        trace!(len = bytes.len(), ?content_type, ?filename, "downloaded blob");

        Ok(Blob {
            bytes,
            content_type,
            filename,
        })
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn send_action(
        &self,
        endpoint: &Endpoint,
        id: &str,
        route: &ActionRoute,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let url = self.item_url(endpoint, id, Some(route.suffix))?;
        debug!("{} {url}", route.method);

        let mut builder = self.http.request(route.method.clone(), url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Self::send_json(builder).await
    }

    /// Send and fail on non-2xx, pulling `message` out of the error body.
    async fn send(builder: RequestBuilder) -> Result<Response, Error> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&raw)
            .ok()
            .as_ref()
            .and_then(message_of);
        debug!(status = status.as_u16(), ?message, "request failed");

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Send and parse the body as JSON. Empty bodies (204) read as `null`.
    async fn send_json(builder: RequestBuilder) -> Result<Value, Error> {
        let resp = Self::send(builder).await?;
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}

fn ensure_base(url: &Url) -> Result<(), Error> {
    if url.cannot_be_a_base() {
        return Err(Error::InvalidBaseUrl(url.to_string()));
    }
    Ok(())
}

/// Extract `filename` from a `Content-Disposition` header value.
///
/// Prefers the RFC 5987 `filename*=UTF-8''...` form when present, which
/// is only unquoted here, not percent-decoded.
fn disposition_filename(header: &str) -> Option<String> {
    let mut plain = None;
    for part in header.split(';').map(str::trim) {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let name = value.rsplit("''").next().unwrap_or(value);
                if !name.is_empty() {
                    return Some(name.to_owned());
                }
            }
            "filename" if !value.is_empty() => plain = Some(value.to_owned()),
            _ => {}
        }
    }
    plain
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn disposition_plain_filename() {
        assert_eq!(
            disposition_filename(r#"attachment; filename="attendance-10A.xlsx""#).as_deref(),
            Some("attendance-10A.xlsx")
        );
    }

    #[test]
    fn disposition_prefers_extended_filename() {
        assert_eq!(
            disposition_filename(
                r#"attachment; filename="fallback.xlsx"; filename*=UTF-8''summary.xlsx"#
            )
            .as_deref(),
            Some("summary.xlsx")
        );
    }

    #[test]
    fn disposition_without_filename() {
        assert_eq!(disposition_filename("inline"), None);
    }

    #[test]
    fn url_encodes_id_segments() {
        let client = ApiClient::with_client(
            reqwest::Client::new(),
            Url::parse("https://school.example/api/").unwrap(),
        );
        let url = client.url(["library", "books", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "https://school.example/api/library/books/a%2Fb%20c");
    }
}
