//! HTTP implementation of the feed client.
//!
//! Thin transport layer: builds requests, classifies failures into
//! [`ClientError`] variants, and decodes pages. All retry and backoff
//! decisions live in the collector; this client never sleeps.

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::session::Session;
use super::{ClientError, ClientResult, FeedClient, QuerySpec};
use crate::{Cursor, FeedPost, RecordPage};

/// Fallback wait when a 429 response carries no usable reset header.
const RATE_LIMIT_FALLBACK_SECS: i64 = 60;

/// Wire shape of a search response page.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    posts: Vec<FeedPost>,
    #[serde(default)]
    next_cursor: Option<String>,
}

impl From<SearchResponse> for RecordPage {
    fn from(resp: SearchResponse) -> Self {
        RecordPage {
            posts: resp.posts,
            next_cursor: resp.next_cursor.map(Cursor::new),
        }
    }
}

/// Feed client backed by the provider's HTTP search endpoint.
pub struct SearchHttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl SearchHttpClient {
    /// Create a client bound to `base_url` using a loaded [`Session`].
    pub fn new(base_url: impl Into<String>, session: &Session) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        let cookie = HeaderValue::from_str(&session.cookie_header())
            .map_err(|e| ClientError::Rejected(format!("invalid session cookie: {e}")))?;
        headers.insert(COOKIE, cookie);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Transient(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    async fn get_page(&self, params: &[(&str, String)]) -> ClientResult<RecordPage> {
        let url = format!("{}/search", self.base_url);
        debug!(url = %url, params = params.len(), "issuing feed request");

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ClientError::Transient(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let reset_at = parse_reset_header(response.headers());
            warn!(reset_at = %reset_at, "provider rate limit hit");
            return Err(ClientError::RateLimited { reset_at });
        }

        if status.is_server_error() {
            return Err(ClientError::Transient(format!("server error: {status}")));
        }

        if status.is_client_error() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ClientError::Rejected(format!("{status}: {detail}")));
        }

        let page: SearchResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        Ok(page.into())
    }
}

#[async_trait::async_trait]
impl FeedClient for SearchHttpClient {
    async fn search_latest(&self, query: &QuerySpec, page_size: u32) -> ClientResult<RecordPage> {
        let params = [
            ("q", query.to_query()),
            ("product", "Latest".to_string()),
            ("count", page_size.to_string()),
        ];
        self.get_page(&params).await
    }

    async fn fetch_next(&self, cursor: &Cursor) -> ClientResult<RecordPage> {
        let params = [("cursor", cursor.as_str().to_string())];
        self.get_page(&params).await
    }
}

/// Extract the provider's rate-limit reset timestamp.
///
/// The `x-rate-limit-reset` header carries Unix seconds. A missing or
/// unparseable header falls back to now + [`RATE_LIMIT_FALLBACK_SECS`] so the
/// caller always gets a usable wait target.
fn parse_reset_header(headers: &HeaderMap) -> DateTime<Utc> {
    headers
        .get("x-rate-limit-reset")
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.parse::<i64>().ok())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .unwrap_or_else(|| {
            warn!("429 response without usable x-rate-limit-reset header");
            Utc::now() + chrono::Duration::seconds(RATE_LIMIT_FALLBACK_SECS)
        })
}
