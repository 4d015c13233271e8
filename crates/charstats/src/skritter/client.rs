//! Skritter API client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use url::Url;

use super::error::SkritterError;
use super::types::{ItemsPage, SkritterItem, SkritterVocab};
use crate::http::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::sync::{ProgressCallback, SyncProgress, emit};

/// Default Skritter API base URL.
pub const DEFAULT_BASE_URL: &str = "https://legacy.skritter.com/api/v0";

/// Request timeout used by [`SkritterClient::new`].
const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Everything changed since a watermark, deduplicated by ID.
///
/// Order within each collection is not meaningful.
#[derive(Debug, Clone, Default)]
pub struct FetchedCollections {
    pub vocabs: Vec<SkritterVocab>,
    pub items: Vec<SkritterItem>,
    /// Number of page requests issued.
    pub pages: u32,
}

/// Skritter API client.
///
/// Holds the bearer token and transport; construct one per sync run.
#[derive(Clone)]
pub struct SkritterClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for SkritterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkritterClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SkritterClient {
    /// Create a client backed by reqwest.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = SkritterClient::new(DEFAULT_BASE_URL, "token")?;
    /// ```
    pub fn new(base_url: &str, token: &str) -> Result<Self, SkritterError> {
        let transport = ReqwestTransport::new(REQUEST_TIMEOUT)?;

        Ok(Self::new_with_transport(
            base_url,
            token,
            Arc::new(transport),
        ))
    }

    pub fn new_with_transport(
        base_url: &str,
        token: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the `/items` URL for one page.
    fn items_url(
        &self,
        cursor: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> Result<Url, SkritterError> {
        let mut url = Url::parse(&format!("{}/items", self.base_url))
            .map_err(|e| SkritterError::Config(format!("invalid base URL: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("include_vocabs", "true")
                .append_pair("include_heisigs", "true");
            if let Some(since) = since {
                query
                    .append_pair("sort", "changed")
                    .append_pair("offset", &since.timestamp().to_string());
            }
            if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
                query.append_pair("cursor", cursor);
            }
        }

        Ok(url)
    }

    /// Make an authenticated GET request and decode the JSON body.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, SkritterError> {
        let request = HttpRequest::get(url)
            .with_header("Accept", "application/json")
            .with_header("User-Agent", concat!("charstats/", env!("CARGO_PKG_VERSION")))
            .with_header("Authorization", format!("Bearer {}", self.token));

        let response = self.transport.get(request).await?;

        if !response.is_success() {
            return Err(SkritterError::Api {
                status: response.status,
                message: response.body_text(),
            });
        }

        serde_json::from_slice(&response.body).map_err(SkritterError::Json)
    }

    /// Fetch a single page of items and their vocabs.
    ///
    /// `cursor` continues a previous page; `since` restricts the result to
    /// items changed at or after the watermark.
    pub async fn fetch_page(
        &self,
        cursor: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> Result<ItemsPage, SkritterError> {
        let url = self.items_url(cursor, since)?;
        self.get(url).await
    }

    /// Fetch every page changed since the watermark.
    ///
    /// Follows the cursor until the server returns an empty one. Records are
    /// keyed by ID, so an ID seen on several pages keeps its last version.
    /// Any failed page aborts the whole fetch; nothing partial is returned.
    pub async fn fetch_changed(
        &self,
        since: Option<DateTime<Utc>>,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<FetchedCollections, SkritterError> {
        let mut vocabs: HashMap<String, SkritterVocab> = HashMap::new();
        let mut items: HashMap<String, SkritterItem> = HashMap::new();
        let mut cursor: Option<String> = None;
        let mut pages: u32 = 0;

        loop {
            let page = self.fetch_page(cursor.as_deref(), since).await?;
            pages += 1;

            let next = page.next_cursor().map(str::to_string);
            tracing::debug!(
                page = pages,
                vocabs = page.vocabs.len(),
                items = page.items.len(),
                has_more = next.is_some(),
                "Fetched page"
            );
            emit(
                on_progress,
                SyncProgress::FetchedPage {
                    page: pages,
                    vocabs: page.vocabs.len(),
                    items: page.items.len(),
                    has_more: next.is_some(),
                },
            );

            for vocab in page.vocabs {
                vocabs.insert(vocab.id.clone(), vocab);
            }
            for item in page.items {
                items.insert(item.id.clone(), item);
            }

            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        emit(
            on_progress,
            SyncProgress::FetchComplete {
                pages,
                vocabs: vocabs.len(),
                items: items.len(),
            },
        );

        Ok(FetchedCollections {
            vocabs: vocabs.into_values().collect(),
            items: items.into_values().collect(),
            pages,
        })
    }
}
