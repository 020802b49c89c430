//! Google Custom Search JSON API provider, restricted to PDF results.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::error::{Result, SearchError};
use crate::http::HttpClient;
use crate::models::{BookCandidate, CandidateKind, FileKind};
use crate::provider::SearchProvider;

pub const DEFAULT_GOOGLE_API_URL: &str = "https://www.googleapis.com";

/// The API caps `num` at 10.
const MAX_PAGE_SIZE: usize = 10;

#[derive(Debug, Deserialize)]
struct CustomSearchResponse {
    #[serde(default)]
    items: Vec<CustomSearchItem>,
}

#[derive(Debug, Deserialize)]
struct CustomSearchItem {
    title: String,
    link: String,
    snippet: Option<String>,
    mime: Option<String>,
}

/// Google Custom Search client (API key + search engine id).
#[derive(Debug, Clone)]
pub struct GoogleSearch {
    http: HttpClient,
    api_url: String,
    api_key: String,
    engine_id: String,
}

impl GoogleSearch {
    pub fn new(http: HttpClient, api_url: &str, api_key: String, engine_id: String) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            engine_id,
        }
    }

    /// Query sent to Google: the title plus a PDF file-type restriction.
    pub fn build_query(query: &str) -> String {
        format!("{} filetype:pdf", query.trim())
    }

    fn parse_items(body: &str, limit: usize) -> Result<Vec<BookCandidate>> {
        let response: CustomSearchResponse = serde_json::from_str(body)
            .map_err(|e| SearchError::Parse(format!("Invalid Custom Search response: {}", e)))?;

        Ok(response
            .items
            .into_iter()
            .take(limit)
            .map(|item| {
                let by_mime = item
                    .mime
                    .as_deref()
                    .map(FileKind::from_content_type)
                    .unwrap_or(FileKind::Unknown);
                let kind = if by_mime.is_known() || FileKind::from_url(&item.link).is_known() {
                    CandidateKind::Direct
                } else {
                    CandidateKind::Page
                };
                BookCandidate::new(item.title.trim(), item.link, "google", kind)
                    .with_snippet(item.snippet)
            })
            .collect())
    }
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    fn id(&self) -> &str {
        "google"
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<BookCandidate>> {
        let num = limit.clamp(1, MAX_PAGE_SIZE).to_string();
        let q = Self::build_query(query);
        let url = format!("{}/customsearch/v1", self.api_url);

        info!(query = %q, "Google Custom Search request");

        let response = self
            .http
            .client()
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", q.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Network(format!("Google search failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = %status, "Google Custom Search returned an error");
            return Err(SearchError::Api(format!(
                "Google Custom Search returned {}: {}",
                status, body
            )));
        }

        let candidates = Self::parse_items(&body, limit)?;
        info!(count = candidates.len(), "Google search done");
        Ok(candidates)
    }
}
