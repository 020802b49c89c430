//! HTML scraper for book-library sites that list books as `/book-...` links.

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{Result, SearchError};
use crate::http::HttpClient;
use crate::models::{BookCandidate, CandidateKind};
use crate::provider::SearchProvider;

pub const DEFAULT_LIBRARY_BASE_URL: &str = "https://www.noor-book.com";
pub const DEFAULT_LIBRARY_SEARCH_PATH: &str = "/search?query=";

const BOOK_LINK_SELECTOR: &str = r#"a[href*="/book-"]"#;
const MIN_TITLE_CHARS: usize = 5;
const NAVIGATION_TITLES: [&str; 2] = ["details", "read more"];

/// Scrapes the library's search page for book detail links.
#[derive(Debug, Clone)]
pub struct LibraryScraper {
    http: HttpClient,
    base_url: Url,
    search_path: String,
}

impl LibraryScraper {
    pub fn new(http: HttpClient, base_url: &str, search_path: &str) -> Result<Self> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            search_path: search_path.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Search page URL for a query; the query is percent-encoded.
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.search_path,
            urlencoding::encode(query)
        )
    }

    /// Extracts unique book links from a search results page.
    pub fn parse_search_results(&self, html: &str, limit: usize) -> Vec<BookCandidate> {
        let document = Html::parse_document(html);
        let Ok(selector) = Selector::parse(BOOK_LINK_SELECTOR) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut books = Vec::new();

        for link in document.select(&selector) {
            if books.len() >= limit {
                break;
            }
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            if !seen.insert(href.to_string()) {
                continue;
            }

            let title = link
                .value()
                .attr("title")
                .map(str::to_string)
                .unwrap_or_else(|| link.text().collect::<String>());
            let title = title.trim();

            if title.chars().count() <= MIN_TITLE_CHARS
                || NAVIGATION_TITLES.contains(&title.to_lowercase().as_str())
            {
                debug!(href = %href, title = %title, "Skipping navigation link");
                continue;
            }

            let Ok(full_url) = self.base_url.join(href) else {
                debug!(href = %href, "Skipping unjoinable href");
                continue;
            };

            books.push(BookCandidate::new(
                title,
                full_url.to_string(),
                "library",
                CandidateKind::Page,
            ));
        }

        books
    }
}

#[async_trait]
impl SearchProvider for LibraryScraper {
    fn id(&self) -> &str {
        "library"
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<BookCandidate>> {
        let url = self.search_url(query);
        info!(url = %url, "Searching library");

        let html = self
            .http
            .get_text(&url)
            .await
            .map_err(|e| SearchError::Network(format!("Library search failed: {}", e)))?;

        let books = self.parse_search_results(&html, limit);
        info!(count = books.len(), "Library search done");
        Ok(books)
    }
}
