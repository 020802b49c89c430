//! Turns a book page URL into a direct file link.
//!
//! A page is fetched with redirects followed. Anything that is not an HTML document (or is sent
//! as an attachment) is the file itself, and its body is never read here. For HTML the first
//! download-looking anchor in document order is taken and, when its format is still unknown,
//! resolved again up to `max_hops` times.

use reqwest::header::{HeaderMap, HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{Result, SearchError};
use crate::http::HttpClient;
use crate::models::{DirectLink, FileKind};

const DOWNLOAD_LINK_SELECTOR: &str = r#"a[href$=".pdf"], a[href$=".epub"], a[download], a.btn-download, a[href*="/download/"]"#;

pub const DEFAULT_MAX_HOPS: usize = 2;

/// What a fetched URL turned out to be.
#[derive(Debug)]
enum Fetched {
    File(DirectLink),
    Page { final_url: Url, html: String },
}

#[derive(Debug, Clone)]
pub struct LinkResolver {
    http: HttpClient,
    max_hops: usize,
}

impl LinkResolver {
    pub fn new(http: HttpClient, max_hops: usize) -> Self {
        Self { http, max_hops }
    }

    /// Resolves `page_url` to a direct link.
    #[instrument(skip(self))]
    pub async fn resolve(&self, page_url: &str) -> Result<DirectLink> {
        let mut current = page_url.to_string();

        for hop in 0..=self.max_hops {
            info!(url = %current, hop = hop, "Resolving download link");

            let (final_url, html) = match self.fetch(&current).await? {
                Fetched::File(link) => {
                    info!(url = %link.url, kind = ?link.kind, "URL serves the file directly");
                    return Ok(link);
                }
                Fetched::Page { final_url, html } => (final_url, html),
            };

            let link = find_download_link(&html, &final_url)
                .ok_or_else(|| SearchError::NoDownloadLink(final_url.to_string()))?;

            if link.kind.is_known() || hop == self.max_hops {
                info!(url = %link.url, kind = ?link.kind, "Download link found");
                return Ok(link);
            }

            debug!(url = %link.url, "Link format unknown, following intermediate page");
            current = link.url;
        }

        Err(SearchError::NoDownloadLink(page_url.to_string()))
    }

    async fn fetch(&self, url: &str) -> Result<Fetched> {
        let response = self
            .http
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Api(format!("GET {} returned {}", url, status)));
        }

        let final_url = response.url().clone();
        let content_type = header_str(response.headers(), CONTENT_TYPE);
        let disposition = header_str(response.headers(), CONTENT_DISPOSITION);

        if let Some(kind) = classify_response(&content_type, &disposition, final_url.as_str()) {
            return Ok(Fetched::File(DirectLink {
                url: final_url.to_string(),
                kind,
            }));
        }

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Network(format!("Failed to read {}: {}", url, e)))?;
        Ok(Fetched::Page { final_url, html })
    }
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// `Some(kind)` when the response is the file rather than a page. The kind may still be
/// [`FileKind::Unknown`]; the downloader settles it from the bytes.
///
/// A response is a page only when it is HTML (or has no `Content-Type` at all) and is not sent
/// as an attachment.
pub fn classify_response(content_type: &str, disposition: &str, url: &str) -> Option<FileKind> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    let is_attachment = disposition
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("attachment");
    let is_page = mime.is_empty() || mime == "text/html" || mime == "application/xhtml+xml";
    if is_page && !is_attachment {
        return None;
    }

    let kind = [
        FileKind::from_content_type(content_type),
        disposition_file_name(disposition)
            .map(|name| FileKind::from_url(&name))
            .unwrap_or(FileKind::Unknown),
        FileKind::from_url(url),
    ]
    .into_iter()
    .find(FileKind::is_known)
    .unwrap_or(FileKind::Unknown);
    Some(kind)
}

/// `filename="Dune.pdf"` or `filename*=UTF-8''Dune.pdf` from a `Content-Disposition` value.
pub fn disposition_file_name(disposition: &str) -> Option<String> {
    disposition.split(';').map(str::trim).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = value.rsplit("''").next().unwrap_or(value);
                urlencoding::decode(encoded.trim_matches('"'))
                    .ok()
                    .map(|v| v.into_owned())
            }
            "filename" => Some(value.trim_matches('"').to_string()),
            _ => None,
        }
        .filter(|name| !name.is_empty())
    })
}

/// First anchor in document order matching any download pattern, joined against `page_url`.
pub fn find_download_link(html: &str, page_url: &Url) -> Option<DirectLink> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(DOWNLOAD_LINK_SELECTOR).ok()?;

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.starts_with('#') && !href.starts_with("javascript:"))
        .find_map(|href| page_url.join(href).ok())
        .map(|url| {
            let url = url.to_string();
            DirectLink {
                kind: FileKind::from_url(&url),
                url,
            }
        })
}
