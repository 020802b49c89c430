//! Streams a direct link into a temporary file with a size cap.

use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

use crate::error::{Result, SearchError};
use crate::http::HttpClient;
use crate::models::{DirectLink, DownloadedFile, FileKind};

/// Telegram bots may upload up to 50 MB.
pub const DEFAULT_MAX_BYTES: u64 = 50 * 1024 * 1024;

const MAX_FILE_STEM_CHARS: usize = 60;
const SNIFF_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct Downloader {
    http: HttpClient,
    dir: PathBuf,
    max_bytes: u64,
}

impl Downloader {
    pub fn new(http: HttpClient, dir: PathBuf, max_bytes: u64) -> Self {
        Self {
            http,
            dir,
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Downloads `link` into the download directory. The temp file is removed on any error.
    #[instrument(skip(self), fields(url = %link.url))]
    pub async fn download(&self, link: &DirectLink, title: &str) -> Result<DownloadedFile> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let response = self
            .http
            .client()
            .get(&link.url)
            .send()
            .await
            .map_err(|e| SearchError::Network(format!("Failed to download {}: {}", link.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Api(format!(
                "Download of {} returned {}",
                link.url, status
            )));
        }

        if let Some(size) = response.content_length() {
            if size > self.max_bytes {
                warn!(size = size, limit = self.max_bytes, "Refusing oversized download");
                return Err(SearchError::TooLarge {
                    size,
                    limit: self.max_bytes,
                });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let temp = tempfile::Builder::new()
            .prefix("book-")
            .tempfile_in(&self.dir)?;
        let mut out = tokio::fs::File::from_std(temp.reopen()?);

        let mut stream = response.bytes_stream();
        let mut size: u64 = 0;
        let mut head: Vec<u8> = Vec::with_capacity(SNIFF_LEN);

        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| SearchError::Network(format!("Download interrupted: {}", e)))?;
            size += chunk.len() as u64;
            if size > self.max_bytes {
                warn!(limit = self.max_bytes, "Download exceeded size limit, aborting");
                return Err(SearchError::TooLarge {
                    size,
                    limit: self.max_bytes,
                });
            }
            if head.len() < SNIFF_LEN {
                let take = (SNIFF_LEN - head.len()).min(chunk.len());
                head.extend_from_slice(&chunk[..take]);
            }
            out.write_all(&chunk).await?;
        }
        out.flush().await?;

        let kind = decide_kind(link.kind, &content_type, &head);
        if !kind.is_known() {
            warn!(content_type = %content_type, size = size, "Downloaded body is not a book");
            return Err(SearchError::UnsupportedFile(format!(
                "{} is neither PDF nor EPUB",
                link.url
            )));
        }

        let file_name = file_name_for(title, kind);
        info!(size = size, file_name = %file_name, path = %temp.path().display(), "Download complete");

        Ok(DownloadedFile {
            file: temp,
            file_name,
            kind,
            size,
        })
    }
}

/// Magic bytes decide when they are conclusive. A body that is HTML (by header or by its first
/// bytes) is never a book, whatever the URL says. Otherwise the header kind, then the link kind.
pub fn decide_kind(link_kind: FileKind, content_type: &str, head: &[u8]) -> FileKind {
    let sniffed = FileKind::sniff(head);
    if sniffed.is_known() {
        return sniffed;
    }
    let mime = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    if mime == "text/html" || mime == "application/xhtml+xml" || looks_like_markup(head) {
        return FileKind::Unknown;
    }
    [FileKind::from_content_type(content_type), link_kind]
        .into_iter()
        .find(FileKind::is_known)
        .unwrap_or(FileKind::Unknown)
}

/// First non-blank byte (after an optional UTF-8 BOM) is `<`.
fn looks_like_markup(head: &[u8]) -> bool {
    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    head.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'<')
}

/// Safe file name from a book title: separators and control characters become `_`,
/// whitespace collapses, the stem is capped, the extension is appended.
pub fn file_name_for(title: &str, kind: FileKind) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let stem: String = collapsed
        .trim_matches(|c: char| c == '.' || c.is_whitespace())
        .chars()
        .take(MAX_FILE_STEM_CHARS)
        .collect();
    let stem = stem.trim_end();
    let stem = if stem.is_empty() { "book" } else { stem };
    format!("{}{}", stem, kind.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_kind_priority() {
        assert_eq!(
            decide_kind(FileKind::Epub, "application/epub+zip", b"%PDF-1.4"),
            FileKind::Pdf
        );
        assert_eq!(
            decide_kind(FileKind::Unknown, "application/pdf", b"\x00\x01"),
            FileKind::Pdf
        );
        assert_eq!(
            decide_kind(FileKind::Epub, "application/octet-stream", b"\x00\x01"),
            FileKind::Epub
        );
        assert_eq!(
            decide_kind(FileKind::Unknown, "", b"%PDF-1.4"),
            FileKind::Pdf
        );
    }

    #[test]
    fn test_decide_kind_rejects_html_whatever_the_url() {
        assert_eq!(
            decide_kind(FileKind::Pdf, "text/html; charset=utf-8", b"Please log in"),
            FileKind::Unknown
        );
        assert_eq!(
            decide_kind(FileKind::Pdf, "application/pdf", b"\n  <!DOCTYPE html>"),
            FileKind::Unknown
        );
        assert_eq!(
            decide_kind(FileKind::Epub, "", b"\xEF\xBB\xBF<html>"),
            FileKind::Unknown
        );
    }

    #[test]
    fn test_file_name_for() {
        assert_eq!(file_name_for("Dune", FileKind::Pdf), "Dune.pdf");
        assert_eq!(
            file_name_for("  AC/DC: a  history? ", FileKind::Epub),
            "AC_DC_ a history_.epub"
        );
        assert_eq!(file_name_for("...", FileKind::Pdf), "book.pdf");
        assert_eq!(file_name_for("", FileKind::Epub), "book.epub");
        assert_eq!(file_name_for("ديوان المتنبي", FileKind::Pdf), "ديوان المتنبي.pdf");

        let long = "x".repeat(200);
        assert_eq!(file_name_for(&long, FileKind::Pdf).len(), 60 + 4);
    }
}
