//! Search results, resolved links and downloaded files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tempfile::NamedTempFile;

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const EPUB_MIMETYPE_ENTRY: &[u8] = b"mimetypeapplication/epub+zip";

/// File format of a book file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    Pdf,
    Epub,
    Unknown,
}

impl FileKind {
    /// Extension including the dot; empty for [`FileKind::Unknown`].
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Pdf => ".pdf",
            FileKind::Epub => ".epub",
            FileKind::Unknown => "",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            FileKind::Pdf => "application/pdf",
            FileKind::Epub => "application/epub+zip",
            FileKind::Unknown => "application/octet-stream",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FileKind::Unknown)
    }

    /// Guesses the kind from a URL: any `.pdf` wins over `.epub`.
    pub fn from_url(url: &str) -> Self {
        let lower = url.to_lowercase();
        if lower.contains(".pdf") {
            FileKind::Pdf
        } else if lower.contains(".epub") {
            FileKind::Epub
        } else {
            FileKind::Unknown
        }
    }

    /// Maps a `Content-Type` header value (parameters ignored).
    pub fn from_content_type(content_type: &str) -> Self {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        match mime.as_str() {
            "application/pdf" | "application/x-pdf" => FileKind::Pdf,
            "application/epub+zip" => FileKind::Epub,
            _ => FileKind::Unknown,
        }
    }

    /// Detects the kind from the first bytes of a file.
    pub fn sniff(head: &[u8]) -> Self {
        if head.starts_with(PDF_MAGIC) {
            return FileKind::Pdf;
        }
        if head.starts_with(ZIP_MAGIC)
            && head.len() >= 30 + EPUB_MIMETYPE_ENTRY.len()
            && &head[30..30 + EPUB_MIMETYPE_ENTRY.len()] == EPUB_MIMETYPE_ENTRY
        {
            return FileKind::Epub;
        }
        FileKind::Unknown
    }
}

/// How a candidate is turned into a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateKind {
    /// Book detail page; needs link resolution.
    Page,
    /// Already points at a file.
    Direct,
    /// Opened by the user; never downloaded by the bot.
    External,
    /// A post in a Telegram channel; the bot forwards it instead of downloading.
    ChannelPost,
}

/// One search hit shown to the user as a choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookCandidate {
    pub title: String,
    pub url: String,
    /// Provider id that produced this candidate.
    pub source: String,
    pub kind: CandidateKind,
    pub snippet: Option<String>,
}

impl BookCandidate {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
        kind: CandidateKind,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            source: source.into(),
            kind,
            snippet: None,
        }
    }

    pub fn with_snippet(mut self, snippet: Option<String>) -> Self {
        self.snippet = snippet.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn is_downloadable(&self) -> bool {
        !matches!(self.kind, CandidateKind::External)
    }
}

/// A URL that serves the book file itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectLink {
    pub url: String,
    pub kind: FileKind,
}

/// A downloaded book in local temporary storage. The file is removed on drop or [`cleanup`](Self::cleanup).
#[derive(Debug)]
pub struct DownloadedFile {
    pub(crate) file: NamedTempFile,
    pub file_name: String,
    pub kind: FileKind,
    pub size: u64,
}

impl DownloadedFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Deletes the local copy and reports any filesystem error.
    pub fn cleanup(self) -> std::io::Result<()> {
        self.file.close()
    }

    /// Keeps the file on disk and returns its path (used by the CLI).
    pub fn keep(self) -> std::io::Result<std::path::PathBuf> {
        let (_, path) = self.file.keep().map_err(|e| e.error)?;
        Ok(path)
    }
}
