//! # Book search
//!
//! Finds books by title and fetches them as files. Providers (a Telegram channel searched through
//! a user account, library scraping, Google Custom Search, a plain Google link) sit behind
//! [`SearchProvider`] and are chained by
//! [`BookSearchService`]. [`LinkResolver`] turns a book page into a direct link and
//! [`Downloader`] streams it into a temporary file. No chat transport here.

pub mod ai_filter;
pub mod channel;
pub mod download;
pub mod error;
pub mod google;
pub mod google_link;
pub mod http;
pub mod library;
pub mod models;
pub mod provider;
pub mod resolver;
pub mod service;

pub use ai_filter::AiFilter;
pub use channel::{
    parse_post_link, post_link, ChannelIndex, ChannelPost, ChannelSearch, ChannelSettings,
    GrammersIndex, PostRef, DEFAULT_CHANNEL_SESSION_FILE,
};
pub use download::{file_name_for, Downloader, DEFAULT_MAX_BYTES};
pub use error::{Result, SearchError};
pub use google::{GoogleSearch, DEFAULT_GOOGLE_API_URL};
pub use google_link::GoogleLinkProvider;
pub use http::{HttpClient, HttpSettings, DEFAULT_USER_AGENT};
pub use library::{LibraryScraper, DEFAULT_LIBRARY_BASE_URL, DEFAULT_LIBRARY_SEARCH_PATH};
pub use models::{BookCandidate, CandidateKind, DirectLink, DownloadedFile, FileKind};
pub use provider::SearchProvider;
pub use resolver::{LinkResolver, DEFAULT_MAX_HOPS};
pub use service::{BookSearchService, DEFAULT_MAX_RESULTS};
