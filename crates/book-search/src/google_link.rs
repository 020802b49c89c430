//! Offline provider that hands the user a ready-made Google search link.

use async_trait::async_trait;

use crate::error::Result;
use crate::google::GoogleSearch;
use crate::models::{BookCandidate, CandidateKind};
use crate::provider::SearchProvider;

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search?q=";

#[derive(Debug, Clone, Default)]
pub struct GoogleLinkProvider;

impl GoogleLinkProvider {
    pub fn new() -> Self {
        Self
    }

    /// `https://www.google.com/search?q=<query filetype:pdf>`
    pub fn link_for(query: &str) -> String {
        format!(
            "{}{}",
            GOOGLE_SEARCH_URL,
            urlencoding::encode(&GoogleSearch::build_query(query))
        )
    }

    pub fn candidate_for(query: &str) -> BookCandidate {
        BookCandidate::new(
            format!("Search Google for \"{}\"", query.trim()),
            Self::link_for(query),
            "google_link",
            CandidateKind::External,
        )
    }
}

#[async_trait]
impl SearchProvider for GoogleLinkProvider {
    fn id(&self) -> &str {
        "google_link"
    }

    async fn search(&self, query: &str, _limit: usize) -> Result<Vec<BookCandidate>> {
        Ok(vec![Self::candidate_for(query)])
    }
}
