//! Provider fallback chain plus dedup, truncation and optional AI filtering.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::ai_filter::AiFilter;
use crate::error::Result;
use crate::models::BookCandidate;
use crate::provider::SearchProvider;

pub const DEFAULT_MAX_RESULTS: usize = 5;

#[derive(Clone)]
pub struct BookSearchService {
    providers: Vec<Arc<dyn SearchProvider>>,
    filter: Option<AiFilter>,
    max_results: usize,
}

impl BookSearchService {
    pub fn new(max_results: usize) -> Self {
        Self {
            providers: Vec::new(),
            filter: None,
            max_results,
        }
    }

    /// Appends a provider; earlier providers are tried first.
    pub fn add_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_filter(mut self, filter: Option<AiFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn provider_ids(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.id().to_string()).collect()
    }

    /// First provider with a non-empty answer wins. Errors only if every provider failed.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<BookCandidate>> {
        let mut last_error = None;
        let mut any_ok = false;

        for provider in &self.providers {
            match provider.search(query, self.max_results).await {
                Ok(found) if found.is_empty() => {
                    info!(provider = %provider.id(), "Provider found nothing, trying next");
                    any_ok = true;
                }
                Ok(found) => {
                    info!(provider = %provider.id(), count = found.len(), "Provider returned results");
                    let results = dedupe(found, self.max_results);
                    return Ok(match &self.filter {
                        Some(filter) => filter.apply(query, results).await,
                        None => results,
                    });
                }
                Err(e) => {
                    warn!(provider = %provider.id(), error = %e, "Provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !any_ok => Err(e),
            _ => Ok(Vec::new()),
        }
    }
}

/// Drops repeated URLs (first wins) and truncates.
pub fn dedupe(candidates: Vec<BookCandidate>, max: usize) -> Vec<BookCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.url.clone()))
        .take(max)
        .collect()
}
