//! Search provider abstraction.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::BookCandidate;

/// A source of book candidates for a free-text title query.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Stable id used in config (`SEARCH_PROVIDERS`) and logs.
    fn id(&self) -> &str;

    /// Returns at most `limit` candidates; an empty list means "nothing found".
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<BookCandidate>>;
}
