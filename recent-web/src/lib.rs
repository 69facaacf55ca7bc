//! Web discovery for the digest.
//!
//! - [`SearchClient`]: the search-and-retrieve seam the fetcher talks to
//! - [`exa`]: Exa search API client (search + page contents in one call)

pub mod exa;

use async_trait::async_trait;
use recent_common::Result;

pub use exa::types::{SearchHit, SearchRequest};
pub use exa::ExaApi;

/// A search backend that returns full text and highlights with each hit.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search_and_contents(&self, request: &SearchRequest) -> Result<Vec<SearchHit>>;
}
