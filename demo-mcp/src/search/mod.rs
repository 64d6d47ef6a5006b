// Repository search module
//
// This module wraps the single outbound network call the server makes: a
// repository search ranked by stars.

mod github;

pub use github::GithubSearchClient;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::SearchError;

/// One ranked search hit
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RepositorySummary {
    /// `owner/name`
    pub full_name: String,
    /// Repository description, if any
    pub description: Option<String>,
    /// Star count
    #[serde(rename = "stargazers_count")]
    pub star_count: u64,
}

/// Searches a repository index
#[async_trait]
pub trait RepositorySearch: Send + Sync {
    /// Return up to `limit` repositories matching `query`, best first
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RepositorySummary>, SearchError>;
}
