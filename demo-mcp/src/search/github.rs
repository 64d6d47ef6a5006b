// GitHub repository search
//
// Issues `GET /search/repositories` against the configured API base with an
// enforced timeout. Every failure mode collapses into `SearchError::Upstream`.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{RepositorySearch, RepositorySummary};
use crate::config::SearchSettings;
use crate::errors::SearchError;

/// Search API response wrapper
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RepositorySummary>,
}

/// Repository search backed by the GitHub REST API
pub struct GithubSearchClient {
    http_client: Client,
    api_base: String,
    timeout: Duration,
}

impl GithubSearchClient {
    /// Create a client from the search settings
    pub fn new(settings: &SearchSettings) -> Result<Self, SearchError> {
        let http_client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| SearchError::Upstream(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            timeout: settings.timeout(),
        })
    }

    fn describe(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            SearchError::Upstream(format!("request timed out after {}s", self.timeout.as_secs_f32()))
        } else if err.is_decode() {
            SearchError::Upstream(format!("unexpected response body: {}", err))
        } else {
            SearchError::Upstream(format!("request failed: {}", err))
        }
    }
}

#[async_trait]
impl RepositorySearch for GithubSearchClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RepositorySummary>, SearchError> {
        let endpoint = format!("{}/search/repositories", self.api_base);
        let per_page = limit.to_string();

        let response = self.http_client
            .get(&endpoint)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .query(&[
                ("q", query),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.describe(e))?;

        if !response.status().is_success() {
            return Err(SearchError::Upstream(format!(
                "search API returned status {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await.map_err(|e| self.describe(e))?;
        log::debug!("Search for '{}' returned {} repositories", query, body.items.len());

        Ok(body.items.into_iter().take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn settings(api_base: String, timeout_secs: u64) -> SearchSettings {
        SearchSettings {
            api_base,
            timeout_secs,
            ..SearchSettings::default()
        }
    }

    #[tokio::test]
    async fn test_search_sends_ranking_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "rust mcp".into()),
                Matcher::UrlEncoded("sort".into(), "stars".into()),
                Matcher::UrlEncoded("order".into(), "desc".into()),
                Matcher::UrlEncoded("per_page".into(), "5".into()),
            ]))
            .match_header("user-agent", Matcher::Regex("demo-server".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "total_count": 2,
                    "items": [
                        {"full_name": "a/one", "description": "first", "stargazers_count": 10, "id": 1},
                        {"full_name": "b/two", "description": null, "stargazers_count": 4}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = GithubSearchClient::new(&settings(server.url(), 5)).unwrap();
        let results = client.search("rust mcp", 5).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            results,
            vec![
                RepositorySummary {
                    full_name: "a/one".to_string(),
                    description: Some("first".to_string()),
                    star_count: 10,
                },
                RepositorySummary {
                    full_name: "b/two".to_string(),
                    description: None,
                    star_count: 4,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = GithubSearchClient::new(&settings(server.url(), 5)).unwrap();
        let err = client.search("anything", 5).await.unwrap_err();
        assert!(err.to_string().contains("403"), "{}", err);
    }

    #[tokio::test]
    async fn test_garbage_body_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let client = GithubSearchClient::new(&settings(server.url(), 5)).unwrap();
        assert!(client.search("anything", 5).await.is_err());
    }

    #[tokio::test]
    async fn test_stalled_server_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let stall = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client = GithubSearchClient::new(&settings(format!("http://{}", addr), 1)).unwrap();
        let err = client.search("slow", 5).await.unwrap_err();
        assert!(err.to_string().contains("timed out"), "{}", err);
        stall.abort();
    }

    #[tokio::test]
    async fn test_unreachable_host_is_upstream_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GithubSearchClient::new(&settings(format!("http://{}", addr), 1)).unwrap();
        let err = client.search("nowhere", 5).await.unwrap_err();
        assert!(err.to_string().contains("request failed"), "{}", err);
    }
}
