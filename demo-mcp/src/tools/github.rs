// GitHub Search Tool
//
// This tool searches repositories through the configured search adapter and
// renders the top hits. Upstream failures are reported as text, never as a
// request error.

use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ToolError;
use crate::protocol::TextContent;
use crate::search::{RepositorySearch, RepositorySummary};
use crate::tools::registry::{string_param, ToolRegistry};
use crate::tools::{Tool, ToolDefinition, ToolParameter, ToolResult};

/// GitHub Search Tool Implementation
pub struct SearchGithubTool {
    search: Arc<dyn RepositorySearch>,
    per_page: usize,
}

impl SearchGithubTool {
    /// Create a new search tool requesting `per_page` results per call
    pub fn new(search: Arc<dyn RepositorySearch>, per_page: usize) -> Self {
        Self { search, per_page }
    }

    /// Register this tool with the registry
    pub fn register(
        registry: &ToolRegistry,
        search: Arc<dyn RepositorySearch>,
        per_page: usize,
    ) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self::new(search, per_page)))
    }
}

fn render(query: &str, repositories: &[RepositorySummary]) -> String {
    let lines: Vec<String> = repositories
        .iter()
        .take(crate::defaults::SEARCH_DISPLAY_LIMIT)
        .map(|repo| {
            format!(
                "• {} - {} (⭐ {})",
                repo.full_name,
                repo.description.as_deref().unwrap_or("No description"),
                repo.star_count
            )
        })
        .collect();

    if lines.is_empty() {
        return format!("No repositories found for '{}'.", query);
    }
    format!("Top GitHub repositories for '{}':\n\n{}", query, lines.join("\n"))
}

#[async_trait]
impl Tool for SearchGithubTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_github".to_string(),
            description: "Search GitHub repositories".to_string(),
            parameters: vec![ToolParameter::required_string("query", "Search query")],
        }
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let query = string_param(&params, "query")?;

        let text = match self.search.search(query, self.per_page).await {
            Ok(repositories) => render(query, &repositories),
            Err(e) => {
                log::warn!("Repository search for '{}' failed: {}", query, e);
                format!("Error searching GitHub: {}", e)
            }
        };

        Ok(vec![TextContent::new(text)])
    }
}
