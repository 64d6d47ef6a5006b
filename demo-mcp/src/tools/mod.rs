// Tools module for the MCP server
//
// This module implements the tool registration and execution system
// for the MCP server.

pub mod github;
pub mod notes;
pub mod weather;
mod registry;

pub use registry::{string_param, Tool, ToolDefinition, ToolParameter, ToolRegistry, ToolResult};

use std::sync::Arc;
use crate::models::notes::NotesStore;
use crate::search::RepositorySearch;

/// Initialize the tool registry
pub fn init_registry(
    store: Arc<NotesStore>,
    search: Arc<dyn RepositorySearch>,
    per_page: usize,
) -> Arc<ToolRegistry> {
    let registry = ToolRegistry::new();

    // Register notes tools
    notes::register_tools(&registry, store);

    // Register weather tool
    if let Err(e) = weather::GetWeatherTool::register(&registry) {
        log::error!("Failed to register GetWeatherTool: {}", e);
    }

    // Register repository search tool
    if let Err(e) = github::SearchGithubTool::register(&registry, search, per_page) {
        log::error!("Failed to register SearchGithubTool: {}", e);
    }

    Arc::new(registry)
}
