// List Notes Tool
//
// This tool renders every stored note in creation order.

use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ToolError;
use crate::models::notes::NotesStore;
use crate::protocol::TextContent;
use crate::tools::registry::ToolRegistry;
use crate::tools::{Tool, ToolDefinition, ToolResult};

/// List Notes Tool Implementation
pub struct ListNotesTool {
    store: Arc<NotesStore>,
}

impl ListNotesTool {
    /// Create a new list notes tool
    pub fn new(store: Arc<NotesStore>) -> Self {
        Self { store }
    }

    /// Register this tool with the registry
    pub fn register(registry: &ToolRegistry, store: Arc<NotesStore>) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self::new(store)))
    }
}

#[async_trait]
impl Tool for ListNotesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "list_notes".to_string(),
            description: "List all notes".to_string(),
            parameters: vec![],
        }
    }

    async fn execute(&self, _params: Value) -> ToolResult {
        let notes = self.store.load().await;
        if notes.is_empty() {
            return Ok(vec![TextContent::new("No notes found.")]);
        }

        let mut text = String::from("All Notes:\n");
        for note in &notes {
            text.push_str(&note.to_string());
            text.push('\n');
        }

        Ok(vec![TextContent::new(text)])
    }
}
