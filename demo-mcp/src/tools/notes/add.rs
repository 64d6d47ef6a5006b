// Add Note Tool
//
// This tool appends a note to the persisted collection.

use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ToolError;
use crate::models::notes::NotesStore;
use crate::protocol::TextContent;
use crate::tools::registry::{string_param, ToolRegistry};
use crate::tools::{Tool, ToolDefinition, ToolParameter, ToolResult};

/// Add Note Tool Implementation
pub struct AddNoteTool {
    store: Arc<NotesStore>,
}

impl AddNoteTool {
    /// Create a new add note tool
    pub fn new(store: Arc<NotesStore>) -> Self {
        Self { store }
    }

    /// Register this tool with the registry
    pub fn register(registry: &ToolRegistry, store: Arc<NotesStore>) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self::new(store)))
    }
}

#[async_trait]
impl Tool for AddNoteTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "add_note".to_string(),
            description: "Add a new note".to_string(),
            parameters: vec![
                ToolParameter::required_string("title", "Note title"),
                ToolParameter::required_string("content", "Note content"),
            ],
        }
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let title = string_param(&params, "title")?;
        let content = string_param(&params, "content")?;

        let note = self.store.append(title, content).await?;
        log::info!("Added note {} '{}'", note.id, note.title);

        Ok(vec![TextContent::new(format!(
            "Note added successfully! ID: {}",
            note.id
        ))])
    }
}
