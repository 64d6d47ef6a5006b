// Notes tools module
//
// This module implements the tools that read and extend the notes collection.

mod add;
mod list;

pub use add::AddNoteTool;
pub use list::ListNotesTool;

use std::sync::Arc;
use crate::models::notes::NotesStore;
use crate::tools::registry::ToolRegistry;

/// Register notes tools with the registry
pub fn register_tools(registry: &ToolRegistry, store: Arc<NotesStore>) {
    // Register add note tool
    if let Err(e) = AddNoteTool::register(registry, store.clone()) {
        log::error!("Failed to register AddNoteTool: {}", e);
    }

    // Register list notes tool
    if let Err(e) = ListNotesTool::register(registry, store) {
        log::error!("Failed to register ListNotesTool: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolError;
    use serde_json::{json, Value};

    fn setup() -> (tempfile::TempDir, ToolRegistry, Arc<NotesStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(NotesStore::new(dir.path().join("notes.json")));
        let registry = ToolRegistry::new();
        register_tools(&registry, store.clone());
        (dir, registry, store)
    }

    #[tokio::test]
    async fn test_empty_collection_message() {
        let (_dir, registry, _) = setup();
        let out = registry.invoke("list_notes", json!({})).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "No notes found.");
    }

    #[tokio::test]
    async fn test_add_then_list_in_creation_order() {
        let (_dir, registry, _) = setup();

        let first = registry
            .invoke("add_note", json!({"title": "Groceries", "content": "Milk, eggs"}))
            .await
            .unwrap();
        assert_eq!(first[0].text, "Note added successfully! ID: 1");

        let second = registry
            .invoke("add_note", json!({"title": "Todo", "content": "Call Alice"}))
            .await
            .unwrap();
        assert_eq!(second[0].text, "Note added successfully! ID: 2");

        let listed = registry.invoke("list_notes", Value::Null).await.unwrap();
        let text = &listed[0].text;
        assert!(text.starts_with("All Notes:\n"));
        let one = text.find("ID: 1\nTitle: Groceries\nContent: Milk, eggs\n").unwrap();
        let two = text.find("ID: 2\nTitle: Todo\nContent: Call Alice\n").unwrap();
        assert!(one < two);
    }

    #[tokio::test]
    async fn test_missing_content_does_not_mutate() {
        let (_dir, registry, store) = setup();

        let err = registry
            .invoke("add_note", json!({"title": "t"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters(_)));
        assert!(store.load().await.is_empty());
        assert!(!store.path().exists());
    }
}
