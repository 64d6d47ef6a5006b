// Notes resource
//
// Exposes the whole notes collection as pretty-printed JSON.

use std::sync::Arc;
use async_trait::async_trait;

use super::registry::{Resource, ResourceRegistry};
use crate::errors::ResourceError;
use crate::models::notes::NotesStore;
use crate::protocol::ResourceDescriptor;

pub const NOTES_URI: &str = "notes://all";

/// All stored notes
pub struct NotesResource {
    store: Arc<NotesStore>,
}

impl NotesResource {
    pub fn new(store: Arc<NotesStore>) -> Self {
        Self { store }
    }

    /// Register this resource with the registry
    pub fn register(registry: &ResourceRegistry, store: Arc<NotesStore>) -> Result<(), ResourceError> {
        registry.register_resource(Arc::new(Self::new(store)))
    }
}

#[async_trait]
impl Resource for NotesResource {
    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            uri: NOTES_URI.to_string(),
            name: "All Notes".to_string(),
            description: "All stored notes".to_string(),
            mime_type: "application/json".to_string(),
        }
    }

    async fn read(&self) -> Result<String, ResourceError> {
        let notes = self.store.load().await;
        serde_json::to_string_pretty(&notes).map_err(|e| ResourceError::ReadFailed(e.to_string()))
    }
}
