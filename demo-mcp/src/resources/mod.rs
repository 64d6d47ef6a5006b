// Resources module for the MCP server
//
// This module implements the catalog of readable resources and the
// read-by-URI operation.

mod notes;
mod registry;
mod system;
mod weather;

pub use notes::{NotesResource, NOTES_URI};
pub use registry::{is_scheme_uri, Resource, ResourceRegistry};
pub use system::{SystemInfoResource, SYSTEM_URI};
pub use weather::{CurrentWeatherResource, WEATHER_URI};

use std::sync::Arc;
use crate::models::notes::NotesStore;
use crate::protocol::ServerInfo;

/// Initialize the resource registry
pub fn init_registry(store: Arc<NotesStore>, server: ServerInfo) -> Arc<ResourceRegistry> {
    let registry = ResourceRegistry::new();

    if let Err(e) = NotesResource::register(&registry, store) {
        log::error!("Failed to register notes resource: {}", e);
    }

    if let Err(e) = CurrentWeatherResource::register(&registry) {
        log::error!("Failed to register weather resource: {}", e);
    }

    if let Err(e) = SystemInfoResource::register(&registry, server) {
        log::error!("Failed to register system resource: {}", e);
    }

    Arc::new(registry)
}
