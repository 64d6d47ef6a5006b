// System information resource

use std::sync::Arc;
use std::time::Instant;
use async_trait::async_trait;

use super::registry::{Resource, ResourceRegistry};
use crate::errors::ResourceError;
use crate::protocol::{ResourceDescriptor, ServerInfo};

pub const SYSTEM_URI: &str = "system://info";

/// Host and process facts
pub struct SystemInfoResource {
    server: ServerInfo,
    started: Instant,
}

impl SystemInfoResource {
    pub fn new(server: ServerInfo) -> Self {
        Self {
            server,
            started: Instant::now(),
        }
    }

    /// Register this resource with the registry
    pub fn register(registry: &ResourceRegistry, server: ServerInfo) -> Result<(), ResourceError> {
        registry.register_resource(Arc::new(Self::new(server)))
    }
}

#[async_trait]
impl Resource for SystemInfoResource {
    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            uri: SYSTEM_URI.to_string(),
            name: "System Info".to_string(),
            description: "System information".to_string(),
            mime_type: "text/plain".to_string(),
        }
    }

    async fn read(&self) -> Result<String, ResourceError> {
        Ok(format!(
            "System Information:\n- Server: {} {}\n- Platform: {}\n- Architecture: {}\n- Uptime: {} seconds",
            self.server.name,
            self.server.version,
            std::env::consts::OS,
            std::env::consts::ARCH,
            self.started.elapsed().as_secs()
        ))
    }
}
