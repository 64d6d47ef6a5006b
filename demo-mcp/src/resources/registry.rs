// Resource registry module
//
// This module defines the resource registry which manages the catalog of
// readable resources and resolves reads by URI.

use std::sync::{Arc, RwLock};
use async_trait::async_trait;

use crate::errors::ResourceError;
use crate::protocol::{ResourceContents, ResourceDescriptor};

/// Resource trait for implementing readable data sources
#[async_trait]
pub trait Resource: Send + Sync {
    /// Get the resource descriptor
    fn descriptor(&self) -> ResourceDescriptor;

    /// Produce the current content of the resource
    async fn read(&self) -> Result<String, ResourceError>;
}

/// ResourceRegistry manages resource registration and lookup
pub struct ResourceRegistry {
    resources: RwLock<Vec<Arc<dyn Resource>>>,
}

impl ResourceRegistry {
    /// Create a new resource registry
    pub fn new() -> Self {
        Self {
            resources: RwLock::new(Vec::new()),
        }
    }

    /// Register a resource with the registry
    pub fn register_resource(&self, resource: Arc<dyn Resource>) -> Result<(), ResourceError> {
        let uri = resource.descriptor().uri;
        if !is_scheme_uri(&uri) {
            return Err(ResourceError::RegistrationFailed(format!(
                "'{}' is not of the form scheme://identifier",
                uri
            )));
        }

        let mut resources = self.resources.write().map_err(|_| {
            ResourceError::RegistrationFailed("Failed to acquire write lock".to_string())
        })?;

        if resources.iter().any(|r| r.descriptor().uri == uri) {
            return Err(ResourceError::RegistrationFailed(format!(
                "Resource '{}' already registered",
                uri
            )));
        }

        resources.push(resource);
        Ok(())
    }

    /// Get a resource by URI
    pub fn get_resource(&self, uri: &str) -> Option<Arc<dyn Resource>> {
        self.resources
            .read()
            .ok()?
            .iter()
            .find(|r| r.descriptor().uri == uri)
            .cloned()
    }

    /// List all registered resources in registration order
    pub fn list(&self) -> Vec<ResourceDescriptor> {
        self.resources
            .read()
            .map(|resources| resources.iter().map(|r| r.descriptor()).collect())
            .unwrap_or_default()
    }

    /// Read a resource by URI
    pub async fn read(&self, uri: &str) -> Result<ResourceContents, ResourceError> {
        let resource = self
            .get_resource(uri)
            .ok_or_else(|| ResourceError::NotFound(uri.to_string()))?;
        let descriptor = resource.descriptor();
        let text = resource.read().await?;

        Ok(ResourceContents {
            uri: descriptor.uri,
            mime_type: descriptor.mime_type,
            text,
        })
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// True for `scheme://identifier` with an RFC 3986 style scheme
pub fn is_scheme_uri(uri: &str) -> bool {
    let Some((scheme, identifier)) = uri.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    let starts_with_letter = chars.next().map_or(false, |c| c.is_ascii_alphabetic());
    starts_with_letter
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && !identifier.is_empty()
}
