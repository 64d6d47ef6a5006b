// Current weather resource
//
// Placeholder reading stamped with the local time. It never consults
// anything that can fail.

use std::sync::Arc;
use async_trait::async_trait;

use super::registry::{Resource, ResourceRegistry};
use crate::errors::ResourceError;
use crate::protocol::ResourceDescriptor;

pub const WEATHER_URI: &str = "weather://current";

/// Current weather information
pub struct CurrentWeatherResource;

impl CurrentWeatherResource {
    /// Register this resource with the registry
    pub fn register(registry: &ResourceRegistry) -> Result<(), ResourceError> {
        registry.register_resource(Arc::new(Self))
    }
}

#[async_trait]
impl Resource for CurrentWeatherResource {
    fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            uri: WEATHER_URI.to_string(),
            name: "Current Weather".to_string(),
            description: "Current weather information".to_string(),
            mime_type: "text/plain".to_string(),
        }
    }

    async fn read(&self) -> Result<String, ResourceError> {
        Ok(format!(
            "Current weather: 22°C, Sunny (as of {})",
            chrono::Local::now().format("%Y-%m-%d %H:%M")
        ))
    }
}
