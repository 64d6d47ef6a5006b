// Weather Tool
//
// This tool produces a placeholder weather report for a city. It is a pure
// function of its input and always succeeds.

use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ToolError;
use crate::protocol::TextContent;
use crate::tools::registry::{string_param, ToolRegistry};
use crate::tools::{Tool, ToolDefinition, ToolParameter, ToolResult};

/// Weather Tool Implementation
pub struct GetWeatherTool;

impl GetWeatherTool {
    /// Register this tool with the registry
    pub fn register(registry: &ToolRegistry) -> Result<(), ToolError> {
        registry.register_tool(Arc::new(Self))
    }
}

/// Render the report for a city
pub fn weather_report(city: &str) -> String {
    format!(
        "Weather for {}:\nTemperature: 25°C\nCondition: Partly Cloudy\nHumidity: 60%\nWind: 10 km/h",
        city
    )
}

#[async_trait]
impl Tool for GetWeatherTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_weather".to_string(),
            description: "Get weather information for a city".to_string(),
            parameters: vec![ToolParameter::required_string("city", "City name")],
        }
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let city = string_param(&params, "city")?;
        Ok(vec![TextContent::new(weather_report(city))])
    }
}
