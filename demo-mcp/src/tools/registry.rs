// Tool registry module
//
// This module defines the tool registry system which manages tool registration,
// argument validation and dispatch for the MCP server.

use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::ToolError;
use crate::protocol::{TextContent, ToolDescriptor};

/// ToolParameter defines a parameter for a tool
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Name of the parameter
    pub name: String,
    /// Description of the parameter
    pub description: String,
    /// Whether the parameter is required
    pub required: bool,
    /// Type of the parameter (string, number, integer, boolean, object, array)
    pub parameter_type: String,
}

impl ToolParameter {
    /// A required string parameter
    pub fn required_string(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            required: true,
            parameter_type: "string".to_string(),
        }
    }

    /// Whether `value` has this parameter's declared primitive type
    pub fn accepts(&self, value: &Value) -> bool {
        match self.parameter_type.as_str() {
            "string" => value.is_string(),
            "number" => value.is_number(),
            "integer" => value.is_i64() || value.is_u64(),
            "boolean" => value.is_boolean(),
            "object" => value.is_object(),
            "array" => value.is_array(),
            _ => true,
        }
    }
}

/// ToolDefinition defines a tool available in the MCP server
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool, unique across the registry
    pub name: String,
    /// Description of the tool
    pub description: String,
    /// Parameters for the tool
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    /// Describe this tool with a JSON Schema for its arguments
    pub fn to_descriptor(&self) -> ToolDescriptor {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    json!({ "type": p.parameter_type, "description": p.description }),
                )
            })
            .collect();

        let mut schema = json!({ "type": "object", "properties": properties });
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();
        if !required.is_empty() {
            schema["required"] = json!(required);
        }

        ToolDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: schema,
        }
    }
}

/// Type alias for tool execution results
pub type ToolResult = Result<Vec<TextContent>, ToolError>;

/// Tool trait for implementing tool functionality
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with already validated parameters
    async fn execute(&self, params: Value) -> ToolResult;

    /// Validate the parameters for the tool.
    ///
    /// Required parameters must be present and every declared parameter that
    /// is present must have its declared type. Undeclared keys are ignored.
    fn validate_params(&self, params: &Value) -> Result<(), ToolError> {
        let definition = self.definition();
        let map = params.as_object().ok_or_else(|| {
            ToolError::InvalidParameters("Parameters must be an object".to_string())
        })?;

        for param in &definition.parameters {
            match map.get(&param.name) {
                None | Some(Value::Null) if param.required => {
                    return Err(ToolError::InvalidParameters(format!(
                        "Missing required parameter: {}",
                        param.name
                    )));
                }
                None | Some(Value::Null) => {}
                Some(value) if !param.accepts(value) => {
                    return Err(ToolError::InvalidParameters(format!(
                        "Parameter '{}' must be of type {}",
                        param.name, param.parameter_type
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Fetch a string argument the schema has already vouched for
pub fn string_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::InvalidParameters(format!("'{}' parameter is required", name)))
}

/// ToolRegistry manages tool registration and discovery
pub struct ToolRegistry {
    tools: RwLock<Vec<Arc<dyn Tool>>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(Vec::new()),
        }
    }

    /// Register a tool with the registry
    pub fn register_tool(&self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.definition().name;

        let mut tools = self.tools.write().map_err(|_| {
            ToolError::RegistrationFailed("Failed to acquire write lock".to_string())
        })?;

        if tools.iter().any(|t| t.definition().name == name) {
            return Err(ToolError::RegistrationFailed(format!(
                "Tool with name '{}' already registered",
                name
            )));
        }

        tools.push(tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .read()
            .ok()?
            .iter()
            .find(|t| t.definition().name == name)
            .cloned()
    }

    /// List all registered tools in registration order
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.tools
            .read()
            .map(|tools| tools.iter().map(|t| t.definition().to_descriptor()).collect())
            .unwrap_or_default()
    }

    /// Validate the arguments and run the named tool.
    ///
    /// Absent arguments are treated as an empty object. Arguments the tool
    /// does not declare are ignored.
    pub async fn invoke(&self, name: &str, arguments: Value) -> ToolResult {
        let tool = self
            .get_tool(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let arguments = if arguments.is_null() { json!({}) } else { arguments };
        tool.validate_params(&arguments)?;
        tool.execute(arguments).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
