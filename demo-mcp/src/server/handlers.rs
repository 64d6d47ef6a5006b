// MCP method handlers
//
// Each handler turns decoded params into a JSON result or a typed error.
// Registry errors are folded into `McpError` here, at the protocol boundary.

use std::sync::atomic::Ordering;
use serde_json::{json, Value};

use super::{McpServer, Method};
use crate::errors::McpError;
use crate::protocol::SUPPORTED_PROTOCOL_VERSIONS;

impl McpServer {
    /// Handle the initialization handshake.
    ///
    /// The client's protocol version is echoed back when supported, otherwise
    /// the newest version this server speaks is offered instead.
    pub(super) fn initialize(&self, params: &Value) -> Result<Value, McpError> {
        let requested = params.get("protocolVersion").and_then(Value::as_str);
        let version = requested
            .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
            .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0]);

        if self
            .initialized
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(McpError::invalid_request("Server is already initialized"));
        }

        let client = params
            .pointer("/clientInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unknown client");
        log::info!("Initialized session with {} (protocol {})", client, version);

        Ok(json!({
            "protocolVersion": version,
            "capabilities": {
                "resources": { "listChanged": false },
                "tools": { "listChanged": false }
            },
            "serverInfo": self.info
        }))
    }

    /// Route a post-handshake request to its registry
    pub(super) async fn handle(&self, method: Method, params: Value) -> Result<Value, McpError> {
        match method {
            Method::ListResources => Ok(json!({ "resources": self.resources.list() })),

            Method::ReadResource => {
                let uri = params
                    .get("uri")
                    .and_then(Value::as_str)
                    .ok_or_else(|| McpError::invalid_arguments("'uri' parameter is required"))?;
                let contents = self.resources.read(uri).await?;
                Ok(json!({ "contents": [contents] }))
            }

            Method::ListTools => Ok(json!({ "tools": self.tools.list_tools() })),

            Method::CallTool => {
                let name = params
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| McpError::invalid_arguments("'name' parameter is required"))?;
                let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

                let content = self.tools.invoke(name, arguments).await?;
                Ok(json!({ "content": content, "isError": false }))
            }

            Method::Initialize | Method::Ping => Err(McpError::internal(format!(
                "{:?} is answered by the read loop",
                method
            ))),
        }
    }
}
