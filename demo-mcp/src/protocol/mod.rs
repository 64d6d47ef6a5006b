// Protocol module for the MCP server
//
// This module defines the wire structures of the Model Context Protocol:
// the JSON-RPC envelope plus the catalog and content types exchanged in
// its payloads.

pub mod jsonrpc;

pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol versions this server can speak, newest first
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// Identity announced during the initialization handshake
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Describes a readable resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Identifier of the form `scheme://identifier`
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// Body of a successfully read resource
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// Describes an invokable tool
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// One piece of textual tool output
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub text: String,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            content_type: "text",
            text: text.into(),
        }
    }
}
