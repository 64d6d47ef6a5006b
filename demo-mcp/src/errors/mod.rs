// Error handling module for the MCP server
//
// This module defines the error types used throughout the MCP server and the
// single protocol-facing error every component error is folded into.

use serde::Serialize;
use thiserror::Error;

/// Classification of a failed request as reported to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ParseError,
    InvalidRequest,
    UnknownMethod,
    InvalidArguments,
    UnknownResource,
    UnknownTool,
    NotInitialized,
    PersistenceError,
    UpstreamServiceError,
    Internal,
}

impl ErrorKind {
    /// JSON-RPC error code for this kind
    pub fn code(&self) -> i32 {
        match self {
            ErrorKind::ParseError => -32700,
            ErrorKind::InvalidRequest => -32600,
            ErrorKind::UnknownMethod => -32601,
            ErrorKind::InvalidArguments => -32602,
            ErrorKind::Internal => -32603,
            ErrorKind::UnknownResource => -32002,
            ErrorKind::UnknownTool => -32003,
            ErrorKind::NotInitialized => -32004,
            ErrorKind::PersistenceError => -32010,
            ErrorKind::UpstreamServiceError => -32011,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Protocol-level error: a kind plus a human readable message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct McpError {
    pub kind: ErrorKind,
    pub message: String,
}

impl McpError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    pub fn unknown_method(method: &str) -> Self {
        Self::new(ErrorKind::UnknownMethod, format!("Unknown method: {}", method))
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArguments, message)
    }

    pub fn not_initialized(method: &str) -> Self {
        Self::new(
            ErrorKind::NotInitialized,
            format!("Server not initialized; '{}' requires a prior initialize", method),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

/// Transport framing errors
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Malformed message: {reason}")]
    Decode {
        id: Option<serde_json::Value>,
        reason: String,
    },

    #[error("Message exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Transport failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Notes store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to persist notes to {path}: {reason}")]
    Persistence { path: String, reason: String },
}

/// Outbound search errors
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{0}")]
    Upstream(String),
}

/// Resource-specific errors
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Unknown resource: {0}")]
    NotFound(String),

    #[error("Resource registration failed: {0}")]
    RegistrationFailed(String),

    #[error("Failed to read resource: {0}")]
    ReadFailed(String),
}

/// Tool-specific errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidParameters(String),

    #[error("Tool registration failed: {0}")]
    RegistrationFailed(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Upstream service error: {0}")]
    Upstream(#[from] SearchError),
}

impl From<FrameError> for McpError {
    fn from(err: FrameError) -> Self {
        McpError::parse_error(err.to_string())
    }
}

impl From<ResourceError> for McpError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound(_) => McpError::new(ErrorKind::UnknownResource, err.to_string()),
            ResourceError::RegistrationFailed(_) | ResourceError::ReadFailed(_) => {
                McpError::internal(err.to_string())
            }
        }
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let kind = match &err {
            ToolError::NotFound(_) => ErrorKind::UnknownTool,
            ToolError::InvalidParameters(_) => ErrorKind::InvalidArguments,
            ToolError::RegistrationFailed(_) => ErrorKind::Internal,
            ToolError::Store(_) => ErrorKind::PersistenceError,
            ToolError::Upstream(_) => ErrorKind::UpstreamServiceError,
        };
        McpError::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_errors_map_to_kinds() {
        let err: McpError = ToolError::NotFound("nope".to_string()).into();
        assert_eq!(err.kind, ErrorKind::UnknownTool);
        assert_eq!(err.message, "Unknown tool: nope");

        let err: McpError = ToolError::InvalidParameters("missing 'content'".to_string()).into();
        assert_eq!(err.kind, ErrorKind::InvalidArguments);

        let err: McpError = ToolError::Store(StoreError::Persistence {
            path: "notes.json".to_string(),
            reason: "read-only file system".to_string(),
        })
        .into();
        assert_eq!(err.kind, ErrorKind::PersistenceError);
        assert!(err.message.contains("notes.json"));
    }

    #[test]
    fn test_resource_not_found_maps_to_unknown_resource() {
        let err: McpError = ResourceError::NotFound("foo://bar".to_string()).into();
        assert_eq!(err.kind, ErrorKind::UnknownResource);
        assert_eq!(err.kind.code(), -32002);
    }
}
