// demo-mcp: Model Context Protocol Server for notes, weather and repository search
//
// This library implements a Model Context Protocol (MCP) server which exposes
// a small catalog of resources and tools over a newline-delimited JSON-RPC
// channel, and persists a single collection of notes between calls.

pub mod config;
pub mod errors;
pub mod models;
pub mod protocol;
pub mod resources;
pub mod search;
pub mod server;
pub mod tools;
pub mod transport;

/// Name this server announces during the initialization handshake
pub const SERVER_NAME: &str = "demo-server";

/// Version this server announces during the initialization handshake
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default server configuration constants
pub mod defaults {
    /// Default location of the persisted notes collection
    pub const NOTES_FILE: &str = "notes.json";
    /// Default base URL of the repository search API
    pub const GITHUB_API_BASE: &str = "https://api.github.com";
    /// Default timeout for the outbound search call in seconds
    pub const SEARCH_TIMEOUT_SECS: u64 = 10;
    /// Number of repositories requested from the search API
    pub const SEARCH_PER_PAGE: usize = 5;
    /// Number of repositories rendered by the search tool
    pub const SEARCH_DISPLAY_LIMIT: usize = 3;
    /// Largest accepted inbound frame in bytes
    pub const MAX_FRAME_BYTES: usize = 1024 * 1024;
    /// Default log filter
    pub const LOG_LEVEL: &str = "info";
}
