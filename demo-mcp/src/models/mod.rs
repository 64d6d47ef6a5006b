// Models module for the MCP server
//
// This module defines the persistent data models owned by the MCP server.

pub mod notes;
