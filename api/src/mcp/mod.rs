//! MCP (Model Context Protocol) client layer
//!
//! Connects to a remote MCP server over the streamable HTTP transport and
//! exposes its tools to the query-processing loop.

mod client;

pub use client::{HttpConnector, McpChannel};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// A tool advertised by the MCP server
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    /// Tool name, unique within the catalog
    pub name: String,
    /// Tool description
    pub description: String,
    /// Input schema (JSON)
    pub input_schema: Value,
}

/// MCP channel errors
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("not connected to an MCP server")]
    NotConnected,

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("initialization failed: {0}")]
    InitializationFailed(String),

    #[error("tool call failed: {0}")]
    ToolCallFailed(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// A live connection to an MCP server.
///
/// Tool execution failures come back as `Err` values so the caller can treat
/// them as a first-class branch rather than aborting a batch.
#[async_trait]
pub trait ToolChannel: Send + Sync {
    /// List the tools the server exposes, in server order
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ChannelError>;

    /// Invoke a named tool and return its flattened text payload
    async fn call_tool(&self, name: &str, args: Value) -> Result<String, ChannelError>;

    /// Release the transport. Idempotent; failures are logged, not raised.
    async fn cleanup(&self);
}

/// Opens a [`ToolChannel`] against an endpoint URL
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn ToolChannel>, ChannelError>;
}
