//! MCP client over the streamable HTTP transport

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::{
    model::{
        CallToolRequestParams, CallToolResult, ClientCapabilities, ClientInfo, Implementation,
        RawContent,
    },
    service::RunningService,
    transport::StreamableHttpClientTransport,
    RoleClient, ServiceExt,
};
use serde_json::Value;
use tokio::sync::Mutex;

use super::{ChannelError, Connector, ToolChannel, ToolDescriptor};

/// Connection to a single MCP server.
///
/// The service handle sits behind a lock so `cleanup` can consume it; calls
/// after cleanup fail with [`ChannelError::NotConnected`].
pub struct McpChannel {
    service: Mutex<Option<RunningService<RoleClient, ClientInfo>>>,
}

impl McpChannel {
    /// Connect to an MCP server and run the initialization handshake
    pub async fn connect(endpoint: &str) -> Result<Self, ChannelError> {
        tracing::info!("connecting to MCP endpoint: {}", endpoint);

        let transport = StreamableHttpClientTransport::from_uri(endpoint);

        let client_info = ClientInfo {
            meta: None,
            protocol_version: Default::default(),
            capabilities: ClientCapabilities::default(),
            client_info: Implementation {
                name: "mcp-client-api".to_string(),
                title: Some("MCP Client API".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                website_url: None,
                icons: None,
            },
        };

        let service = client_info
            .serve(transport)
            .await
            .map_err(|e| ChannelError::InitializationFailed(e.to_string()))?;

        tracing::info!("MCP server connection established");

        Ok(Self {
            service: Mutex::new(Some(service)),
        })
    }
}

/// Flatten a tool result into a single text payload
fn text_content(result: &CallToolResult) -> String {
    let mut output = String::new();
    for content in &result.content {
        if !output.is_empty() {
            output.push('\n');
        }
        match &content.raw {
            RawContent::Text(text) => output.push_str(&text.text),
            other => output.push_str(&format!("{:?}", other)),
        }
    }
    output
}

#[async_trait]
impl ToolChannel for McpChannel {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ChannelError> {
        let guard = self.service.lock().await;
        let service = guard.as_ref().ok_or(ChannelError::NotConnected)?;

        let response = service
            .list_tools(Default::default())
            .await
            .map_err(|e| ChannelError::Protocol(e.to_string()))?;

        Ok(response
            .tools
            .into_iter()
            .map(|t| ToolDescriptor {
                name: t.name.to_string(),
                description: t.description.map(|d| d.to_string()).unwrap_or_default(),
                input_schema: serde_json::to_value(&t.input_schema).unwrap_or_default(),
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, args: Value) -> Result<String, ChannelError> {
        let guard = self.service.lock().await;
        let service = guard.as_ref().ok_or(ChannelError::NotConnected)?;

        tracing::debug!("calling tool {} with args: {}", name, args);

        let result = service
            .call_tool(CallToolRequestParams {
                meta: None,
                name: name.to_owned().into(),
                arguments: args.as_object().cloned(),
                task: None,
            })
            .await
            .map_err(|e| ChannelError::ToolCallFailed(e.to_string()))?;

        let payload = text_content(&result);
        if result.is_error.unwrap_or(false) {
            return Err(ChannelError::ToolCallFailed(payload));
        }

        tracing::debug!(
            "tool {} returned {} bytes of content",
            name,
            payload.len()
        );
        Ok(payload)
    }

    async fn cleanup(&self) {
        let mut guard = self.service.lock().await;
        if let Some(service) = guard.take() {
            tracing::info!("closing MCP server connection");
            if let Err(e) = service.cancel().await {
                tracing::error!("error during cleanup: {}", e);
            }
        }
    }
}

/// Default connector: dials a [`McpChannel`] over streamable HTTP
pub struct HttpConnector;

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn ToolChannel>, ChannelError> {
        Ok(Arc::new(McpChannel::connect(endpoint).await?))
    }
}
