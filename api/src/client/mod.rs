//! Client facade: one MCP session, one cached catalog, one processor
//!
//! The session is created lazily on first use and shared by every request
//! handler. Creation is serialized behind an exclusive lock so concurrent
//! first callers cannot race to open two connections.

mod processor;
mod result;

pub use processor::{QueryError, QueryProcessor};
pub use result::{CallStatus, QueryOutcome, QueryResult, ToolCallRecord, ToolResultRecord, ToolsOutcome};

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Settings;
use crate::llm::{AnthropicGateway, ModelGateway};
use crate::mcp::{ChannelError, Connector, HttpConnector, ToolChannel, ToolDescriptor};

/// A live session: the connected channel plus the catalog fetched at
/// connect time. Immutable once stored.
pub struct Session {
    channel: Arc<dyn ToolChannel>,
    tools: Vec<ToolDescriptor>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

/// Facade over the model gateway and the MCP channel.
pub struct McpClient {
    endpoint: String,
    connector: Arc<dyn Connector>,
    processor: QueryProcessor,
    session: RwLock<Option<Arc<Session>>>,
}

impl McpClient {
    /// Build the production client from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let gateway = Arc::new(AnthropicGateway::new(
            &settings.anthropic_api_key,
            &settings.model_name,
            settings.max_tokens,
        ));
        Self::new(
            &settings.mcp_endpoint,
            gateway,
            Arc::new(HttpConnector),
            settings.max_tool_rounds,
        )
    }

    pub fn new(
        endpoint: &str,
        gateway: Arc<dyn ModelGateway>,
        connector: Arc<dyn Connector>,
        max_tool_rounds: usize,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            connector,
            processor: QueryProcessor::new(gateway, max_tool_rounds),
            session: RwLock::new(None),
        }
    }

    /// Get the live session, dialing the MCP server on first use.
    ///
    /// Double-checked: the read path is lock-free of the write guard, and
    /// losers of the connect race reuse the winner's session. A failed
    /// connect leaves the facade disconnected so a later call can retry.
    pub async fn ensure_connected(&self) -> Result<Arc<Session>, ChannelError> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(Arc::clone(session));
        }

        let mut slot = self.session.write().await;
        if let Some(session) = slot.as_ref() {
            return Ok(Arc::clone(session));
        }

        let channel = self.connector.connect(&self.endpoint).await?;
        let tools = match channel.list_tools().await {
            Ok(tools) => tools,
            Err(e) => {
                channel.cleanup().await;
                return Err(ChannelError::InitializationFailed(e.to_string()));
            }
        };

        tracing::info!("connected to MCP server with {} tools", tools.len());

        let session = Arc::new(Session { channel, tools });
        *slot = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Process a user query. Never fails: errors come back as the
    /// `status: "error"` shape.
    pub async fn process_query(&self, query: &str) -> QueryOutcome {
        let session = match self.ensure_connected().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("connection failed: {}", e);
                return QueryOutcome::Error {
                    error: e.to_string(),
                };
            }
        };

        match self
            .processor
            .process(session.channel.as_ref(), query, &session.tools)
            .await
        {
            Ok(data) => QueryOutcome::Success { data },
            Err(e) => {
                tracing::error!("error processing query: {}", e);
                QueryOutcome::Error {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Return the cached tool catalog (no re-fetch).
    pub async fn list_tools(&self) -> ToolsOutcome {
        match self.ensure_connected().await {
            Ok(session) => ToolsOutcome::Success {
                tools: session.tools.clone(),
            },
            Err(e) => {
                tracing::error!("error getting available tools: {}", e);
                ToolsOutcome::Error {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Drop the session and release its transport. Idempotent.
    pub async fn cleanup(&self) {
        let mut slot = self.session.write().await;
        if let Some(session) = slot.take() {
            session.channel.cleanup().await;
        }
    }
}
