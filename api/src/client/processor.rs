//! Query processing and tool calling
//!
//! Implements the tool-using loop:
//! 1. The user query starts the conversation
//! 2. The model receives the transcript along with available tools
//! 3. The model decides whether to call tools or answer directly
//! 4. Requested tools are executed in order and their results fed back
//! 5. Loop continues until the model responds without tool calls

use std::sync::Arc;

use thiserror::Error;

use crate::llm::{ChatMessage, ContentBlock, GatewayError, ModelGateway};
use crate::mcp::{ChannelError, ToolChannel, ToolDescriptor};

use super::result::{QueryResult, ToolCallRecord, ToolResultRecord};

/// Errors that abort a query (per-tool failures do not — they are fed back
/// to the model as error results).
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Connection(#[from] ChannelError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("tool-calling loop exceeded {0} rounds")]
    LoopBudgetExceeded(usize),
}

/// Drives the conversation between the model gateway and the tool channel.
pub struct QueryProcessor {
    gateway: Arc<dyn ModelGateway>,
    max_tool_rounds: usize,
}

impl QueryProcessor {
    pub fn new(gateway: Arc<dyn ModelGateway>, max_tool_rounds: usize) -> Self {
        Self {
            gateway,
            max_tool_rounds,
        }
    }

    /// Process a query against the given tool catalog.
    ///
    /// The conversation lives for the duration of this call only. Tool
    /// results are appended in invocation order, which is the order the
    /// model requested them.
    pub async fn process(
        &self,
        channel: &dyn ToolChannel,
        query: &str,
        tools: &[ToolDescriptor],
    ) -> Result<QueryResult, QueryError> {
        let mut messages = vec![ChatMessage::user_text(query)];
        let mut result = QueryResult::default();

        let mut rounds = 0;
        loop {
            rounds += 1;
            if rounds > self.max_tool_rounds {
                tracing::warn!(
                    "query exceeded {} model/tool rounds, giving up",
                    self.max_tool_rounds
                );
                return Err(QueryError::LoopBudgetExceeded(self.max_tool_rounds));
            }

            tracing::debug!(round = rounds, messages = messages.len(), "calling model");
            let blocks = self.gateway.complete(&messages, tools).await?;

            // Partition the response: text goes straight into the result,
            // tool-use blocks queue for execution.
            let mut pending_calls = Vec::new();
            for block in &blocks {
                match block {
                    ContentBlock::Text { text } => {
                        let trimmed = text.trim();
                        if !trimmed.is_empty() {
                            result.text.push(trimmed.to_string());
                        }
                    }
                    ContentBlock::ToolUse { id, name, input } => {
                        result.tool_calls.push(ToolCallRecord {
                            id: id.clone(),
                            name: name.clone(),
                            args: input.clone(),
                        });
                        pending_calls.push((id.clone(), name.clone(), input.clone()));
                    }
                    ContentBlock::ToolResult { .. } => {}
                }
            }

            // The assistant turn joins the transcript exactly as received,
            // including the final turn with no tool calls.
            messages.push(ChatMessage::assistant(blocks));

            if pending_calls.is_empty() {
                tracing::debug!(rounds, "model answered without tool calls");
                return Ok(result);
            }

            tracing::info!("model requested {} tool call(s)", pending_calls.len());

            for (id, name, args) in pending_calls {
                match channel.call_tool(&name, args.clone()).await {
                    Ok(payload) => {
                        result.tool_results.push(ToolResultRecord::success(
                            &id,
                            &name,
                            args,
                            payload.clone(),
                        ));
                        messages.push(ChatMessage::tool_result(&id, payload, false));
                    }
                    Err(e) => {
                        // Not fatal: the model sees the error and may retry,
                        // pick another tool, or answer in text.
                        tracing::error!("error executing tool {}: {}", name, e);
                        result.tool_results.push(ToolResultRecord::error(
                            &id,
                            &name,
                            args,
                            e.to_string(),
                        ));
                        messages.push(ChatMessage::tool_result(
                            &id,
                            format!("Error: {}", e),
                            true,
                        ));
                    }
                }
            }
        }
    }
}
