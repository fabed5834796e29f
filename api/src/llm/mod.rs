//! LLM abstraction layer
//!
//! Defines the conversation data model (Anthropic Messages wire shapes) and
//! the gateway trait the query-processing loop drives. The concrete backend
//! lives in [`anthropic`].

mod anthropic;

pub use anthropic::AnthropicGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::mcp::ToolDescriptor;

/// Errors from the model completion service.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to model API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API error {status}: {body}")]
    Api { status: u16, body: String },
}

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One unit of model output or conversation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default)]
        is_error: bool,
    },
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl ChatMessage {
    /// User message holding a single text block
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Assistant message carrying the model's content blocks verbatim
    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// User message carrying one tool result linked to its invocation
    pub fn tool_result(
        tool_use_id: impl Into<String>,
        content: impl Into<String>,
        is_error: bool,
    ) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::ToolResult {
                tool_use_id: tool_use_id.into(),
                content: content.into(),
                is_error,
            }],
        }
    }
}

/// Trait for model completion backends
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Run one completion over the transcript with the given tool catalog.
    ///
    /// A response with zero tool-use blocks is a normal final answer.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDescriptor],
    ) -> Result<Vec<ContentBlock>, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_value(Role::User).unwrap(), "user");
        assert_eq!(serde_json::to_value(Role::Assistant).unwrap(), "assistant");
    }

    #[test]
    fn tool_result_message_matches_wire_shape() {
        let msg = ChatMessage::tool_result("toolu_01", "Error: no such file", true);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"][0]["type"], "tool_result");
        assert_eq!(value["content"][0]["tool_use_id"], "toolu_01");
        assert_eq!(value["content"][0]["is_error"], true);
    }

    #[test]
    fn tool_use_block_round_trips() {
        let raw = r#"{"type":"tool_use","id":"t1","name":"list_files","input":{"path":"."}}"#;
        let block: ContentBlock = serde_json::from_str(raw).unwrap();
        match &block {
            ContentBlock::ToolUse { id, name, input } => {
                assert_eq!(id, "t1");
                assert_eq!(name, "list_files");
                assert_eq!(input["path"], ".");
            }
            other => panic!("unexpected block: {:?}", other),
        }
    }
}
