//! Anthropic Messages API gateway

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mcp::ToolDescriptor;

use super::{ChatMessage, ContentBlock, GatewayError, ModelGateway};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Request body for `POST /v1/messages`
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    tools: &'a [ToolDescriptor],
}

/// Response body. Content blocks are kept loose here so unknown block
/// types (thinking, future additions) are skipped instead of failing the
/// whole completion.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<WireBlock>,
}

#[derive(Debug, Deserialize)]
struct WireBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
    id: Option<String>,
    name: Option<String>,
    input: Option<Value>,
}

fn into_content_block(block: WireBlock) -> Option<ContentBlock> {
    match block.kind.as_str() {
        "text" => Some(ContentBlock::Text { text: block.text? }),
        "tool_use" => Some(ContentBlock::ToolUse {
            id: block.id?,
            name: block.name?,
            input: block.input?,
        }),
        _ => None,
    }
}

/// Gateway to the Anthropic Messages API
pub struct AnthropicGateway {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicGateway {
    pub fn new(api_key: &str, model: &str, max_tokens: u32) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.to_string(),
            max_tokens,
        }
    }

    /// Point the gateway at a different API host
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ModelGateway for AnthropicGateway {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDescriptor],
    ) -> Result<Vec<ContentBlock>, GatewayError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages,
            tools,
        };

        let url = format!("{}/v1/messages", self.base_url);
        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "sending completion request"
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let data: MessagesResponse = response.json().await?;
        Ok(data
            .content
            .into_iter()
            .filter_map(into_content_block)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn request_body_carries_messages_and_tools() {
        let messages = vec![ChatMessage::user_text("What's 2+2?")];
        let tools = vec![ToolDescriptor {
            name: "calculator".to_string(),
            description: "Evaluate arithmetic".to_string(),
            input_schema: serde_json::json!({"type": "object", "properties": {}}),
        }];
        let request = MessagesRequest {
            model: "claude-3-5-sonnet-20241022",
            max_tokens: 1000,
            messages: &messages,
            tools: &tools,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "claude-3-5-sonnet-20241022");
        assert_eq!(value["max_tokens"], 1000);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"][0]["type"], "text");
        assert_eq!(value["tools"][0]["name"], "calculator");
        assert_eq!(value["tools"][0]["input_schema"]["type"], "object");
    }

    #[test]
    fn empty_tool_catalog_is_omitted() {
        let messages = vec![ChatMessage::user_text("hi")];
        let request = MessagesRequest {
            model: "m",
            max_tokens: 100,
            messages: &messages,
            tools: &[],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn response_parsing_keeps_text_and_tool_use_in_order() {
        let raw = r#"{
            "content": [
                {"type": "text", "text": "Let me check."},
                {"type": "thinking", "thinking": "hmm"},
                {"type": "tool_use", "id": "t1", "name": "list_files", "input": {}}
            ],
            "stop_reason": "tool_use"
        }"#;

        let data: MessagesResponse = serde_json::from_str(raw).unwrap();
        let blocks: Vec<ContentBlock> = data
            .content
            .into_iter()
            .filter_map(into_content_block)
            .collect();

        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            ContentBlock::Text {
                text: "Let me check.".to_string()
            }
        );
        match &blocks[1] {
            ContentBlock::ToolUse { id, name, .. } => {
                assert_eq!(id, "t1");
                assert_eq!(name, "list_files");
            }
            other => panic!("unexpected block: {:?}", other),
        }
    }

    #[test]
    fn assistant_turn_serializes_interleaved_blocks() {
        let msg = ChatMessage {
            role: Role::Assistant,
            content: vec![
                ContentBlock::Text {
                    text: "Checking".to_string(),
                },
                ContentBlock::ToolUse {
                    id: "t1".to_string(),
                    name: "list_files".to_string(),
                    input: serde_json::json!({}),
                },
            ],
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][1]["type"], "tool_use");
        assert_eq!(value["content"][1]["id"], "t1");
    }
}
