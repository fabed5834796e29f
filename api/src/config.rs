//! Configuration loading

use thiserror::Error;

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_mcp_endpoint() -> String {
    "http://localhost:8000/mcp".to_string()
}

const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_MAX_TOOL_ROUNDS: usize = 10;

/// Missing required settings, reported all at once so the operator can fix
/// them in a single pass.
#[derive(Debug, Error)]
#[error("configuration issues: {}", .issues.join(", "))]
pub struct ConfigError {
    pub issues: Vec<String>,
}

/// Application settings sourced from the environment.
///
/// `API_HOST` and `API_PORT` are handled by the CLI layer; everything the
/// query-processing core needs lives here.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API key for the Anthropic Messages API
    pub anthropic_api_key: String,
    /// Model identifier
    pub model_name: String,
    /// Output token budget per model call
    pub max_tokens: u32,
    /// MCP server endpoint URL (streamable HTTP)
    pub mcp_endpoint: String,
    /// Upper bound on model/tool rounds per query
    pub max_tool_rounds: usize,
}

impl Settings {
    /// Read settings from the environment, applying defaults.
    ///
    /// Never fails; call [`Settings::validate`] afterwards to surface
    /// missing required values.
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            model_name: std::env::var("MODEL_NAME").unwrap_or_else(|_| default_model()),
            max_tokens: std::env::var("MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_TOKENS),
            mcp_endpoint: std::env::var("MCP_ENDPOINT")
                .unwrap_or_else(|_| default_mcp_endpoint()),
            max_tool_rounds: std::env::var("MAX_TOOL_ROUNDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_TOOL_ROUNDS),
        }
    }

    /// Validate essential settings. Startup-fatal on error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();

        if self.anthropic_api_key.is_empty() {
            issues.push("ANTHROPIC_API_KEY: missing API key".to_string());
        }
        if self.mcp_endpoint.is_empty() {
            issues.push("MCP_ENDPOINT: missing MCP server endpoint URL".to_string());
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { issues })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(key: &str, endpoint: &str) -> Settings {
        Settings {
            anthropic_api_key: key.to_string(),
            model_name: default_model(),
            max_tokens: DEFAULT_MAX_TOKENS,
            mcp_endpoint: endpoint.to_string(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    #[test]
    fn validate_passes_with_required_values() {
        assert!(settings("sk-test", "http://localhost:8000/mcp")
            .validate()
            .is_ok());
    }

    #[test]
    fn validate_collects_all_missing_values() {
        let err = settings("", "").validate().unwrap_err();
        assert_eq!(err.issues.len(), 2);
        let message = err.to_string();
        assert!(message.contains("ANTHROPIC_API_KEY"));
        assert!(message.contains("MCP_ENDPOINT"));
    }
}
