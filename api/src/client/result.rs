//! Aggregated query output and the caller-facing outcome shapes

use serde::Serialize;
use serde_json::Value;

use crate::mcp::ToolDescriptor;

/// Outcome of a single tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Success,
    Error,
}

/// A tool invocation the model requested, recorded verbatim
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallRecord {
    pub id: String,
    pub name: String,
    pub args: Value,
}

/// The result of executing one requested tool invocation
#[derive(Debug, Clone, Serialize)]
pub struct ToolResultRecord {
    pub tool_use_id: String,
    pub name: String,
    pub args: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: CallStatus,
}

impl ToolResultRecord {
    pub fn success(tool_use_id: &str, name: &str, args: Value, result: String) -> Self {
        Self {
            tool_use_id: tool_use_id.to_string(),
            name: name.to_string(),
            args,
            result: Some(result),
            error: None,
            status: CallStatus::Success,
        }
    }

    pub fn error(tool_use_id: &str, name: &str, args: Value, error: String) -> Self {
        Self {
            tool_use_id: tool_use_id.to_string(),
            name: name.to_string(),
            args,
            result: None,
            error: Some(error),
            status: CallStatus::Error,
        }
    }
}

/// Aggregated output of one full query-processing loop
#[derive(Debug, Default, Serialize)]
pub struct QueryResult {
    /// Trimmed, non-empty text segments in emission order
    pub text: Vec<String>,
    /// Every tool invocation the model requested, in request order
    pub tool_calls: Vec<ToolCallRecord>,
    /// Execution outcomes, in invocation order
    pub tool_results: Vec<ToolResultRecord>,
}

/// Caller-facing result of `process_query`. Errors are data, not panics or
/// propagated exceptions.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QueryOutcome {
    Success { data: QueryResult },
    Error { error: String },
}

/// Caller-facing result of `list_tools`
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolsOutcome {
    Success { tools: Vec<ToolDescriptor> },
    Error { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_record_omits_error_field() {
        let record = ToolResultRecord::success(
            "t1",
            "list_files",
            serde_json::json!({}),
            "[a.txt, b.txt]".to_string(),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["result"], "[a.txt, b.txt]");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn error_record_omits_result_field() {
        let record = ToolResultRecord::error(
            "t1",
            "list_files",
            serde_json::json!({}),
            "no such directory".to_string(),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "no such directory");
        assert!(value.get("result").is_none());
    }

    #[test]
    fn outcomes_are_tagged_by_status() {
        let ok = QueryOutcome::Success {
            data: QueryResult::default(),
        };
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value["status"], "success");
        assert!(value["data"]["text"].as_array().unwrap().is_empty());

        let err = QueryOutcome::Error {
            error: "connection failed: refused".to_string(),
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "connection failed: refused");
    }
}
