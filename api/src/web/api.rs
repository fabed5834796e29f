//! REST API handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use super::state::AppState;
use crate::client::{QueryOutcome, ToolsOutcome};

/// Error response, always carrying the `status: "error"` marker
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
}

impl ErrorResponse {
    fn new(msg: impl Into<String>) -> Self {
        Self {
            status: "error",
            error: msg.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "mcp-client-api",
    })
}

/// Service info served at the root
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "MCP Client API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}

fn extract_prompt(body: &Value) -> Option<&str> {
    body.get("prompt").and_then(Value::as_str)
}

/// Process a chat message.
///
/// Expected JSON body: `{"prompt": "User message here"}`
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<QueryOutcome>), (StatusCode, Json<ErrorResponse>)> {
    let Json(body) = payload.map_err(|rejection| {
        let status = match &rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(ErrorResponse::new(rejection.to_string())))
    })?;

    let Some(prompt) = extract_prompt(&body) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing fields in request body: prompt")),
        ));
    };

    tracing::info!("processing chat request");
    let outcome = state.client.process_query(prompt).await;
    let status = match &outcome {
        QueryOutcome::Success { .. } => StatusCode::OK,
        QueryOutcome::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    Ok((status, Json(outcome)))
}

/// List the tools available on the MCP server
pub async fn list_tools(State(state): State<AppState>) -> (StatusCode, Json<ToolsOutcome>) {
    let outcome = state.client.list_tools().await;
    let status = match &outcome {
        ToolsOutcome::Success { .. } => StatusCode::OK,
        ToolsOutcome::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(outcome))
}

/// Fallback for unknown routes
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Resource not found")),
    )
}

/// Fallback for known routes hit with the wrong method
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_response_shape() {
        let value = serde_json::to_value(ErrorResponse::new("Resource not found")).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "Resource not found");
    }

    #[test]
    fn health_response_shape() {
        let value = serde_json::to_value(HealthResponse {
            status: "ok",
            service: "mcp-client-api",
        })
        .unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["service"], "mcp-client-api");
    }

    #[test]
    fn prompt_extraction_requires_a_string_field() {
        assert_eq!(
            extract_prompt(&json!({"prompt": "List files"})),
            Some("List files")
        );
        assert_eq!(extract_prompt(&json!({"message": "wrong key"})), None);
        assert_eq!(extract_prompt(&json!({"prompt": 42})), None);
        assert_eq!(extract_prompt(&json!({})), None);
    }
}
