//! Shared application state

use std::sync::Arc;

use crate::client::McpClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The process-wide client facade
    pub client: Arc<McpClient>,
}

impl AppState {
    pub fn new(client: Arc<McpClient>) -> Self {
        Self { client }
    }
}
