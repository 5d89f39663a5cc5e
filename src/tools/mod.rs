//! MCP tool implementations for CEC device monitoring, control and camera
//! provisioning.
//!
//! Every tool re-authenticates at the start of its invocation (no token is
//! cached across calls) and converts flow-level faults into an error
//! response; nothing here panics or terminates the serving process.

pub mod areas;
pub mod camera;
pub mod control;
pub mod devices;
pub mod labels;

use crate::client::CecClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Standard tool response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Status of the operation
    pub status: String,

    /// Response data
    pub data: serde_json::Value,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ToolResponse {
    /// Create successful response
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            status: "success".to_string(),
            data,
            message: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create successful response with message
    pub fn success_with_message(data: serde_json::Value, message: String) -> Self {
        Self {
            status: "success".to_string(),
            data,
            message: Some(message),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create error response
    pub fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            data: serde_json::Value::Null,
            message: Some(message),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Whether this response carries an error
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

/// Shared tool context
#[derive(Clone)]
pub struct ToolContext {
    /// CEC client for API calls
    pub client: Arc<CecClient>,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(client: Arc<CecClient>) -> Self {
        Self { client }
    }

    /// Acquire a fresh access token for this invocation
    pub(crate) async fn access_token(&self) -> Result<String, ToolResponse> {
        self.client
            .get_access_token()
            .await
            .ok_or_else(|| ToolResponse::error("Failed to obtain access token".to_string()))
    }
}
