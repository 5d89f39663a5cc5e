//! Device label tools

use crate::tools::{ToolContext, ToolResponse};

/// List the device labels configured on the platform, raw passthrough.
pub async fn list_labels(context: &ToolContext) -> ToolResponse {
    let token = match context.access_token().await {
        Ok(token) => token,
        Err(response) => return response,
    };

    match context.client.list_labels(&token).await {
        Some(labels) => ToolResponse::success(labels),
        None => ToolResponse::error("Failed to fetch label list".to_string()),
    }
}
