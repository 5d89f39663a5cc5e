//! Area hierarchy tools

use crate::tools::{ToolContext, ToolResponse};
use serde_json::json;

/// List all areas of the organization.
///
/// Hierarchy relationships are implicit in the area names ("19F" vs
/// "19F-Room1"); callers are expected to derive parent/child structure from
/// the naming convention.
pub async fn get_area_info(context: &ToolContext) -> ToolResponse {
    let token = match context.access_token().await {
        Ok(token) => token,
        Err(response) => return response,
    };

    match context.client.list_areas(&token).await {
        Some(areas) => ToolResponse::success(json!(areas)),
        None => ToolResponse::error("Failed to fetch area list".to_string()),
    }
}
