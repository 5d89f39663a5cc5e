//! Batch device control tool

use crate::client::ControlInstruction;
use crate::tools::{ToolContext, ToolResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Flattened outcome of one control instruction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlOutcome {
    /// Target device identifier
    #[serde(rename = "assetId")]
    pub asset_id: Value,

    /// Attribute code that was controlled
    pub code: Value,

    /// Value the instruction carried
    pub value: Value,

    /// Vendor result code for this instruction
    #[serde(rename = "resultCode")]
    pub result_code: Value,

    /// Vendor result message for this instruction
    #[serde(rename = "resultMessage")]
    pub result_message: Value,
}

/// Flatten the vendor `controlResults` sequence.
///
/// A missing or malformed entry is a hard fault here: the caller issued
/// commands and must not be handed a silently truncated result list.
fn flatten_control_results(data: &Value) -> Result<Vec<ControlOutcome>, String> {
    let results = data
        .get("controlResults")
        .and_then(Value::as_array)
        .ok_or_else(|| "control response missing controlResults".to_string())?;

    let mut outcomes = Vec::with_capacity(results.len());
    for item in results {
        let result_data = item
            .get("resultData")
            .and_then(Value::as_object)
            .ok_or_else(|| "control result missing resultData".to_string())?;
        let result = item
            .get("result")
            .and_then(Value::as_object)
            .ok_or_else(|| "control result missing result".to_string())?;

        let field = |map: &serde_json::Map<String, Value>, key: &str| -> Result<Value, String> {
            map.get(key)
                .cloned()
                .ok_or_else(|| format!("control result missing {key}"))
        };

        outcomes.push(ControlOutcome {
            asset_id: field(result_data, "assetId")?,
            code: field(result_data, "code")?,
            value: field(result_data, "value")?,
            result_code: field(result, "code")?,
            result_message: field(result, "message")?,
        });
    }
    Ok(outcomes)
}

/// Issue a batch of control instructions and report per-instruction results.
pub async fn control_device(
    context: &ToolContext,
    control_instructions: Vec<ControlInstruction>,
) -> ToolResponse {
    let token = match context.access_token().await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let data = match context
        .client
        .batch_control(&token, &control_instructions)
        .await
    {
        Ok(data) => data,
        Err(e) => return ToolResponse::error(format!("Batch control failed: {e}")),
    };

    match flatten_control_results(&data) {
        Ok(outcomes) => ToolResponse::success(json!(outcomes)),
        Err(msg) => ToolResponse::error(format!("Batch control failed: {msg}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_well_formed_results() {
        let data = json!({
            "controlResults": [
                {
                    "resultData": {"assetId": "d1", "code": "switch", "value": "1"},
                    "result": {"code": 200, "message": "ok"}
                },
            ]
        });
        let outcomes = flatten_control_results(&data).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].asset_id, json!("d1"));
        assert_eq!(outcomes[0].result_code, json!(200));
    }

    #[test]
    fn missing_control_results_is_a_fault() {
        let err = flatten_control_results(&json!({})).unwrap_err();
        assert!(err.contains("controlResults"));
    }

    #[test]
    fn malformed_entry_is_a_fault_not_a_drop() {
        let data = json!({
            "controlResults": [
                {"resultData": {"assetId": "d1", "code": "c", "value": "1"}}
            ]
        });
        assert!(flatten_control_results(&data).is_err());
    }
}
