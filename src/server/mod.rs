//! Stdio JSON-RPC transport for the tool surface
//!
//! A deliberately thin MCP-compatible loop: one JSON-RPC 2.0 request per
//! stdin line, one response per stdout line. Supported methods are
//! `initialize`, `ping`, `tools/list` and `tools/call`; notifications are
//! acknowledged silently. Tool faults never escape as transport errors —
//! they come back as error-status tool responses.

use crate::client::ControlInstruction;
use crate::error::Result;
use crate::tools::{self, ToolContext, ToolResponse};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "cec-iot-mcp";

/// JSON-RPC error payload
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn parse_error(message: impl Into<String>) -> Self {
        Self {
            code: -32700,
            message: message.into(),
        }
    }

    fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: -32600,
            message: message.into(),
        }
    }

    fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            code: -32603,
            message: message.into(),
        }
    }
}

fn success_response(id: Value, result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

fn error_response(id: Value, err: RpcError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": err.code, "message": err.message},
    })
}

#[derive(Deserialize)]
struct ListDevicesArgs {
    #[serde(default)]
    area_ids: Vec<String>,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct AreaScopedArgs {
    #[serde(default)]
    area_ids: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AddCameraArgs {
    name: Option<String>,
    sn: Option<String>,
    area_code: Option<String>,
}

#[derive(Deserialize)]
struct AssetModelArgs {
    #[serde(default)]
    brand_model_ids: Vec<String>,
}

#[derive(Deserialize)]
struct ControlArgs {
    #[serde(rename = "controlInstructions", default)]
    control_instructions: Vec<ControlInstruction>,
}

#[derive(Deserialize)]
struct CollectByIdCodesArgs {
    #[serde(default)]
    device_ids: Vec<String>,
    #[serde(default)]
    codes: Vec<String>,
}

/// MCP server dispatching tool calls over stdio
pub struct McpServer {
    context: ToolContext,
}

impl McpServer {
    /// Create a new server around a tool context
    pub fn new(context: ToolContext) -> Self {
        Self { context }
    }

    /// Serve JSON-RPC requests from stdin until EOF
    pub async fn run_stdio(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut lines = stdin.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<Value>(line) {
                Ok(incoming) => self.handle_message(incoming).await,
                Err(e) => Some(error_response(
                    Value::Null,
                    RpcError::parse_error(format!("Invalid JSON: {e}")),
                )),
            };

            if let Some(response) = response {
                let mut payload = serde_json::to_string(&response)?;
                payload.push('\n');
                stdout.write_all(payload.as_bytes()).await?;
                stdout.flush().await?;
            }
        }
        Ok(())
    }

    async fn handle_message(&self, incoming: Value) -> Option<Value> {
        let Some(obj) = incoming.as_object() else {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Request must be a JSON object"),
            ));
        };

        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            let id = obj.get("id").cloned().unwrap_or(Value::Null);
            return Some(error_response(
                id,
                RpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        let Some(method) = obj.get("method").and_then(Value::as_str) else {
            // Most likely a client response; this server issues no requests.
            return None;
        };

        let params = obj.get("params").cloned().unwrap_or(Value::Null);
        if let Some(id) = obj.get("id").cloned() {
            Some(match self.handle_request(method, params).await {
                Ok(payload) => success_response(id, payload),
                Err(err) => error_response(id, err),
            })
        } else {
            if !matches!(
                method,
                "notifications/initialized" | "notifications/cancelled"
            ) {
                warn!("ignoring unknown notification: {method}");
            }
            None
        }
    }

    async fn handle_request(
        &self,
        method: &str,
        params: Value,
    ) -> std::result::Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize_payload()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(tools_list_payload()),
            "tools/call" => self.handle_tools_call(params).await,
            _ => Err(RpcError::method_not_found(method)),
        }
    }

    fn initialize_payload(&self) -> Value {
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": {"listChanged": false},
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    async fn handle_tools_call(&self, params: Value) -> std::result::Result<Value, RpcError> {
        let params = params
            .as_object()
            .ok_or_else(|| RpcError::invalid_params("tools/call params must be an object"))?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("tools/call requires string field 'name'"))?;

        let args = match params.get("arguments") {
            Some(Value::Object(map)) => map.clone(),
            Some(Value::Null) | None => Map::new(),
            Some(_) => {
                return Err(RpcError::invalid_params(
                    "tools/call 'arguments' must be an object",
                ));
            }
        };

        let response = self.dispatch_tool(name, args).await?;
        let text = serde_json::to_string_pretty(&response)
            .map_err(|e| RpcError::internal(format!("Failed to serialize tool response: {e}")))?;
        Ok(json!({
            "content": [{"type": "text", "text": text}],
            "isError": response.is_error(),
        }))
    }

    async fn dispatch_tool(
        &self,
        name: &str,
        args: Map<String, Value>,
    ) -> std::result::Result<ToolResponse, RpcError> {
        let args = Value::Object(args);
        let ctx = &self.context;

        let response = match name {
            "get_area_info" => tools::areas::get_area_info(ctx).await,
            "list_device_base_info" => {
                let args: ListDevicesArgs = parse_args(args)?;
                tools::devices::list_device_base_info(ctx, args.area_ids, args.name).await
            }
            "add_camera" => {
                let args: AddCameraArgs = parse_args(args)?;
                tools::camera::add_camera(ctx, args.name, args.sn, args.area_code).await
            }
            "get_play_url" => {
                let args: AreaScopedArgs = parse_args(args)?;
                tools::camera::get_play_url(ctx, args.area_ids).await
            }
            "get_camera_screenshot" => {
                let args: AreaScopedArgs = parse_args(args)?;
                tools::camera::get_camera_screenshot(ctx, args.area_ids).await
            }
            "get_asset_model" => {
                let args: AssetModelArgs = parse_args(args)?;
                tools::devices::get_asset_model(ctx, args.brand_model_ids).await
            }
            "control_device" => {
                let args: ControlArgs = parse_args(args)?;
                tools::control::control_device(ctx, args.control_instructions).await
            }
            "get_collect_data_by_id_codes" => {
                let args: CollectByIdCodesArgs = parse_args(args)?;
                tools::devices::get_collect_data_by_id_codes(ctx, args.device_ids, args.codes)
                    .await
            }
            "list_labels" => tools::labels::list_labels(ctx).await,
            _ => return Err(RpcError::invalid_params(format!("Unknown tool: {name}"))),
        };
        Ok(response)
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> std::result::Result<T, RpcError> {
    serde_json::from_value(args)
        .map_err(|e| RpcError::invalid_params(format!("Invalid tool arguments: {e}")))
}

fn tools_list_payload() -> Value {
    let string_array = |description: &str| {
        json!({"type": "array", "items": {"type": "string"}, "description": description})
    };
    let area_ids_schema = json!({
        "type": "object",
        "properties": {
            "area_ids": string_array("Area ids resolved via get_area_info"),
        },
        "required": ["area_ids"],
    });

    let tools = json!([
        {
            "name": "get_area_info",
            "description": "List all areas (building/floor/room hierarchy nodes). \
                Parent/child relationships are implicit in the area names.",
            "inputSchema": {"type": "object", "properties": {}},
        },
        {
            "name": "list_device_base_info",
            "description": "List device base info (id, name, serial, area, online state) \
                for the given areas, optionally filtered by device name.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "area_ids": string_array("Area ids resolved via get_area_info"),
                    "name": {"type": "string", "description": "Device name filter"},
                },
            },
        },
        {
            "name": "add_camera",
            "description": "Provision a camera and return its GB/T-28181 streaming \
                configuration. Name, serial and area code are optional.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "sn": {"type": "string"},
                    "area_code": {"type": "string"},
                },
            },
        },
        {
            "name": "get_play_url",
            "description": "Fetch live stream playback URLs (HLS/FLV) for cameras \
                in the given areas.",
            "inputSchema": area_ids_schema,
        },
        {
            "name": "get_camera_screenshot",
            "description": "Fetch current screenshot URLs for cameras in the given areas.",
            "inputSchema": area_ids_schema,
        },
        {
            "name": "get_asset_model",
            "description": "Fetch asset model attribute metadata (codes, aliases, valid \
                enum values) for the given brand/model ids.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "brand_model_ids": string_array("Brand/model ids from list_device_base_info"),
                },
                "required": ["brand_model_ids"],
            },
        },
        {
            "name": "control_device",
            "description": "Batch-control devices. Each instruction is \
                {assetId, code, value}; codes and values come from get_asset_model.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "controlInstructions": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "assetId": {"type": "string"},
                                "code": {"type": "string"},
                                "value": {},
                            },
                            "required": ["assetId", "code", "value"],
                        },
                    },
                },
                "required": ["controlInstructions"],
            },
        },
        {
            "name": "get_collect_data_by_id_codes",
            "description": "Batch-read collect data (telemetry) for the given device ids \
                and attribute codes.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "device_ids": string_array("Device ids from list_device_base_info"),
                    "codes": string_array("Attribute codes from get_asset_model"),
                },
                "required": ["device_ids", "codes"],
            },
        },
        {
            "name": "list_labels",
            "description": "List the device labels configured on the platform.",
            "inputSchema": {"type": "object", "properties": {}},
        },
    ]);
    json!({"tools": tools})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tools_list_names_are_complete() {
        let payload = tools_list_payload();
        let names: Vec<&str> = payload["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|tool| tool["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "get_area_info",
                "list_device_base_info",
                "add_camera",
                "get_play_url",
                "get_camera_screenshot",
                "get_asset_model",
                "control_device",
                "get_collect_data_by_id_codes",
                "list_labels",
            ]
        );
    }

    #[test]
    fn every_tool_declares_an_input_schema() {
        let payload = tools_list_payload();
        for tool in payload["tools"].as_array().unwrap() {
            assert_eq!(tool["inputSchema"]["type"], "object", "{}", tool["name"]);
        }
    }
}
