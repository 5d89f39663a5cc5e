//! Device inventory, asset model and telemetry tools

use crate::tools::{ToolContext, ToolResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Online/offline status of a device as reported by the vendor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Unregistered,
    Unknown,
}

impl From<&str> for DeviceStatus {
    fn from(code: &str) -> Self {
        match code {
            "0" => DeviceStatus::Online,
            "1" | "-1" => DeviceStatus::Offline,
            "-2" => DeviceStatus::Unregistered,
            _ => DeviceStatus::Unknown,
        }
    }
}

impl DeviceStatus {
    /// Human-readable label for the status
    pub fn label(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Unregistered => "unregistered",
            DeviceStatus::Unknown => "unknown",
        }
    }
}

/// Device record enriched with a human-readable status label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSummary {
    /// Device identifier
    pub id: String,

    /// Device name
    pub name: String,

    /// Brand/model identifier
    #[serde(rename = "brandModelId")]
    pub brand_model_id: String,

    /// Serial number
    pub sn: String,

    /// Identifier of the area the device belongs to
    #[serde(rename = "areaId")]
    pub area_id: String,

    /// Name of the area the device belongs to
    #[serde(rename = "areaName")]
    pub area_name: String,

    /// Raw vendor status code
    pub status: String,

    /// Human-readable status label
    #[serde(rename = "statusName")]
    pub status_name: String,
}

/// Reshape raw vendor device records into enriched summaries.
///
/// Entries missing any of `id`, `name` or `status` are dropped outright; the
/// remaining fields default to the empty string when absent.
pub(crate) fn summarize_devices(raw: &Value) -> Vec<DeviceSummary> {
    let Some(list) = raw.as_array() else {
        return Vec::new();
    };

    list.iter()
        .filter_map(Value::as_object)
        .filter(|device| {
            ["id", "name", "status"]
                .iter()
                .all(|key| device.contains_key(*key))
        })
        .map(|device| {
            let status = text(device.get("status"));
            let status_name = DeviceStatus::from(status.as_str()).label().to_string();
            DeviceSummary {
                id: text(device.get("id")),
                name: text(device.get("name")),
                brand_model_id: text(device.get("brandModelId")),
                sn: text(device.get("sn")),
                area_id: text(device.get("areaId")),
                area_name: text(device.get("areaName")),
                status,
                status_name,
            }
        })
        .collect()
}

fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Fetch enriched device summaries for the given areas and name filter.
///
/// Shared between the inventory tool and the camera flows, which resolve
/// camera devices by name before batch-reading their collect data.
pub(crate) async fn fetch_device_summaries(
    context: &ToolContext,
    token: &str,
    area_ids: &[String],
    name: &str,
) -> Option<Vec<DeviceSummary>> {
    let raw = context.client.list_devices(token, area_ids, name).await?;
    Some(summarize_devices(&raw))
}

/// List device base info (id, name, serial, area, online state) for the
/// given areas, optionally filtered by device name.
pub async fn list_device_base_info(
    context: &ToolContext,
    area_ids: Vec<String>,
    name: String,
) -> ToolResponse {
    let token = match context.access_token().await {
        Ok(token) => token,
        Err(response) => return response,
    };

    match fetch_device_summaries(context, &token, &area_ids, &name).await {
        Some(devices) => ToolResponse::success(json!(devices)),
        None => ToolResponse::error("Failed to fetch device list".to_string()),
    }
}

/// Fetch asset model attribute metadata for the given brand/model ids.
///
/// The returned `choseEnums` pairs are the valid discrete values callers use
/// to assemble control instructions.
pub async fn get_asset_model(context: &ToolContext, brand_model_ids: Vec<String>) -> ToolResponse {
    let token = match context.access_token().await {
        Ok(token) => token,
        Err(response) => return response,
    };

    match context
        .client
        .get_asset_model_attributes(&token, &brand_model_ids)
        .await
    {
        Ok(attributes) => ToolResponse::success(json!(attributes)),
        Err(e) => ToolResponse::error(format!("Failed to fetch asset model attributes: {e}")),
    }
}

/// Batch-read collect data for a uniform code list across many devices.
pub async fn get_collect_data_by_id_codes(
    context: &ToolContext,
    device_ids: Vec<String>,
    codes: Vec<String>,
) -> ToolResponse {
    if device_ids.is_empty() || codes.is_empty() {
        return ToolResponse::success(Value::Null);
    }

    let device_id_codes: HashMap<String, Vec<String>> = device_ids
        .into_iter()
        .map(|device_id| (device_id, codes.clone()))
        .collect();

    let token = match context.access_token().await {
        Ok(token) => token,
        Err(response) => return response,
    };

    match context.client.get_collect_data(&token, &device_id_codes).await {
        Some(points) => ToolResponse::success(json!(points)),
        None => ToolResponse::success(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_are_exhaustive() {
        assert_eq!(DeviceStatus::from("0").label(), "online");
        assert_eq!(DeviceStatus::from("1").label(), "offline");
        assert_eq!(DeviceStatus::from("-1").label(), "offline");
        assert_eq!(DeviceStatus::from("-2").label(), "unregistered");
        assert_eq!(DeviceStatus::from("7").label(), "unknown");
        assert_eq!(DeviceStatus::from("").label(), "unknown");
    }

    #[test]
    fn summarize_drops_partial_records() {
        let raw = json!([
            {"id": "d1", "name": "AC 19F", "status": "0", "sn": "SN1",
             "brandModelId": "bm1", "areaId": "a1", "areaName": "19F"},
            {"id": "d2", "name": "no status"},
            {"name": "no id", "status": "1"},
            "not-an-object",
        ]);
        let summaries = summarize_devices(&raw);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, "d1");
        assert_eq!(summaries[0].status_name, "online");
    }

    #[test]
    fn summarize_defaults_optional_fields() {
        let raw = json!([{"id": "d1", "name": "n", "status": "-2"}]);
        let summaries = summarize_devices(&raw);
        assert_eq!(summaries[0].sn, "");
        assert_eq!(summaries[0].area_name, "");
        assert_eq!(summaries[0].status_name, "unregistered");
    }

    #[test]
    fn summarize_tolerates_non_list_payload() {
        assert!(summarize_devices(&json!({"not": "a list"})).is_empty());
        assert!(summarize_devices(&json!(null)).is_empty());
    }
}
