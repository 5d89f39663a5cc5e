//! Camera provisioning and stream retrieval tools
//!
//! Cameras are regular assets pinned to the generic GB/T-28181 brand/model
//! and parented to the media gateway. Provisioning creates the asset, then
//! reads back its `mediaConfig` collect-data point, whose value embeds the
//! streaming-protocol configuration the operator needs to enter into the
//! camera management backend.

use crate::client::LinkAttribute;
use crate::config::{
    CAMERA_BRAND_MODEL_ID, CAMERA_PLAY_CODES, CAMERA_SCREENSHOT_CODES, MEDIA_GATEWAY_ID,
    MEDIA_TRANSPORT_PROFILE,
};
use crate::error::{CecError, Result};
use crate::tools::devices::fetch_device_summaries;
use crate::tools::{ToolContext, ToolResponse};
use rand::rngs::OsRng;
use rand::Rng;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Name filter matching camera devices in the inventory
const CAMERA_DEVICE_NAME: &str = "camera";

/// Attribute code carrying the media configuration of a camera
const MEDIA_CONFIG_CODE: &str = "mediaConfig";

const SERIAL_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SERIAL_LEN: usize = 12;

/// Generate a random uppercase-alphanumeric serial number.
///
/// Serial numbers must be unique within the platform, so draw from the OS
/// random source rather than a seeded generator.
pub(crate) fn generate_serial() -> String {
    (0..SERIAL_LEN)
        .map(|_| SERIAL_CHARSET[OsRng.gen_range(0..SERIAL_CHARSET.len())] as char)
        .collect()
}

/// Outcome of the camera provisioning flow
enum ProvisionOutcome {
    /// Streaming-protocol configuration extracted from `mediaConfig`
    StreamingConfig(Value),

    /// Creation yielded no device id; the raw response is surfaced verbatim
    RawCreateResponse(Value),

    /// The readback of `mediaConfig` returned nothing
    Missing,
}

async fn provision_camera(
    context: &ToolContext,
    token: &str,
    name: Option<String>,
    sn: Option<String>,
    area_code: Option<String>,
) -> Result<ProvisionOutcome> {
    let sn = match sn.filter(|s| !s.is_empty()) {
        Some(sn) => sn,
        None => generate_serial(),
    };
    let name = match name.filter(|n| !n.is_empty()) {
        Some(name) => name,
        None => format!("{CAMERA_DEVICE_NAME}-{sn}"),
    };
    let link_attr = [LinkAttribute {
        attribute_code: MEDIA_CONFIG_CODE.to_string(),
        value: MEDIA_TRANSPORT_PROFILE.to_string(),
    }];

    let create_response = context
        .client
        .add_device(
            token,
            &name,
            &sn,
            CAMERA_BRAND_MODEL_ID,
            area_code.as_deref().unwrap_or(""),
            MEDIA_GATEWAY_ID,
            &link_attr,
        )
        .await
        .ok_or_else(|| CecError::invalid_response("device creation returned no response"))?;

    let device_id = match create_response.get("data").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Ok(ProvisionOutcome::RawCreateResponse(create_response)),
    };

    let Some(media_config) = context
        .client
        .get_one_collect_datum(token, &device_id, MEDIA_CONFIG_CODE)
        .await
    else {
        return Ok(ProvisionOutcome::Missing);
    };

    // The collect-data value is itself a JSON document; a parse failure here
    // is a flow-level fault, not something to paper over.
    let value = media_config
        .get("value")
        .and_then(Value::as_str)
        .ok_or_else(|| CecError::invalid_response("mediaConfig collect data has no value"))?;
    let parsed: Value = serde_json::from_str(value)?;
    let ext_data = parsed.get("extData").cloned().unwrap_or(Value::Null);
    Ok(ProvisionOutcome::StreamingConfig(ext_data))
}

/// Provision a camera and return its GB/T-28181 streaming configuration.
///
/// Name, serial number and area code are all optional: the serial defaults
/// to a random 12-character string and the name to `camera-<serial>`.
pub async fn add_camera(
    context: &ToolContext,
    name: Option<String>,
    sn: Option<String>,
    area_code: Option<String>,
) -> ToolResponse {
    let token = match context.access_token().await {
        Ok(token) => token,
        Err(response) => return response,
    };

    match provision_camera(context, &token, name, sn, area_code).await {
        Ok(ProvisionOutcome::StreamingConfig(config)) => ToolResponse::success(config),
        Ok(ProvisionOutcome::RawCreateResponse(raw)) => ToolResponse::success_with_message(
            raw,
            "Device creation returned no device id; raw response attached".to_string(),
        ),
        Ok(ProvisionOutcome::Missing) => ToolResponse::success(Value::Null),
        Err(e) => ToolResponse::error(format!("Error occurred: {e}")),
    }
}

/// Resolve the ids of camera devices in the given areas
async fn camera_device_ids(
    context: &ToolContext,
    token: &str,
    area_ids: &[String],
) -> Option<Vec<String>> {
    let summaries =
        fetch_device_summaries(context, token, area_ids, CAMERA_DEVICE_NAME).await?;
    Some(summaries.into_iter().map(|device| device.id).collect())
}

fn codes_for(device_ids: Vec<String>, codes: &[&str]) -> HashMap<String, Vec<String>> {
    let codes: Vec<String> = codes.iter().map(|code| code.to_string()).collect();
    device_ids
        .into_iter()
        .map(|device_id| (device_id, codes.clone()))
        .collect()
}

/// Fetch live stream playback URLs (HLS/RTMP-family) for cameras in the
/// given areas.
pub async fn get_play_url(context: &ToolContext, area_ids: Vec<String>) -> ToolResponse {
    let token = match context.access_token().await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let Some(device_ids) = camera_device_ids(context, &token, &area_ids).await else {
        return ToolResponse::error("Failed to resolve camera devices".to_string());
    };

    let device_id_codes = codes_for(device_ids, CAMERA_PLAY_CODES);
    match context.client.get_collect_data(&token, &device_id_codes).await {
        Some(points) => ToolResponse::success(json!(points)),
        None => ToolResponse::success(Value::Null),
    }
}

/// Fetch current screenshot URLs for cameras in the given areas.
///
/// Devices whose screenshot value is empty (camera never captured yet) are
/// excluded from the result; the remaining relative paths are prefixed with
/// the platform base domain.
pub async fn get_camera_screenshot(context: &ToolContext, area_ids: Vec<String>) -> ToolResponse {
    let token = match context.access_token().await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let Some(device_ids) = camera_device_ids(context, &token, &area_ids).await else {
        return ToolResponse::error("Failed to resolve camera devices".to_string());
    };

    let device_id_codes = codes_for(device_ids, CAMERA_SCREENSHOT_CODES);
    let Some(points) = context.client.get_collect_data(&token, &device_id_codes).await else {
        return ToolResponse::error("Failed to fetch camera screenshots".to_string());
    };

    let base = context.client.config().base_url.as_str();
    let screenshots: Vec<Value> = points
        .iter()
        .filter(|point| !point.value.is_empty())
        .map(|point| {
            json!({
                "id": point.id,
                "url": format!("{base}{value}", value = point.value),
            })
        })
        .collect();
    ToolResponse::success(json!(screenshots))
}
