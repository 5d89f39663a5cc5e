//! Client for the CEC cloud API: HTTP plumbing plus one operation per
//! vendor endpoint (areas, devices, telemetry, asset models, control,
//! provisioning). Each operation performs exactly one HTTP call and
//! defensively reshapes the loosely structured vendor JSON into the small
//! record shapes the tool layer consumes. Malformed entries are dropped,
//! never defaulted into the result set.

pub mod http_client;

pub use http_client::CecHttpClient;

use crate::config::{CecConfig, CecCredentials, CONTROL_SOURCE};
use crate::error::{CecError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

const AREA_LIST_PATH: &str = "cec-saas-ac-platform/V2_7_0/areaApi/list";
const ASSET_CREATE_PATH: &str = "cec-saas-ac-platform/V2_5_0/assetApi";
const ASSET_LIST_PATH: &str = "cec-saas-ac-platform/V2_5_0/assetApi/list";
const COLLECT_DATA_PATH: &str = "cec-saas-ac-platform/V3_4_1/assetApi/listCollectData";
const COLLECT_DATA_BATCH_PATH: &str = "cec-saas-ac-platform/V3_4_1/assetApi/listCollectDataIdCodes";
const ASSET_MODEL_ATTR_PATH: &str = "cec-saas-ac-platform/V3_4_1/assetModelApi/pageAssetModelAttribute";
const BATCH_CONTROL_PATH: &str = "cec-saas-ac-platform/V2_5_0/assetApi/batchControl";
const MEDIA_GBT28181_PATH: &str = "cec-saas-ac-platform/V2_7_0/assetApi/getMediaGBT28181Config";
const LABEL_LIST_PATH: &str = "cec-saas-ac-platform/V3_1_0/labelApi/labelList";

/// A node in the organizational/location hierarchy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Area {
    /// Area identifier, empty string when the vendor omits it
    pub id: String,

    /// Display name, e.g. "19F" or "19F-Room1"
    #[serde(rename = "areaName")]
    pub area_name: String,

    /// Area code used when assigning devices
    pub code: String,
}

/// One telemetry reading for one device attribute.
///
/// The value is always text, whatever JSON type the vendor sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectDataPoint {
    /// Device (asset) identifier
    pub id: String,

    /// Attribute code
    pub code: String,

    /// Reading, coerced to text
    pub value: String,
}

/// Metadata describing one readable/controllable attribute of a brand/model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetModelAttribute {
    /// Brand/model identifier the attribute belongs to
    #[serde(rename = "brandModelId")]
    pub brand_model_id: String,

    /// Attribute code
    pub code: String,

    /// Human-readable alias
    pub alias: String,

    /// Valid discrete values as `{enumCode, enumName}` pairs, carried through
    /// structurally unmodified because consumers need them verbatim to build
    /// control instructions
    #[serde(rename = "choseEnums")]
    pub chose_enums: Value,
}

/// A command directing one device attribute to a target value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlInstruction {
    /// Target device identifier
    #[serde(rename = "assetId")]
    pub asset_id: String,

    /// Attribute code to control
    pub code: String,

    /// Target value, forwarded verbatim
    pub value: Value,
}

/// Attributes linked onto a device at creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkAttribute {
    /// Attribute code
    #[serde(rename = "attributeCode")]
    pub attribute_code: String,

    /// Attribute value
    pub value: String,
}

/// Client for the CEC cloud API.
///
/// Stateless apart from the underlying connection pool: nothing is cached
/// between calls, and every tool invocation re-acquires its own token.
pub struct CecClient {
    http: CecHttpClient,
    config: Arc<CecConfig>,
    credentials: CecCredentials,
}

impl CecClient {
    /// Create a new client
    pub fn new(config: Arc<CecConfig>, credentials: CecCredentials) -> Result<Self> {
        let http = CecHttpClient::new(&config)?;
        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    /// Access the shared configuration
    pub fn config(&self) -> &CecConfig {
        &self.config
    }

    /// Exchange the app key/secret for an access token.
    ///
    /// Success requires a response whose `success` field is truthy; the token
    /// lives at `data.access_token`. Failures log the nested vendor message
    /// when present and yield `None`.
    pub async fn get_access_token(&self) -> Option<String> {
        let params = HashMap::from([
            ("appKey".to_string(), self.credentials.app_key.clone()),
            ("appSecret".to_string(), self.credentials.app_secret.clone()),
        ]);

        let response = self
            .http
            .request(&self.config.auth_path, Method::GET, Some(params), None, None)
            .await;

        let Some(response) = response else {
            error!("Failed to obtain access token: empty response");
            return None;
        };

        if !response.get("success").map(is_truthy).unwrap_or(false) {
            let msg = response
                .pointer("/message/message")
                .and_then(Value::as_str)
                .unwrap_or("no error message in response");
            error!("Failed to obtain access token: {msg}");
            return None;
        }

        response
            .pointer("/data/access_token")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// List all areas.
    ///
    /// Entries lacking both a code and a name are dropped; a missing id alone
    /// never disqualifies an entry and defaults to the empty string. Any
    /// malformed payload shape is swallowed and logged, yielding `None`.
    pub async fn list_areas(&self, access_token: &str) -> Option<Vec<Area>> {
        let body = json!({"data": {"fillName": "true"}});
        let response = self
            .http
            .request(AREA_LIST_PATH, Method::POST, None, Some(body), Some(access_token))
            .await?;

        let raw = match response.get("data").and_then(Value::as_array) {
            Some(raw) => raw,
            None => {
                error!("Failed to list areas: response data is not a list");
                return None;
            }
        };
        if raw.is_empty() {
            return None;
        }

        let areas = raw
            .iter()
            .filter_map(Value::as_object)
            .filter(|area| area.contains_key("code") && area.contains_key("areaName"))
            .map(|area| Area {
                id: text_field(area.get("id")),
                area_name: text_field(area.get("areaName")),
                code: text_field(area.get("code")),
            })
            .collect();
        Some(areas)
    }

    /// List devices in the given areas, optionally filtered by name.
    ///
    /// The raw vendor records under `data` pass through unreshaped; status
    /// enrichment happens in the tool layer.
    pub async fn list_devices(
        &self,
        access_token: &str,
        area_ids: &[String],
        name: &str,
    ) -> Option<Value> {
        let body = json!({
            "data": {
                "name": name,
                "areaIds": area_ids,
                "needStatus": "true",
                "needDeviceInfo": "false",
            }
        });
        let response = self
            .http
            .request(ASSET_LIST_PATH, Method::POST, None, Some(body), Some(access_token))
            .await?;
        response.get("data").cloned()
    }

    /// Read one collect-data point for one device attribute.
    ///
    /// Returns the first raw entry of `data.collectDataList`; a malformed
    /// intermediate shape yields `None` rather than a fault.
    pub async fn get_one_collect_datum(
        &self,
        access_token: &str,
        device_id: &str,
        code: &str,
    ) -> Option<Value> {
        let body = json!({
            "data": {
                "assetId": device_id,
                "codes": [code],
            }
        });
        let response = self
            .http
            .request(COLLECT_DATA_PATH, Method::POST, None, Some(body), Some(access_token))
            .await?;

        response
            .get("data")?
            .as_object()?
            .get("collectDataList")?
            .as_array()?
            .first()
            .cloned()
    }

    /// Batch-read collect data, with a per-device code list.
    ///
    /// This is the only batching mechanism in the system: one vendor call
    /// covers heterogeneous per-device code sets. Non-object entries are
    /// dropped silently; every field of the surviving entries is coerced to
    /// text. An empty result is reported as `None`, never as an empty list.
    pub async fn get_collect_data(
        &self,
        access_token: &str,
        device_id_codes: &HashMap<String, Vec<String>>,
    ) -> Option<Vec<CollectDataPoint>> {
        let body = json!({
            "data": {
                "assetIdCodes": device_id_codes,
            }
        });
        let response = self
            .http
            .request(
                COLLECT_DATA_BATCH_PATH,
                Method::POST,
                None,
                Some(body),
                Some(access_token),
            )
            .await?;

        let list = response
            .get("data")?
            .as_object()?
            .get("collectDataList")?
            .as_array()?;

        let points: Vec<CollectDataPoint> = list
            .iter()
            .filter_map(Value::as_object)
            .map(|item| CollectDataPoint {
                id: text_field(item.get("id")),
                code: text_field(item.get("code")),
                value: text_field(item.get("value")),
            })
            .collect();

        if points.is_empty() {
            None
        } else {
            Some(points)
        }
    }

    /// Create a device, returning the raw vendor response.
    ///
    /// The caller extracts `data` as the new device id; anything else in the
    /// response is surfaced verbatim.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_device(
        &self,
        access_token: &str,
        name: &str,
        sn: &str,
        brand_model_id: &str,
        area_code: &str,
        parent_id: &str,
        attributes: &[LinkAttribute],
    ) -> Option<Value> {
        let body = json!({
            "data": {
                "name": name,
                "sn": sn,
                "brandModelId": brand_model_id,
                "areaCode": area_code,
                "parentId": parent_id,
                "attributes": attributes,
            }
        });
        self.http
            .request(ASSET_CREATE_PATH, Method::POST, None, Some(body), Some(access_token))
            .await
    }

    /// Fetch attribute metadata for the given brand/model ids.
    ///
    /// Unlike the telemetry reads, a missing or malformed envelope here is a
    /// hard fault: callers need the attribute table to build control
    /// instructions and cannot proceed without it.
    pub async fn get_asset_model_attributes(
        &self,
        access_token: &str,
        brand_model_ids: &[String],
    ) -> Result<Vec<AssetModelAttribute>> {
        let body = json!({
            "data": {
                "brandModelIds": brand_model_ids,
            }
        });
        let response = self
            .http
            .request(
                ASSET_MODEL_ATTR_PATH,
                Method::POST,
                None,
                Some(body),
                Some(access_token),
            )
            .await
            .ok_or_else(|| CecError::invalid_response("asset model request returned no response"))?;

        let records = response
            .pointer("/data/records")
            .and_then(Value::as_array)
            .ok_or_else(|| CecError::invalid_response("asset model response missing data.records"))?;

        let mut attributes = Vec::with_capacity(records.len());
        for record in records {
            let attr = record.as_object().ok_or_else(|| {
                CecError::invalid_response("asset model record is not an object")
            })?;
            attributes.push(AssetModelAttribute {
                brand_model_id: text_field(attr.get("brandModelId")),
                code: text_field(attr.get("code")),
                alias: text_field(attr.get("alias")),
                chose_enums: attr.get("choseEnums").cloned().unwrap_or(Value::Null),
            });
        }
        Ok(attributes)
    }

    /// Issue a batch of control instructions.
    ///
    /// The fixed `source` tag attributes the commands to this server in the
    /// vendor audit trail. Returns the raw `data` payload; the tool layer
    /// flattens the per-instruction results.
    pub async fn batch_control(
        &self,
        access_token: &str,
        instructions: &[ControlInstruction],
    ) -> Result<Value> {
        let body = json!({
            "data": {
                "controlInstructions": instructions,
                "source": CONTROL_SOURCE,
            }
        });
        let response = self
            .http
            .request(BATCH_CONTROL_PATH, Method::POST, None, Some(body), Some(access_token))
            .await
            .ok_or_else(|| CecError::invalid_response("batch control returned no response"))?;
        Ok(response.get("data").cloned().unwrap_or(Value::Null))
    }

    /// Fetch the GB/T-28181 media gateway configuration, raw passthrough
    pub async fn get_media_gbt28181_config(&self, access_token: &str) -> Option<Value> {
        self.http
            .request(MEDIA_GBT28181_PATH, Method::GET, None, None, Some(access_token))
            .await
    }

    /// List device labels, raw passthrough of `data`
    pub async fn list_labels(&self, access_token: &str) -> Option<Value> {
        let response = self
            .http
            .request(LABEL_LIST_PATH, Method::GET, None, None, Some(access_token))
            .await?;
        response.get("data").cloned()
    }
}

/// Truthiness of a loosely typed vendor field
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty() && s != "false" && s != "0",
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Coerce an optional JSON field to text; missing and null become ""
fn text_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}
