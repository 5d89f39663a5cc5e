//! Tool-surface tests for camera provisioning and stream retrieval.

mod common;

use cec_iot_mcp::tools::camera;
use common::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn camera_inventory() -> serde_json::Value {
    json!({"data": [
        {"id": "cam1", "name": "camera-19F", "status": "0"},
        {"id": "cam2", "name": "camera-19F-Room1", "status": "0"},
    ]})
}

#[tokio::test]
async fn provisioning_returns_streaming_config() {
    let mock = MockCecServer::start().await;
    mock.mock_token("tok123").await;
    mock.mock_post(ASSET_CREATE_PATH, json!({"data": "dev-9"})).await;
    mock.mock_post(
        COLLECT_DATA_PATH,
        json!({"data": {"collectDataList": [{
            "id": "dev-9",
            "code": "mediaConfig",
            "value": "{\"extData\":{\"gbId\":\"34020000001320000001\",\"gbPort\":5060}}",
        }]}}),
    )
    .await;

    let response = camera::add_camera(&mock.context(), None, None, None).await;
    assert_eq!(response.status, "success");
    assert_eq!(response.data["gbId"], "34020000001320000001");
    assert_eq!(response.data["gbPort"], 5060);
}

#[tokio::test]
async fn provisioning_pins_the_media_transport_profile() {
    let mock = MockCecServer::start().await;
    mock.mock_token("tok123").await;
    Mock::given(method("POST"))
        .and(path(ASSET_CREATE_PATH))
        .and(body_partial_json(json!({"data": {
            "brandModelId": "1690200341562109953",
            "parentId": "1",
            "areaCode": "B1",
            "attributes": [{"attributeCode": "mediaConfig", "value": "GB/T-28181"}],
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "dev-9"})))
        .expect(1)
        .mount(&mock.server)
        .await;
    mock.mock_post(
        COLLECT_DATA_PATH,
        json!({"data": {"collectDataList": [{
            "id": "dev-9", "code": "mediaConfig", "value": "{\"extData\":{}}",
        }]}}),
    )
    .await;

    let response = camera::add_camera(
        &mock.context(),
        Some("front desk cam".to_string()),
        Some("SN12345678AB".to_string()),
        Some("B1".to_string()),
    )
    .await;
    assert_eq!(response.status, "success");
}

#[tokio::test]
async fn provisioning_without_device_id_surfaces_raw_response() {
    let mock = MockCecServer::start().await;
    mock.mock_token("tok123").await;
    let raw = json!({"data": null, "success": false, "message": "sn already exists"});
    mock.mock_post(ASSET_CREATE_PATH, raw.clone()).await;
    // No collect-data mock: the flow must not attempt a telemetry read.

    let response = camera::add_camera(&mock.context(), None, None, None).await;
    assert_eq!(response.status, "success");
    assert_eq!(response.data, raw);
}

#[tokio::test]
async fn provisioning_with_absent_readback_is_absent_overall() {
    let mock = MockCecServer::start().await;
    mock.mock_token("tok123").await;
    mock.mock_post(ASSET_CREATE_PATH, json!({"data": "dev-9"})).await;
    mock.mock_post(
        COLLECT_DATA_PATH,
        json!({"data": {"collectDataList": []}}),
    )
    .await;

    let response = camera::add_camera(&mock.context(), None, None, None).await;
    assert_eq!(response.status, "success");
    assert!(response.data.is_null());
}

#[tokio::test]
async fn provisioning_with_malformed_media_config_is_a_flow_fault() {
    let mock = MockCecServer::start().await;
    mock.mock_token("tok123").await;
    mock.mock_post(ASSET_CREATE_PATH, json!({"data": "dev-9"})).await;
    mock.mock_post(
        COLLECT_DATA_PATH,
        json!({"data": {"collectDataList": [{
            "id": "dev-9", "code": "mediaConfig", "value": "not valid json",
        }]}}),
    )
    .await;

    let response = camera::add_camera(&mock.context(), None, None, None).await;
    assert!(response.is_error());
    assert!(response.message.unwrap().starts_with("Error occurred:"));
}

#[tokio::test]
async fn play_url_batch_reads_streaming_codes() {
    let mock = MockCecServer::start().await;
    mock.mock_token("tok123").await;
    mock.mock_post(ASSET_LIST_PATH, camera_inventory()).await;
    mock.mock_post(
        COLLECT_DATA_BATCH_PATH,
        json!({"data": {"collectDataList": [
            {"id": "cam1", "code": "hlsUrl", "value": "live/cam1.m3u8"},
            {"id": "cam2", "code": "flvUrl", "value": "live/cam2.flv"},
        ]}}),
    )
    .await;

    let response = camera::get_play_url(&mock.context(), vec!["a1".to_string()]).await;
    assert_eq!(response.status, "success");
    assert_eq!(response.data.as_array().unwrap().len(), 2);
    assert_eq!(response.data[0]["code"], "hlsUrl");
}

#[tokio::test]
async fn play_url_fails_when_device_resolution_fails() {
    let mock = MockCecServer::start().await;
    mock.mock_token("tok123").await;
    mock.mock_status("POST", ASSET_LIST_PATH, 500).await;

    let response = camera::get_play_url(&mock.context(), vec!["a1".to_string()]).await;
    assert!(response.is_error());
}

#[tokio::test]
async fn screenshot_urls_are_prefixed_and_empty_values_dropped() {
    let mock = MockCecServer::start().await;
    mock.mock_token("tok123").await;
    mock.mock_post(ASSET_LIST_PATH, camera_inventory()).await;
    mock.mock_post(
        COLLECT_DATA_BATCH_PATH,
        json!({"data": {"collectDataList": [
            {"id": "cam1", "code": "cameraScreenshot", "value": "path/img.jpg"},
            {"id": "cam2", "code": "cameraScreenshot", "value": ""},
        ]}}),
    )
    .await;

    let response = camera::get_camera_screenshot(&mock.context(), vec!["a1".to_string()]).await;
    assert_eq!(response.status, "success");

    let screenshots = response.data.as_array().unwrap();
    assert_eq!(screenshots.len(), 1);
    assert_eq!(screenshots[0]["id"], "cam1");
    assert_eq!(
        screenshots[0]["url"],
        format!("{}/path/img.jpg", mock.uri())
    );
}
