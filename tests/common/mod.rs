#![allow(dead_code)]
//! WireMock-based CEC API mocking infrastructure
//!
//! Provides mock HTTP servers that simulate the CEC cloud platform for
//! testing without requiring vendor credentials.

use cec_iot_mcp::tools::ToolContext;
use cec_iot_mcp::{CecClient, CecConfig, CecCredentials};
use serde_json::{json, Value};
use std::sync::Arc;
use url::Url;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TOKEN_PATH: &str = "/auth/get_token";
pub const AREA_LIST_PATH: &str = "/cec-saas-ac-platform/V2_7_0/areaApi/list";
pub const ASSET_CREATE_PATH: &str = "/cec-saas-ac-platform/V2_5_0/assetApi";
pub const ASSET_LIST_PATH: &str = "/cec-saas-ac-platform/V2_5_0/assetApi/list";
pub const COLLECT_DATA_PATH: &str = "/cec-saas-ac-platform/V3_4_1/assetApi/listCollectData";
pub const COLLECT_DATA_BATCH_PATH: &str =
    "/cec-saas-ac-platform/V3_4_1/assetApi/listCollectDataIdCodes";
pub const ASSET_MODEL_ATTR_PATH: &str =
    "/cec-saas-ac-platform/V3_4_1/assetModelApi/pageAssetModelAttribute";
pub const BATCH_CONTROL_PATH: &str = "/cec-saas-ac-platform/V2_5_0/assetApi/batchControl";
pub const MEDIA_GBT28181_PATH: &str =
    "/cec-saas-ac-platform/V2_7_0/assetApi/getMediaGBT28181Config";
pub const LABEL_LIST_PATH: &str = "/cec-saas-ac-platform/V3_1_0/labelApi/labelList";

/// Mock CEC cloud platform for testing
pub struct MockCecServer {
    pub server: MockServer,
}

impl MockCecServer {
    /// Start a mock server with no endpoints mounted
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Mount a token endpoint handing out the given access token
    pub async fn mock_token(&self, token: &str) {
        self.mock_get(
            TOKEN_PATH,
            json!({"success": true, "data": {"access_token": token}}),
        )
        .await;
    }

    /// Mount a GET endpoint returning the given JSON body
    pub async fn mock_get(&self, endpoint: &str, response: Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .mount(&self.server)
            .await;
    }

    /// Mount a POST endpoint returning the given JSON body
    pub async fn mock_post(&self, endpoint: &str, response: Value) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .mount(&self.server)
            .await;
    }

    /// Mount an endpoint answering with the given HTTP status and empty body
    pub async fn mock_status(&self, http_method: &str, endpoint: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Build a client pointed at this mock server
    pub fn client(&self) -> Arc<CecClient> {
        client_for(&self.uri())
    }

    /// Build a tool context pointed at this mock server
    pub fn context(&self) -> ToolContext {
        ToolContext::new(self.client())
    }
}

/// Build a client for an arbitrary base URL (e.g. an unroutable one)
pub fn client_for(base_url: &str) -> Arc<CecClient> {
    let config = Arc::new(CecConfig::with_base_url(
        Url::parse(base_url).expect("test base URL must parse"),
    ));
    let credentials = CecCredentials {
        app_key: "K".to_string(),
        app_secret: "S".to_string(),
    };
    Arc::new(CecClient::new(config, credentials).expect("client construction"))
}
