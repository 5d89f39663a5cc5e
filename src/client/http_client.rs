//! HTTP request wrapper for the CEC cloud API
//!
//! All vendor calls go through [`CecHttpClient::request`]: it joins the
//! endpoint path onto the base URL, carries the access token as a query
//! parameter (the vendor never reads auth headers), sends JSON bodies for
//! non-GET verbs and decodes the response as UTF-8 JSON. Failures are
//! classified, logged once, and surface to callers as `None` — nothing below
//! this layer propagates an error past it.

use crate::config::{CecConfig, ACCESS_TOKEN_PARAM};
use crate::error::{CecError, Result};
use reqwest::{Client, ClientBuilder, Method};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error};
use url::Url;

/// HTTP client for the CEC cloud API
pub struct CecHttpClient {
    /// HTTP client instance
    client: Client,

    /// Base URL all paths are joined onto
    base_url: Url,
}

impl CecHttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &CecConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!("cec-iot-mcp/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CecError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Build the fully qualified URL for an endpoint path
    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CecError::config(format!("Invalid URL path {path}: {e}")))
    }

    /// Execute one vendor API call and decode the JSON response.
    ///
    /// Every failure is logged here and collapses to `None`; there is no
    /// retry. GET requests carry query parameters only, other verbs send
    /// `body` as JSON and still attach the query parameters.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        query: Option<HashMap<String, String>>,
        body: Option<Value>,
        access_token: Option<&str>,
    ) -> Option<Value> {
        match self
            .try_request(path, method.clone(), query, body, access_token)
            .await
        {
            Ok(value) => Some(value),
            Err(CecError::HttpStatus { status, url }) => {
                error!("HTTP error [{status}] {method} {path}: {url}");
                None
            }
            Err(e) if e.is_network() => {
                error!("Network error: {method} {path} - {e}");
                None
            }
            Err(e) => {
                error!("Unexpected error: {method} {path} - {e}");
                None
            }
        }
    }

    async fn try_request(
        &self,
        path: &str,
        method: Method,
        query: Option<HashMap<String, String>>,
        body: Option<Value>,
        access_token: Option<&str>,
    ) -> Result<Value> {
        let url = self.build_url(path)?;

        let mut params = query.unwrap_or_default();
        if let Some(token) = access_token {
            params.insert(ACCESS_TOKEN_PARAM.to_string(), token.to_string());
        }

        debug!("dispatching {method} {url}");

        let mut builder = self.client.request(method.clone(), url).query(&params);
        if method != Method::GET {
            if let Some(body) = &body {
                builder = builder.json(body);
            }
        }

        let response = builder.send().await.map_err(classify_send_error)?;

        let status = response.status();
        let effective_url = response.url().clone();
        if !status.is_success() {
            return Err(CecError::HttpStatus {
                status: status.as_u16(),
                url: effective_url.to_string(),
            });
        }

        // The vendor does not always content-negotiate correctly, so decode
        // the body as UTF-8 text before JSON parsing.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CecError::network(format!("Failed to read response body: {e}")))?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(serde_json::from_str(&text)?)
    }
}

/// Classify a transport-level failure: anything that happened before a
/// response arrived counts as a network error.
fn classify_send_error(e: reqwest::Error) -> CecError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        CecError::network(e.to_string())
    } else {
        CecError::Http(e)
    }
}
