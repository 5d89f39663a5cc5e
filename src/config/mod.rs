//! Configuration for the CEC IoT MCP server
//!
//! The vendor platform is addressed through a fixed base domain; the few
//! identifiers it requires (camera brand/model, media gateway, collect-data
//! code lists) are compiled-in constants. The only external inputs are the
//! app key/secret pair used for per-call authentication.

use crate::error::{CecError, Result};
use serde::{Deserialize, Serialize};
use std::{env, time::Duration};
use url::Url;

/// Base domain of the CEC SaaS platform
pub const DEFAULT_DOMAIN: &str = "https://oapi.sh-cec.com/";

/// Relative path of the token endpoint
pub const AUTH_PATH: &str = "auth/get_token";

/// Query-parameter key carrying the access token on every authenticated call
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Brand/model identifier of the generic GB/T-28181 camera
pub const CAMERA_BRAND_MODEL_ID: &str = "1690200341562109953";

/// Identifier of the media gateway cameras are parented to
pub const MEDIA_GATEWAY_ID: &str = "1";

/// Streaming transport profile pinned onto newly provisioned cameras
pub const MEDIA_TRANSPORT_PROFILE: &str = "GB/T-28181";

/// Collect-data codes exposing the live stream endpoints of a camera
pub const CAMERA_PLAY_CODES: &[&str] = &["hlsUrl", "ws_flv", "https_flv", "flvUrl"];

/// Collect-data codes exposing the latest camera screenshot
pub const CAMERA_SCREENSHOT_CODES: &[&str] = &["cameraScreenshot"];

/// `source` tag attached to batch control calls for the vendor audit trail
pub const CONTROL_SOURCE: &str = "MCP Server";

/// Environment variable holding the app key
pub const APP_KEY_ENV: &str = "APP_KEY";

/// Environment variable holding the app secret
pub const APP_SECRET_ENV: &str = "APP_SECRET";

/// Immutable vendor API configuration, constructed once at startup
#[derive(Debug, Clone)]
pub struct CecConfig {
    /// Base URL all endpoint paths are joined onto
    pub base_url: Url,

    /// Relative path of the token endpoint
    pub auth_path: String,

    /// Timeout applied to every individual HTTP call
    pub timeout: Duration,
}

impl Default for CecConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_DOMAIN).expect("default domain is a valid URL"),
            auth_path: AUTH_PATH.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl CecConfig {
    /// Create a configuration pointing at a non-default base URL
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }
}

/// App-key/app-secret pair exchanged for an access token on every call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CecCredentials {
    /// Application key
    pub app_key: String,

    /// Application secret
    pub app_secret: String,
}

impl CecCredentials {
    /// Read credentials from the `APP_KEY` / `APP_SECRET` environment variables
    pub fn from_env() -> Result<Self> {
        let app_key = env::var(APP_KEY_ENV)
            .map_err(|_| CecError::config(format!("{APP_KEY_ENV} environment variable not set")))?;
        let app_secret = env::var(APP_SECRET_ENV).map_err(|_| {
            CecError::config(format!("{APP_SECRET_ENV} environment variable not set"))
        })?;
        Ok(Self {
            app_key,
            app_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_fixed_domain() {
        let config = CecConfig::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_DOMAIN);
        assert_eq!(config.auth_path, AUTH_PATH);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn credentials_from_env() {
        temp_env::with_vars(
            [(APP_KEY_ENV, Some("key-1")), (APP_SECRET_ENV, Some("sec-1"))],
            || {
                let creds = CecCredentials::from_env().unwrap();
                assert_eq!(creds.app_key, "key-1");
                assert_eq!(creds.app_secret, "sec-1");
            },
        );
    }

    #[test]
    fn credentials_from_env_missing_secret() {
        temp_env::with_vars(
            [(APP_KEY_ENV, Some("key-1")), (APP_SECRET_ENV, None)],
            || {
                let err = CecCredentials::from_env().unwrap_err();
                assert!(matches!(err, CecError::Config(_)));
            },
        );
    }
}
