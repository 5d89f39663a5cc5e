//! CEC IoT MCP Server - Main Entry Point

use cec_iot_mcp::{
    server::McpServer, tools::ToolContext, CecClient, CecConfig, CecCredentials, Result,
};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// CEC IoT MCP Server Configuration
#[derive(Parser, Debug)]
#[command(name = "cec-iot-mcp-server")]
#[command(about = "MCP server exposing the CEC building-management cloud API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Application key for the CEC platform
    #[arg(long, env = "APP_KEY", hide_env_values = true)]
    app_key: Option<String>,

    /// Application secret for the CEC platform
    #[arg(long, env = "APP_SECRET", hide_env_values = true)]
    app_secret: Option<String>,
}

impl Cli {
    /// Initialize logging based on debug flag.
    ///
    /// Logs go to stderr; stdout carries the JSON-RPC transport.
    fn initialize_logging(&self) {
        let filter = if self.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }

    fn credentials(&self) -> Result<CecCredentials> {
        match (&self.app_key, &self.app_secret) {
            (Some(app_key), Some(app_secret)) => Ok(CecCredentials {
                app_key: app_key.clone(),
                app_secret: app_secret.clone(),
            }),
            _ => CecCredentials::from_env(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.initialize_logging();

    let credentials = cli.credentials()?;
    let config = Arc::new(CecConfig::default());
    let client = Arc::new(CecClient::new(config, credentials)?);

    info!("starting cec-iot-mcp-server on stdio");
    let server = McpServer::new(ToolContext::new(client));
    server.run_stdio().await
}
