//! CEC IoT MCP server
//!
//! This crate exposes the CEC building-management cloud API (device
//! inventory, area hierarchy, collect-data reads, device control, camera
//! provisioning and stream URLs) as a set of MCP tools over a stdio
//! JSON-RPC transport.
//!
//! Layering, leaves first:
//!
//! - [`client::CecHttpClient`]: the uniform request wrapper — URL assembly,
//!   token-in-query auth, fixed timeout, failure classification.
//! - [`client::CecClient`]: one operation per vendor endpoint, each
//!   reshaping the loosely structured vendor JSON defensively.
//! - [`tools`]: named tool compositions (inventory enrichment, camera
//!   provisioning, batch control) consumed by an AI agent.
//! - [`server::McpServer`]: the thin stdio dispatch loop.

pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod tools;

pub use client::CecClient;
pub use config::{CecConfig, CecCredentials};
pub use error::{CecError, Result};
