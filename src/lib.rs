//! ZAPI - JSON-RPC client for the Zabbix management API
//!
//! This is the convenience crate that re-exports the zapi sub-crates, so a
//! single dependency gives you the client and its core types.
//!
//! # Architecture
//!
//! - **zapi-core**: envelope types, codec, error taxonomy, version parsing,
//!   observability bootstrap
//! - **zapi-client**: HTTP transport, call engine, session handling, version
//!   negotiation, concurrency gate
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use zapi::ZabbixClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = ZabbixClient::builder("https://zabbix.example.com/api_jsonrpc.php")
//!         .serialize(true)
//!         .connect()
//!         .await?;
//!
//!     client.login("Admin", "zabbix").await?;
//!
//!     let hosts: Vec<serde_json::Value> = client
//!         .call_typed("host.get", serde_json::json!({"output": "extend"}))
//!         .await?;
//!     println!("{} hosts on {}", hosts.len(), client.version_string());
//!
//!     Ok(())
//! }
//! ```

pub use zapi_client as client;
pub use zapi_core as core;

pub use zapi_client::{ClientBuilder, ZabbixClient};
pub use zapi_core::{ApiError, ApiVersion, Error, Result};
