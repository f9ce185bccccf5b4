//! JSON-RPC client for the Zabbix API over HTTP
//!
//! # Core Features
//!
//! - **Three call styles**: raw envelope, API error surfaced as `Err`, or
//!   result decoded straight into your own types
//! - **Session handling**: `user.login` with the parameter names the server
//!   version expects, bearer header plus envelope token, scoped
//!   unauthenticated calls
//! - **Version negotiation**: the server version is fetched once at connect
//!   and drives every version-specific protocol choice
//! - **Serialization policy**: optionally only one request in flight
//! - **Observability**: `tracing` spans, an optional request/response trace
//!   sink, and OpenTelemetry metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use zapi_client::ZabbixClient;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = ZabbixClient::connect("http://localhost/zabbix/api_jsonrpc.php").await?;
//!     println!("Server version: {}", client.version_string());
//!
//!     client.login("Admin", "zabbix").await?;
//!
//!     let hosts: Vec<serde_json::Value> = client
//!         .call_typed("host.get", json!({"output": ["hostid", "host"]}))
//!         .await?;
//!     println!("{} hosts", hosts.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod client_builder;
mod engine;
mod gate;
mod metrics;
mod session;
mod trace;
mod transport;

pub use client::{ZabbixClient, LOGIN_METHOD, LOGOUT_METHOD, VERSION_METHOD};
pub use client_builder::ClientBuilder;
pub use engine::CallEngine;
pub use gate::{CallGate, GatePass};
pub use metrics::ClientMetrics;
pub use session::{login_params, Session, SuspendedAuth};
pub use trace::{TraceSink, TracingSink};
pub use transport::{
    HttpOptions, HttpTransport, InboundResponse, OutboundRequest, Transport, DEFAULT_USER_AGENT,
    JSON_RPC_CONTENT_TYPE,
};
