//! Core types and codec for zapi
//!
//! This crate holds the parts of the Zabbix JSON-RPC client that do not touch
//! the network:
//!
//! - **Types**: request and response envelopes
//! - **Codec**: envelope serialization with error kinds that separate "could
//!   not build the request" from "the server sent garbage"
//! - **Error handling**: the client error taxonomy and the wire-format API error
//! - **Version**: the integer server version used to pick protocol variants
//! - **Results**: helpers for list-shaped `*.get` results
//! - **Observability**: logging and OpenTelemetry bootstrap
//!
//! The `zapi-client` crate builds the HTTP client on top of this foundation.
//!
//! # Example
//!
//! ```rust
//! use zapi_core::{codec, ApiVersion, RequestEnvelope};
//! use serde_json::json;
//!
//! let request = RequestEnvelope::new("host.get", json!({"output": "extend"}), "", 1);
//! let body = codec::encode_request(&request).unwrap();
//! assert_eq!(codec::decode_request(&body).unwrap().method, "host.get");
//!
//! assert_eq!(ApiVersion::parse("5.4.0").unwrap().as_i64(), 50400);
//! ```

pub mod codec;
pub mod error;
pub mod observability;
pub mod results;
pub mod types;
pub mod version;

pub use error::{ApiError, Error, Result, INVALID_PARAMS};
pub use observability::{init_observability, ObservabilityConfig};
pub use types::{Params, RawResponse, RequestEnvelope, Response, JSONRPC_VERSION};
pub use version::ApiVersion;
