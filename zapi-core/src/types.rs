//! Request and response envelopes
//!
//! Every exchange with the API is one HTTP POST carrying one request envelope
//! and answered with one response envelope:
//!
//! ```text
//! --> {"jsonrpc":"2.0","method":"host.get","params":{"output":"extend"},"auth":"0424bd...","id":3}
//! <-- {"jsonrpc":"2.0","result":[{"hostid":"10084"}],"id":3}
//! ```
//!
//! # Two response shapes
//!
//! A response can be decoded two ways:
//!
//! - [`Response`] decodes `result` into a [`serde_json::Value`], which is
//!   convenient when the caller just wants to look at it
//! - [`RawResponse`] keeps `result` as the raw JSON text, so it can be decoded
//!   once, straight into the type the caller asks for

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::collections::HashMap;

/// Protocol marker placed in every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// Named call parameters
///
/// Keys are unique; inserting the same key twice keeps the last value.
pub type Params = HashMap<String, serde_json::Value>;

/// Request envelope
///
/// `auth` is skipped entirely when empty, so an unauthenticated request never
/// carries an `"auth": ""` member.
///
/// # Examples
///
/// ```rust
/// use zapi_core::RequestEnvelope;
/// use serde_json::json;
///
/// let request = RequestEnvelope::new("apiinfo.version", json!([]), "", 1);
/// let text = serde_json::to_string(&request).unwrap();
/// assert!(!text.contains("auth"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Remote method, e.g. "host.get"
    pub method: String,
    /// Object, array or primitive
    pub params: serde_json::Value,
    /// Session token; empty means unauthenticated
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auth: String,
    /// Correlation id
    pub id: i32,
}

impl RequestEnvelope {
    /// Create a request envelope with the protocol marker filled in
    pub fn new(
        method: impl Into<String>,
        params: serde_json::Value,
        auth: impl Into<String>,
        id: i32,
    ) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            auth: auth.into(),
            id,
        }
    }
}

/// Response envelope with a generically decoded result
///
/// `result` may be a string (a session token), an object, an array or null.
/// `id` is `None` when the server could not tell which request it answers,
/// which happens for parse errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Protocol marker echoed by the server
    #[serde(default)]
    pub jsonrpc: String,
    /// Present when the server rejected the call
    #[serde(default)]
    pub error: Option<ApiError>,
    /// Result value; `Null` on error
    #[serde(default)]
    pub result: serde_json::Value,
    /// Correlation id echoed from the request
    #[serde(default)]
    pub id: Option<i32>,
}

impl Response {
    /// Whether the server rejected the call
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Response envelope with the result left undecoded
///
/// The result keeps its original JSON text until
/// [`codec::decode_result`](crate::codec::decode_result) turns it into the
/// caller's type.
#[derive(Debug, Serialize, Deserialize)]
pub struct RawResponse {
    /// Protocol marker echoed by the server
    #[serde(default)]
    pub jsonrpc: String,
    /// Present when the server rejected the call
    #[serde(default)]
    pub error: Option<ApiError>,
    /// Raw result text; `None` when absent or null
    #[serde(default)]
    pub result: Option<Box<RawValue>>,
    /// Correlation id echoed from the request
    #[serde(default)]
    pub id: Option<i32>,
}

impl RawResponse {
    /// Raw result, if the server sent a non-null one
    pub fn result(&self) -> Option<&RawValue> {
        self.result.as_deref()
    }
}

impl PartialEq for RawResponse {
    fn eq(&self, other: &Self) -> bool {
        self.jsonrpc == other.jsonrpc
            && self.error == other.error
            && self.id == other.id
            && self.result().map(RawValue::get) == other.result().map(RawValue::get)
    }
}
