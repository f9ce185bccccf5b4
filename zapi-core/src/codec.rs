//! Envelope encoding and decoding
//!
//! Thin wrappers over serde_json that map failures onto the right [`Error`]
//! kind: problems building a request become [`Error::Encode`], problems
//! reading a response become [`Error::Decode`]. An API error inside a
//! well-formed response is *not* a decode failure; it is returned as data in
//! the envelope.
//!
//! # Example
//!
//! ```rust
//! use zapi_core::{codec, RequestEnvelope};
//! use serde_json::json;
//!
//! let request = RequestEnvelope::new("apiinfo.version", json!([]), "", 1);
//! let bytes = codec::encode_request(&request).unwrap();
//!
//! let response = codec::decode_response(br#"{"jsonrpc":"2.0","result":"6.0.0","id":1}"#).unwrap();
//! assert_eq!(response.result, json!("6.0.0"));
//! # let _ = bytes;
//! ```

use crate::error::{Error, Result};
use crate::types::{RawResponse, RequestEnvelope, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::value::RawValue;

/// Convert call parameters into the JSON value placed in `params`
pub fn encode_params<P: Serialize>(params: P) -> Result<serde_json::Value> {
    serde_json::to_value(params).map_err(|e| Error::Encode(e.to_string()))
}

/// Serialize a request envelope into the HTTP body
pub fn encode_request(request: &RequestEnvelope) -> Result<Vec<u8>> {
    serde_json::to_vec(request).map_err(|e| Error::Encode(e.to_string()))
}

/// Parse a request envelope, as a mock server would
pub fn decode_request(data: &[u8]) -> Result<RequestEnvelope> {
    serde_json::from_slice(data).map_err(|e| Error::Decode(e.to_string()))
}

/// Parse a response body into the generic envelope
pub fn decode_response(data: &[u8]) -> Result<Response> {
    serde_json::from_slice(data).map_err(|e| Error::Decode(e.to_string()))
}

/// Parse a response body, keeping the result undecoded
pub fn decode_raw_response(data: &[u8]) -> Result<RawResponse> {
    serde_json::from_slice(data).map_err(|e| Error::Decode(e.to_string()))
}

/// Decode a deferred result into the caller's type
///
/// A missing or null result decodes as JSON `null`, so targets like
/// `Option<T>` or `()` work as expected while `Vec<T>` reports a decode error.
pub fn decode_result<T: DeserializeOwned>(raw: Option<&RawValue>) -> Result<T> {
    let text = raw.map(RawValue::get).unwrap_or("null");
    serde_json::from_str(text).map_err(|e| Error::Decode(e.to_string()))
}

/// Serialize a response envelope; used by mock servers in tests
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    serde_json::to_vec(response).map_err(|e| Error::Encode(e.to_string()))
}
