//! Request/response trace sink
//!
//! A client can be given a [`TraceSink`] that sees every body going out and
//! coming back, together with the HTTP status. The methods return nothing, so
//! a sink that fails to write cannot abort a call.
//!
//! Bodies include whatever the caller sent, `user.login` passwords included.
//! Point the sink somewhere appropriate.

use zapi_core::Error;

/// Receives wire-level traces of every call
pub trait TraceSink: Send + Sync {
    /// Called with the serialized request just before it is sent
    fn request(&self, id: i32, method: &str, body: &[u8]);

    /// Called with the raw response body once it has been read
    fn response(&self, id: i32, status: u16, body: &[u8]);

    /// Called when the exchange failed before a response was read
    fn failure(&self, id: i32, error: &Error);

    /// Called for configuration warnings, such as disabled TLS verification
    fn warning(&self, message: &str);
}

/// [`TraceSink`] that forwards to `tracing` under the `zapi::wire` target
///
/// Enable with `RUST_LOG=zapi::wire=debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn request(&self, id: i32, method: &str, body: &[u8]) {
        tracing::debug!(
            target: "zapi::wire",
            id,
            method,
            body = %String::from_utf8_lossy(body),
            "Request (POST)"
        );
    }

    fn response(&self, id: i32, status: u16, body: &[u8]) {
        tracing::debug!(
            target: "zapi::wire",
            id,
            status,
            body = %String::from_utf8_lossy(body),
            "Response"
        );
    }

    fn failure(&self, id: i32, error: &Error) {
        tracing::debug!(target: "zapi::wire", id, error = %error, "Exchange failed");
    }

    fn warning(&self, message: &str) {
        tracing::warn!(target: "zapi::wire", "{}", message);
    }
}
