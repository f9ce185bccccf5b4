//! Call engine
//!
//! Turns `(method, params)` into one HTTP exchange and the response body into
//! a result. Three variants of increasing strictness sit on top of a single
//! exchange routine:
//!
//! 1. [`CallEngine::call`]: API errors come back as data in the [`Response`]
//! 2. [`CallEngine::call_checked`]: API errors become `Err(Error::Api)`
//! 3. [`CallEngine::call_typed`]: like `call_checked`, and the result is
//!    decoded once, straight from its raw text into the caller's type
//!
//! # Exchange Lifecycle
//!
//! 1. **Gate**: wait for the concurrency gate (serialized clients only)
//! 2. **Id**: take the next correlation id
//! 3. **Compose**: encode params, attach the session token, encode the envelope
//! 4. **Send**: POST through the transport and read the body
//! 5. **Release**: drop the gate
//!
//! The id is taken exactly once per call, before anything can fail, so every
//! call consumes one id whatever its outcome. The counter is atomic, per
//! client, and wraps on overflow.

use crate::gate::CallGate;
use crate::metrics::ClientMetrics;
use crate::session::Session;
use crate::trace::TraceSink;
use crate::transport::{OutboundRequest, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Instant;
use zapi_core::{codec, ApiVersion, Error, RequestEnvelope, Response, Result};

/// Owns the transport, the id counter and the concurrency gate
pub struct CallEngine {
    transport: Arc<dyn Transport>,
    last_id: AtomicI32,
    gate: Option<CallGate>,
    sink: Option<Arc<dyn TraceSink>>,
    metrics: Option<Arc<ClientMetrics>>,
}

/// What the transport returned for one exchange
struct Exchange {
    id: i32,
    body: Vec<u8>,
}

impl CallEngine {
    /// Create an engine; `serialize` enables the concurrency gate
    pub fn new(
        transport: Arc<dyn Transport>,
        serialize: bool,
        sink: Option<Arc<dyn TraceSink>>,
        metrics: Option<Arc<ClientMetrics>>,
    ) -> Self {
        Self {
            transport,
            last_id: AtomicI32::new(0),
            gate: serialize.then(CallGate::new),
            sink,
            metrics,
        }
    }

    /// Whether calls are serialized through the gate
    pub fn is_serialized(&self) -> bool {
        self.gate.is_some()
    }

    /// Id the most recent call used (0 before the first call)
    pub fn last_id(&self) -> i32 {
        self.last_id.load(Ordering::SeqCst)
    }

    fn next_id(&self) -> i32 {
        // fetch_add wraps on overflow
        self.last_id.fetch_add(1, Ordering::SeqCst).wrapping_add(1)
    }

    /// Issue a call; API errors are returned inside the response
    #[tracing::instrument(level = "debug", skip_all, fields(method = %method))]
    pub async fn call<P: Serialize>(
        &self,
        method: &str,
        params: P,
        session: &Session,
        version: ApiVersion,
    ) -> Result<Response> {
        let started = Instant::now();
        let result = self
            .exchange(method, params, session, version)
            .await
            .and_then(|exchange| {
                let response = codec::decode_response(&exchange.body)?;
                check_id(exchange.id, response.id)?;
                Ok(response)
            });

        match &result {
            Ok(response) => match &response.error {
                Some(error) => {
                    if let Some(ref m) = self.metrics {
                        m.record_api_error(error.code);
                    }
                    self.finish(method, started, "api_error", None);
                }
                None => self.finish(method, started, "ok", None),
            },
            Err(e) => self.finish(method, started, "failed", Some(e)),
        }
        result
    }

    /// Issue a call and turn an API error into `Err(Error::Api)`
    pub async fn call_checked<P: Serialize>(
        &self,
        method: &str,
        params: P,
        session: &Session,
        version: ApiVersion,
    ) -> Result<Response> {
        let mut response = self.call(method, params, session, version).await?;
        match response.error.take() {
            Some(error) => Err(Error::Api(error)),
            None => Ok(response),
        }
    }

    /// Issue a call and decode its result into `T`
    #[tracing::instrument(level = "debug", skip_all, fields(method = %method))]
    pub async fn call_typed<T, P>(
        &self,
        method: &str,
        params: P,
        session: &Session,
        version: ApiVersion,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let started = Instant::now();
        let result = self
            .exchange(method, params, session, version)
            .await
            .and_then(|exchange| {
                let response = codec::decode_raw_response(&exchange.body)?;
                check_id(exchange.id, response.id)?;
                if let Some(error) = response.error {
                    return Err(Error::Api(error));
                }
                codec::decode_result(response.result.as_deref())
            });

        match &result {
            Ok(_) => self.finish(method, started, "ok", None),
            Err(e @ Error::Api(_)) => self.finish(method, started, "api_error", Some(e)),
            Err(e) => self.finish(method, started, "failed", Some(e)),
        }
        result
    }

    /// Gate, id, compose, send
    async fn exchange<P: Serialize>(
        &self,
        method: &str,
        params: P,
        session: &Session,
        version: ApiVersion,
    ) -> Result<Exchange> {
        let _pass = match &self.gate {
            Some(gate) => {
                let waiting = Instant::now();
                let pass = gate.enter().await;
                if let Some(ref m) = self.metrics {
                    m.record_gate_wait(waiting.elapsed());
                }
                Some(pass)
            }
            None => None,
        };

        let id = self.next_id();
        let result = self.send(id, method, params, session, version).await;
        if let Err(ref e) = result {
            if let Some(ref sink) = self.sink {
                sink.failure(id, e);
            }
        }
        result.map(|body| Exchange { id, body })
    }

    async fn send<P: Serialize>(
        &self,
        id: i32,
        method: &str,
        params: P,
        session: &Session,
        version: ApiVersion,
    ) -> Result<Vec<u8>> {
        let params = codec::encode_params(params)?;
        let mut envelope = RequestEnvelope::new(method, params, "", id);
        let mut request = OutboundRequest::new(Vec::new());
        session.attach_token(&mut envelope, &mut request, version)?;
        request.body = codec::encode_request(&envelope)?;

        if let Some(ref sink) = self.sink {
            sink.request(id, method, &request.body);
        }
        tracing::debug!(id, "Request sent");

        let response = self.transport.post(request).await?;

        if let Some(ref sink) = self.sink {
            sink.response(id, response.status, &response.body);
        }
        tracing::debug!(id, status = response.status, "Response received");

        Ok(response.body)
    }

    fn finish(&self, method: &str, started: Instant, status: &str, error: Option<&Error>) {
        let elapsed = started.elapsed();
        if let Some(ref m) = self.metrics {
            m.record_request(method, status, elapsed);
            if let Some(e) = error {
                m.record_error(e);
            }
        }
        match error {
            Some(e) => tracing::debug!(status, error = %e, "Call failed"),
            None => tracing::debug!(status, duration_secs = elapsed.as_secs_f64(), "Call completed"),
        }
    }
}

impl std::fmt::Debug for CallEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallEngine")
            .field("last_id", &self.last_id())
            .field("serialized", &self.is_serialized())
            .field("trace_sink", &self.sink.is_some())
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

/// Reject a response that answers a different request
///
/// A null id is accepted: servers send it when they could not parse the
/// request far enough to read the id.
fn check_id(sent: i32, received: Option<i32>) -> Result<()> {
    match received {
        Some(actual) if actual != sent => Err(Error::IdMismatch {
            expected: sent,
            actual,
        }),
        _ => Ok(()),
    }
}
