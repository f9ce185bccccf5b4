//! Client builder
//!
//! The `ClientBuilder` collects construction settings before connecting:
//! - TLS verification, timeout and user agent of the HTTP client
//! - the serialization policy (one request in flight at a time)
//! - a trace sink for request/response bodies
//! - OpenTelemetry metrics
//!
//! Connecting asks the server for its version, which decides protocol
//! variants for the rest of the client's life.
//!
//! # Examples
//!
//! ```rust,no_run
//! use zapi_client::{ClientBuilder, TracingSink};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> zapi_core::Result<()> {
//! let client = ClientBuilder::new("https://zabbix.example.com/api_jsonrpc.php")
//!     .timeout(Duration::from_secs(30))
//!     .serialize(true)
//!     .trace_sink(Arc::new(TracingSink))
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::engine::CallEngine;
use crate::trace::TraceSink;
use crate::transport::{HttpOptions, HttpTransport, Transport};
use crate::{ClientMetrics, ZabbixClient};
use std::sync::Arc;
use std::time::Duration;
use zapi_core::Result;

const INSECURE_TLS_WARNING: &str =
    "TLS running in insecure mode, do not use this configuration in production";

/// Builder for configuring and creating a [`ZabbixClient`]
pub struct ClientBuilder {
    url: String,
    http: HttpOptions,
    serialize: bool,
    trace_sink: Option<Arc<dyn TraceSink>>,
    http_client: Option<reqwest::Client>,
    transport: Option<Arc<dyn Transport>>,
    observability_config: Option<zapi_core::ObservabilityConfig>,
    metrics: bool,
}

impl ClientBuilder {
    /// Create a new client builder
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: HttpOptions::default(),
            serialize: false,
            trace_sink: None,
            http_client: None,
            transport: None,
            observability_config: None,
            metrics: false,
        }
    }

    /// Accept any server certificate (logs a warning)
    pub fn skip_tls_verify(mut self, skip: bool) -> Self {
        self.http.skip_tls_verify = skip;
        self
    }

    /// Whole-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = Some(timeout);
        self
    }

    /// Value of the `User-Agent` header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.http.user_agent = user_agent.into();
        self
    }

    /// Allow only one request in flight at a time
    pub fn serialize(mut self, serialize: bool) -> Self {
        self.serialize = serialize;
        self
    }

    /// Send request and response bodies to a sink
    pub fn trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace_sink = Some(sink);
        self
    }

    /// Use a preconfigured reqwest client
    ///
    /// TLS and timeout settings on this builder are then ignored; configure
    /// them on the supplied client instead.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Use a custom transport instead of HTTP
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Initialize OpenTelemetry with the given configuration and record metrics
    pub fn with_observability(mut self, config: zapi_core::ObservabilityConfig) -> Self {
        self.observability_config = Some(config);
        self.metrics = true;
        self
    }

    /// Record metrics through whatever meter provider is already installed
    pub fn with_metrics(mut self) -> Self {
        self.metrics = true;
        self
    }

    fn build_transport(&self) -> Result<Arc<dyn Transport>> {
        if let Some(ref transport) = self.transport {
            return Ok(transport.clone());
        }
        let transport = match self.http_client {
            Some(ref client) => {
                HttpTransport::with_client(&self.url, client.clone(), &self.http.user_agent)?
            }
            None => HttpTransport::new(&self.url, &self.http)?,
        };
        Ok(Arc::new(transport))
    }

    /// Build the client and negotiate the server version
    ///
    /// Fails if the version request fails or returns an unparsable version.
    pub async fn connect(self) -> Result<ZabbixClient> {
        let service_name = match self.observability_config {
            Some(ref config) => {
                zapi_core::init_observability(config.clone())?;
                config.service_name.clone()
            }
            None => "zapi".to_string(),
        };
        let metrics = self
            .metrics
            .then(|| Arc::new(ClientMetrics::new(service_name)));

        if self.http.skip_tls_verify {
            match self.trace_sink {
                Some(ref sink) => sink.warning(INSECURE_TLS_WARNING),
                None => tracing::warn!("{}", INSECURE_TLS_WARNING),
            }
        }

        let transport = self.build_transport()?;
        let engine = CallEngine::new(transport, self.serialize, self.trace_sink, metrics);

        tracing::info!(url = %self.url, serialize = self.serialize, "Connecting to server");
        let mut client = ZabbixClient::new(self.url, engine);
        client.negotiate_version().await?;

        Ok(client)
    }
}
