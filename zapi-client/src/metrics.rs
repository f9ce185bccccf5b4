//! Client metrics definitions
//!
//! OpenTelemetry instruments recorded by the call engine. They go through the
//! global meter provider, so nothing leaves the process unless the
//! application installed an exporter (see `zapi_core::init_observability`).
//!
//! # Metrics Collected
//!
//! - **requests_total**: calls issued, by method and status (counter)
//! - **request_duration**: call latency, by method and status (histogram)
//! - **errors_total**: failed calls, by error kind (counter)
//! - **api_errors_total**: server-side rejections, by API error code (counter)
//! - **gate_wait**: time spent waiting on the concurrency gate (histogram)

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    InstrumentationScope, KeyValue,
};
use std::time::Duration;
use zapi_core::Error;

/// Client metrics for monitoring
pub struct ClientMetrics {
    /// Total number of calls issued
    pub requests_total: Counter<u64>,
    /// Call duration in seconds
    pub request_duration: Histogram<f64>,
    /// Total number of failed calls
    pub errors_total: Counter<u64>,
    /// Total number of API errors returned by the server
    pub api_errors_total: Counter<u64>,
    /// Seconds spent waiting for the concurrency gate
    pub gate_wait: Histogram<f64>,
}

impl ClientMetrics {
    /// Create metrics on a meter named after the service
    pub fn new(service_name: impl Into<String>) -> Self {
        let scope = InstrumentationScope::builder(service_name.into()).build();
        let meter = global::meter_with_scope(scope);
        Self::new_with_meter(&meter)
    }

    /// Create metrics on a specific meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            requests_total: meter
                .u64_counter("zapi.client.requests.total")
                .with_description("Total number of calls issued")
                .build(),
            request_duration: meter
                .f64_histogram("zapi.client.request.duration")
                .with_description("Call duration in seconds")
                .build(),
            errors_total: meter
                .u64_counter("zapi.client.errors.total")
                .with_description("Total number of failed calls")
                .build(),
            api_errors_total: meter
                .u64_counter("zapi.client.api_errors.total")
                .with_description("Total number of API errors returned by the server")
                .build(),
            gate_wait: meter
                .f64_histogram("zapi.client.gate.wait")
                .with_description("Seconds spent waiting for the concurrency gate")
                .build(),
        }
    }

    /// Record a finished call
    pub fn record_request(&self, method: &str, status: &str, duration: Duration) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("status", status.to_string()),
        ];
        self.requests_total.add(1, attributes);
        self.request_duration
            .record(duration.as_secs_f64(), attributes);
    }

    /// Record a failed call
    pub fn record_error(&self, error: &Error) {
        self.errors_total
            .add(1, &[KeyValue::new("error_type", error.kind())]);
        if let Some(code) = error.api_code() {
            self.record_api_error(code);
        }
    }

    /// Record an API error, whether surfaced as an error or returned as data
    pub fn record_api_error(&self, code: i32) {
        self.api_errors_total
            .add(1, &[KeyValue::new("code", i64::from(code))]);
    }

    /// Record time spent waiting for the gate
    pub fn record_gate_wait(&self, waited: Duration) {
        self.gate_wait.record(waited.as_secs_f64(), &[]);
    }
}

impl std::fmt::Debug for ClientMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientMetrics").finish_non_exhaustive()
    }
}
