//! Shared test infrastructure
//!
//! `MockTransport` stands in for the HTTP layer: it decodes every request,
//! records it, asks a handler for a reply and echoes the request id back the
//! way a real server does. It also logs `enter <id>` / `exit <id>` events so
//! tests can check how exchanges overlap.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zapi_client::{ClientBuilder, InboundResponse, OutboundRequest, Transport, ZabbixClient};
use zapi_core::{codec, Result};

pub const TEST_URL: &str = "http://zabbix.test/api_jsonrpc.php";
pub const GOOD_PASSWORD: &str = "zabbix";

/// One request as the mock server saw it
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub id: i32,
    pub method: String,
    pub params: Value,
    /// Envelope `auth` member (empty when absent)
    pub envelope_auth: String,
    /// Token from the `Authorization: Bearer` header
    pub bearer: Option<String>,
    /// Serialized request body
    pub body: String,
}

/// What the mock server answers
pub enum Reply {
    /// `{"result": value}`
    Result(Value),
    /// `{"error": {...}}`
    Error(i32, &'static str, &'static str),
    /// Result with an id that does not match the request
    WrongId(Value),
    /// Body sent verbatim
    Raw(String),
}

impl Reply {
    fn into_body(self, id: i32) -> Vec<u8> {
        let value = match self {
            Reply::Result(result) => json!({"jsonrpc": "2.0", "result": result, "id": id}),
            Reply::Error(code, message, data) => json!({
                "jsonrpc": "2.0",
                "error": {"code": code, "message": message, "data": data},
                "id": id
            }),
            Reply::WrongId(result) => json!({"jsonrpc": "2.0", "result": result, "id": id + 100}),
            Reply::Raw(body) => return body.into_bytes(),
        };
        serde_json::to_vec(&value).unwrap()
    }
}

type Handler = dyn Fn(&RecordedCall) -> Reply + Send + Sync;

pub struct MockTransport {
    handler: Box<Handler>,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
    events: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new(handler: impl Fn(&RecordedCall) -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Self::with_delay(handler, None)
    }

    /// Each exchange sleeps for `delay` between receiving and answering
    pub fn with_delay(
        handler: impl Fn(&RecordedCall) -> Reply + Send + Sync + 'static,
        delay: Option<Duration>,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            delay,
            calls: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        })
    }

    /// A server reporting `version` with the default method table
    pub fn zabbix(version: &'static str) -> Arc<Self> {
        Self::new(zabbix_handler(version))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls().pop().expect("no calls recorded")
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
        self.events.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, request: OutboundRequest) -> Result<InboundResponse> {
        let envelope = codec::decode_request(&request.body)?;
        let call = RecordedCall {
            id: envelope.id,
            method: envelope.method,
            params: envelope.params,
            envelope_auth: envelope.auth,
            bearer: request.bearer_token().map(str::to_string),
            body: String::from_utf8_lossy(&request.body).into_owned(),
        };

        self.events.lock().unwrap().push(format!("enter {}", call.id));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let id = call.id;
        let reply = (self.handler)(&call);
        self.calls.lock().unwrap().push(call);
        self.events.lock().unwrap().push(format!("exit {}", id));

        Ok(InboundResponse {
            status: 200,
            body: reply.into_body(id),
        })
    }
}

/// Default method table
///
/// - `apiinfo.version` answers `version`
/// - `user.login` accepts [`GOOD_PASSWORD`] under either user key and
///   returns `token-<name>`
/// - `user.logout` answers `true`
/// - anything else echoes its params
pub fn zabbix_handler(version: &'static str) -> impl Fn(&RecordedCall) -> Reply + Send + Sync {
    move |call: &RecordedCall| match call.method.as_str() {
        "apiinfo.version" => Reply::Result(json!(version)),
        "user.login" => {
            let name = call.params["username"]
                .as_str()
                .or_else(|| call.params["user"].as_str())
                .unwrap_or_default();
            if call.params["password"] == GOOD_PASSWORD {
                Reply::Result(json!(format!("token-{}", name)))
            } else {
                Reply::Error(
                    -32500,
                    "Application error.",
                    "Incorrect user name or password or account is temporarily blocked.",
                )
            }
        }
        "user.logout" => Reply::Result(json!(true)),
        _ => Reply::Result(call.params.clone()),
    }
}

pub async fn connect(transport: &Arc<MockTransport>) -> ZabbixClient {
    ClientBuilder::new(TEST_URL)
        .transport(transport.clone())
        .connect()
        .await
        .expect("connect failed")
}

pub async fn connect_serialized(transport: &Arc<MockTransport>) -> ZabbixClient {
    ClientBuilder::new(TEST_URL)
        .transport(transport.clone())
        .serialize(true)
        .connect()
        .await
        .expect("connect failed")
}
