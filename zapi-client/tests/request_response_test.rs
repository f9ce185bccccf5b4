//! Request/response tests
//!
//! The three call styles, correlation ids and the trace sink.

mod common;

use common::{connect, MockTransport, RecordedCall, Reply, TEST_URL};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use zapi_client::{ClientBuilder, TraceSink};
use zapi_core::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Host {
    hostid: String,
    host: String,
    #[serde(default)]
    interfaces: Vec<Interface>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Interface {
    ip: String,
    port: String,
}

fn hosts_server() -> Arc<MockTransport> {
    MockTransport::new(|call: &RecordedCall| match call.method.as_str() {
        "apiinfo.version" => Reply::Result(json!("6.0.0")),
        "host.get" => Reply::Result(json!([
            {"hostid": "10084", "host": "Zabbix server",
             "interfaces": [{"ip": "127.0.0.1", "port": "10050"}]},
            {"hostid": "10085", "host": "web-01", "interfaces": []}
        ])),
        "host.delete" => Reply::Error(-32500, "Application error.", "No permissions to referred object or it does not exist!"),
        _ => Reply::Result(call.params.clone()),
    })
}

#[tokio::test]
async fn test_raw_call_returns_result() {
    let transport = hosts_server();
    let client = connect(&transport).await;

    let response = client
        .call("host.get", json!({"output": ["hostid", "host"]}))
        .await
        .unwrap();

    assert!(!response.is_error());
    assert_eq!(response.jsonrpc, "2.0");
    assert_eq!(response.result[0]["hostid"], "10084");
    assert_eq!(response.id, Some(client.last_request_id()));

    let sent = transport.last_call();
    assert_eq!(sent.method, "host.get");
    assert_eq!(sent.params, json!({"output": ["hostid", "host"]}));
}

#[tokio::test]
async fn test_raw_call_keeps_api_error_as_data() {
    let transport = hosts_server();
    let client = connect(&transport).await;

    let response = client.call("host.delete", json!(["1"])).await.unwrap();

    assert!(response.is_error());
    let error = response.error.unwrap();
    assert_eq!(error.code, -32500);
    assert_eq!(error.message, "Application error.");
    assert!(error.data.starts_with("No permissions"));
}

#[tokio::test]
async fn test_checked_call_promotes_api_error() {
    let transport = hosts_server();
    let client = connect(&transport).await;

    let err = client.call_checked("host.delete", json!(["1"])).await.unwrap_err();

    assert_eq!(err.api_code(), Some(-32500));
    let message = err.to_string();
    assert!(message.contains("-32500"));
    assert!(message.contains("Application error."));
    assert!(message.contains("No permissions"));
}

#[tokio::test]
async fn test_checked_call_success() {
    let transport = hosts_server();
    let client = connect(&transport).await;

    let response = client.call_checked("host.get", json!({})).await.unwrap();
    assert!(response.error.is_none());
    assert_eq!(response.result.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_typed_call_decodes_structs() {
    let transport = hosts_server();
    let client = connect(&transport).await;

    let hosts: Vec<Host> = client.call_typed("host.get", json!({})).await.unwrap();

    assert_eq!(
        hosts,
        vec![
            Host {
                hostid: "10084".into(),
                host: "Zabbix server".into(),
                interfaces: vec![Interface {
                    ip: "127.0.0.1".into(),
                    port: "10050".into(),
                }],
            },
            Host {
                hostid: "10085".into(),
                host: "web-01".into(),
                interfaces: vec![],
            },
        ]
    );
}

#[tokio::test]
async fn test_typed_call_api_error() {
    let transport = hosts_server();
    let client = connect(&transport).await;

    let result: zapi_core::Result<Value> = client.call_typed("host.delete", json!(["1"])).await;
    assert!(matches!(result, Err(Error::Api(ref e)) if e.code == -32500));
}

#[tokio::test]
async fn test_typed_call_shape_mismatch_is_decode_error() {
    let transport = hosts_server();
    let client = connect(&transport).await;

    let result: zapi_core::Result<Vec<u32>> = client.call_typed("host.get", json!({})).await;
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[tokio::test]
async fn test_typed_params_from_struct() {
    let transport = hosts_server();
    let client = connect(&transport).await;

    let host = Host {
        hostid: "1".into(),
        host: "db-01".into(),
        interfaces: vec![],
    };
    let echoed: Host = client.call_typed("host.update", &host).await.unwrap();

    assert_eq!(echoed, host);
    assert_eq!(transport.last_call().params["host"], "db-01");
}

#[tokio::test]
async fn test_ids_strictly_increase() {
    let transport = hosts_server();
    let client = connect(&transport).await;

    for _ in 0..4 {
        client.call("host.get", json!({})).await.unwrap();
    }
    let _ = client.call_checked("host.delete", json!([])).await;
    let _: Vec<Host> = client.call_typed("host.get", json!({})).await.unwrap();

    let ids: Vec<i32> = transport.calls().iter().map(|c| c.id).collect();
    // Version negotiation took id 1
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(client.last_request_id(), 7);
}

#[tokio::test]
async fn test_mismatched_response_id() {
    let transport = MockTransport::new(|call: &RecordedCall| match call.method.as_str() {
        "apiinfo.version" => Reply::Result(json!("6.0.0")),
        _ => Reply::WrongId(json!([])),
    });
    let client = connect(&transport).await;

    let err = client.call("host.get", json!({})).await.unwrap_err();
    assert!(matches!(err, Error::IdMismatch { expected: 2, actual: 102 }));

    let typed: zapi_core::Result<Vec<Host>> = client.call_typed("host.get", json!({})).await;
    assert!(matches!(typed, Err(Error::IdMismatch { expected: 3, .. })));
}

#[tokio::test]
async fn test_null_response_id_accepted() {
    let transport = MockTransport::new(|call: &RecordedCall| match call.method.as_str() {
        "apiinfo.version" => Reply::Result(json!("6.0.0")),
        _ => Reply::Raw(
            r#"{"jsonrpc":"2.0","error":{"code":-32700,"message":"Parse error.","data":"Invalid JSON."},"id":null}"#
                .to_string(),
        ),
    });
    let client = connect(&transport).await;

    let response = client.call("host.get", json!({})).await.unwrap();
    assert_eq!(response.id, None);
    assert_eq!(response.error.map(|e| e.code), Some(-32700));
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let transport = MockTransport::new(|call: &RecordedCall| match call.method.as_str() {
        "apiinfo.version" => Reply::Result(json!("6.0.0")),
        _ => Reply::Raw("<html><body>502 Bad Gateway</body></html>".to_string()),
    });
    let client = connect(&transport).await;

    let err = client.call_checked("host.get", json!({})).await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert_eq!(err.api_code(), None);
}

#[tokio::test]
async fn test_unauthenticated_request_has_no_auth_member() {
    let transport = hosts_server();
    let client = connect(&transport).await;

    client.call("host.get", json!({})).await.unwrap();

    let body: Value = serde_json::from_str(&transport.last_call().body).unwrap();
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["method"], "host.get");
    assert!(body.get("auth").is_none());
    assert!(body["id"].is_i64());
}

#[derive(Default)]
struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl TraceSink for RecordingSink {
    fn request(&self, id: i32, method: &str, body: &[u8]) {
        self.lines.lock().unwrap().push(format!(
            "request {} {} {}",
            id,
            method,
            String::from_utf8_lossy(body)
        ));
    }

    fn response(&self, id: i32, status: u16, body: &[u8]) {
        self.lines.lock().unwrap().push(format!(
            "response {} {} {}",
            id,
            status,
            String::from_utf8_lossy(body)
        ));
    }

    fn failure(&self, id: i32, error: &Error) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("failure {} {}", id, error));
    }

    fn warning(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("warning {}", message));
    }
}

#[tokio::test]
async fn test_trace_sink_sees_bodies() {
    let transport = hosts_server();
    let sink = Arc::new(RecordingSink::default());
    let client = ClientBuilder::new(TEST_URL)
        .transport(transport)
        .trace_sink(sink.clone())
        .connect()
        .await
        .unwrap();

    client.call("host.get", json!({"limit": 1})).await.unwrap();

    let lines = sink.lines.lock().unwrap().clone();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("request 1 apiinfo.version"));
    assert!(lines[1].starts_with("response 1 200"));
    assert!(lines[1].contains("6.0.0"));
    assert!(lines[2].starts_with("request 2 host.get"));
    assert!(lines[2].contains(r#""limit":1"#));
    assert!(lines[3].starts_with("response 2 200"));
}

#[tokio::test]
async fn test_trace_sink_receives_tls_warning() {
    let transport = hosts_server();
    let sink = Arc::new(RecordingSink::default());
    let _client = ClientBuilder::new(TEST_URL)
        .transport(transport)
        .skip_tls_verify(true)
        .trace_sink(sink.clone())
        .connect()
        .await
        .unwrap();

    let lines = sink.lines.lock().unwrap().clone();
    assert!(lines[0].starts_with("warning TLS running in insecure mode"));
}
