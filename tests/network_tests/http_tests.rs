//! HTTP Tests
//!
//! Tests verify:
//! - Request body decoding and the update request shape
//! - Status codes and messages for each outcome
//! - The client library against a live server
//!
//! Each test serves a fresh in-memory store on an ephemeral port.

use std::sync::Arc;

use partdb::config::Config;
use partdb::network::Server;
use partdb::protocol::{
    decode_request, messages, JsonMessage, ListCompatibleRequest, ReadRequest, UpdateRequest,
};
use partdb::store::MemoryStore;
use partdb::{FieldUpdate, PartError, PartsClient, PartsService, RobotPart};
use reqwest::StatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

// =============================================================================
// Helper Functions
// =============================================================================

struct TestServer {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let service = PartsService::new(Arc::new(MemoryStore::new()));
        let server = Server::new(Config::builder().in_memory(true).build(), service);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            server
                .serve(listener, async move {
                    let _ = rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            shutdown: Some(tx),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn client(&self) -> PartsClient {
        PartsClient::new(self.base_url.clone())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn part(serial: &str, compatibilities: &[&str]) -> RobotPart {
    RobotPart::new(
        format!("Part{}", serial),
        serial,
        "Manu",
        1000,
        compatibilities.iter().map(|s| s.to_string()).collect(),
    )
}

async fn post_raw(server: &TestServer, endpoint: &str, body: &str) -> (StatusCode, JsonMessage) {
    let response = reqwest::Client::new()
        .post(server.url(endpoint))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json::<JsonMessage>().await.unwrap())
}

// =============================================================================
// Request Decoding Tests
// =============================================================================

#[test]
fn test_decode_read_request() {
    let req: ReadRequest = decode_request(br#"{"serialNumber":"7"}"#).unwrap();
    assert_eq!(req.serial_number, "7");
}

#[test]
fn test_decode_ignores_unknown_keys() {
    let req: ReadRequest = decode_request(br#"{"serialNumber":"7","extra":1}"#).unwrap();
    assert_eq!(req.serial_number, "7");
}

#[test]
fn test_decode_failures_are_protocol_errors() {
    assert!(matches!(
        decode_request::<ReadRequest>(b"{not json"),
        Err(PartError::Protocol(_))
    ));
    assert!(matches!(
        decode_request::<ReadRequest>(br#"{"serial":"7"}"#),
        Err(PartError::Protocol(_))
    ));
    assert!(matches!(
        decode_request::<RobotPart>(br#"{"name":"x","serialNumber":"1"}"#),
        Err(PartError::Protocol(_))
    ));
}

#[test]
fn test_list_compatible_negative_limit() {
    let req: ListCompatibleRequest =
        decode_request(br#"{"serialNumber":"1","number":-4}"#).unwrap();
    assert_eq!(req.limit(), 0);
}

#[test]
fn test_update_request_shape() {
    let req = UpdateRequest::new("1", &FieldUpdate::Weight(2000));
    let value = serde_json::to_value(&req).unwrap();

    assert_eq!(
        value,
        json!({
            "originalSerialNumber": "1",
            "fieldToUpdate": "weight",
            "valueOfField": 2000
        })
    );

    let (serial, update) = req.into_update().unwrap();
    assert_eq!(serial, "1");
    assert_eq!(update, FieldUpdate::Weight(2000));
}

// =============================================================================
// Status Code Tests
// =============================================================================

#[tokio::test]
async fn test_add_and_duplicate() {
    let server = TestServer::start().await;
    let body = serde_json::to_string(&part("1", &[])).unwrap();

    let (status, msg) = post_raw(&server, "/add", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(msg.message, messages::OK);

    let (status, msg) = post_raw(&server, "/add", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg.message, messages::ALREADY_EXISTS);
}

#[tokio::test]
async fn test_malformed_bodies_are_unprocessable() {
    let server = TestServer::start().await;

    for (endpoint, body) in [
        ("/add", "{not json"),
        ("/add", r#"{"name":"x"}"#),
        ("/read", r#"{"serial":"1"}"#),
        ("/update", r#"{"originalSerialNumber":"1"}"#),
        ("/delete", "[]"),
        ("/list-compatible", r#"{"serialNumber":"1","number":"three"}"#),
    ] {
        let (status, msg) = post_raw(&server, endpoint, body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{} {}", endpoint, body);
        assert_eq!(msg.message, messages::UNPROCESSABLE);
    }
}

#[tokio::test]
async fn test_read_missing_is_not_found() {
    let server = TestServer::start().await;

    let (status, msg) = post_raw(&server, "/read", r#"{"serialNumber":"42"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(msg.message, messages::NOT_FOUND);
}

#[tokio::test]
async fn test_update_bad_requests() {
    let server = TestServer::start().await;
    let body = serde_json::to_string(&part("1", &[])).unwrap();
    post_raw(&server, "/add", &body).await;
    post_raw(&server, "/add", &serde_json::to_string(&part("2", &[])).unwrap()).await;

    let unknown = json!({
        "originalSerialNumber": "1",
        "fieldToUpdate": "color",
        "valueOfField": "red"
    });
    let (status, msg) = post_raw(&server, "/update", &unknown.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg.message, "Bad request. Unrecognized field.");

    let mistyped = json!({
        "originalSerialNumber": "1",
        "fieldToUpdate": "weight",
        "valueOfField": "heavy"
    });
    let (status, _) = post_raw(&server, "/update", &mistyped.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let conflict = json!({
        "originalSerialNumber": "1",
        "fieldToUpdate": "serialNumber",
        "valueOfField": "2"
    });
    let (status, msg) = post_raw(&server, "/update", &conflict.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(msg.message, messages::SERIAL_CONFLICT);

    let missing = json!({
        "originalSerialNumber": "42",
        "fieldToUpdate": "name",
        "valueOfField": "x"
    });
    let (status, msg) = post_raw(&server, "/update", &missing.to_string()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(msg.message, messages::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_is_ok() {
    let server = TestServer::start().await;

    let (status, msg) = post_raw(&server, "/delete", r#"{"serialNumber":"42"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(msg.message, messages::OK);
}

#[tokio::test]
async fn test_list_all_is_get() {
    let server = TestServer::start().await;
    post_raw(&server, "/add", &serde_json::to_string(&part("1", &[])).unwrap()).await;

    let parts: Vec<RobotPart> = reqwest::get(server.url("/list-all"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(parts, vec![part("1", &[])]);
}

// =============================================================================
// Client Tests
// =============================================================================

#[tokio::test]
async fn test_client_round_trip() {
    let server = TestServer::start().await;
    let client = server.client();

    client.add(&part("1", &["2"])).await.unwrap();
    client.add(&part("2", &["1"])).await.unwrap();

    assert_eq!(client.read("1").await.unwrap(), part("1", &["2"]));

    client.update_weight("1", 1500).await.unwrap();
    client.update_name("1", "Torso").await.unwrap();
    let updated = client.read("1").await.unwrap();
    assert_eq!(updated.weight, 1500);
    assert_eq!(updated.name, "Torso");

    let compatible = client.list_compatible("1", 5).await.unwrap();
    assert_eq!(compatible, vec![part("2", &["1"])]);
}

#[tokio::test]
async fn test_client_surfaces_server_errors() {
    let server = TestServer::start().await;
    let client = server.client();
    client.add(&part("1", &[])).await.unwrap();

    match client.add(&part("1", &[])).await {
        Err(PartError::Remote { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, messages::ALREADY_EXISTS);
        }
        other => panic!("Expected Remote error, got {:?}", other),
    }

    match client.read("42").await {
        Err(PartError::Remote { status, .. }) => assert_eq!(status, 404),
        other => panic!("Expected Remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_unreachable_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = PartsClient::new(format!("http://{}/", addr));
    assert_eq!(client.base_url(), format!("http://{}", addr));
    assert!(matches!(
        client.list_all().await,
        Err(PartError::Network(_))
    ));
}
