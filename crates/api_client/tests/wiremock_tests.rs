//! Integration tests for the transport client using wiremock
//!
//! A small test surface drives the generic dispatch path against a mock
//! server: auth injection, status handling, decoding and both call styles.

use std::time::Duration;

use api_client::{
    ApiClient, ApiKeyAuth, ApiSurface, Call, ConfigError, OperationDescriptor, RequestParts,
    TransportError,
};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param, query_param_is_missing},
};

const ECHO: OperationDescriptor = OperationDescriptor::get("echo", "/echo/v1");
const SUBMIT: OperationDescriptor = OperationDescriptor::post("submit", "/submit/v1");
const STATUS: OperationDescriptor = OperationDescriptor::get("status", "/status").requires(&[]);

#[derive(Debug, Deserialize, PartialEq)]
struct Echo {
    value: String,
}

#[derive(Debug, Serialize)]
struct Submission<'a> {
    id: &'a str,
    points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
struct EchoApi {
    client: ApiClient,
}

impl ApiSurface for EchoApi {
    const NAME: &'static str = "EchoApi";

    fn operations() -> &'static [OperationDescriptor] {
        &[ECHO, SUBMIT, STATUS]
    }

    fn bind(client: ApiClient) -> Self {
        Self { client }
    }
}

impl EchoApi {
    fn echo(&self, value: &str) -> Call<Echo> {
        self.client
            .invoke(&ECHO, RequestParts::new().query("value", value))
    }

    fn submit(&self, submission: &Submission<'_>) -> Call<Echo> {
        self.client
            .invoke(&SUBMIT, RequestParts::new().json(submission))
    }

    fn status(&self) -> Call<Echo> {
        self.client.invoke(&STATUS, RequestParts::new())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn create_test_api(mock_server: &MockServer) -> EchoApi {
    ApiClient::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_secs(5))
        .api_key(ApiKeyAuth::query("test-key"))
        .build()
        .expect("Failed to create client")
        .create_service::<EchoApi>()
        .expect("Failed to bind service")
}

// ============================================================================
// Auth injection
// ============================================================================

#[tokio::test]
async fn test_query_api_key_is_attached() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/echo/v1"))
        .and(query_param("value", "hello"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": "hello"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server);
    let response = api.echo("hello").await;

    assert!(response.is_ok(), "Expected success, got: {response:?}");
    let response = response.unwrap();
    assert!(response.is_successful());
    assert_eq!(response.body().unwrap().value, "hello");
}

#[tokio::test]
async fn test_header_api_key_is_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/echo/v1"))
        .and(header("X-Api-Key", "header-key"))
        .and(query_param_is_missing("api_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": "h"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = ApiClient::builder()
        .base_url(mock_server.uri())
        .api_key(ApiKeyAuth::header("X-Api-Key", "header-key"))
        .build()
        .unwrap()
        .create_service::<EchoApi>()
        .unwrap();

    let response = api.echo("h").await.unwrap();
    assert_eq!(response.code(), 200);
}

#[tokio::test]
async fn test_operation_without_auth_sends_no_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .and(query_param_is_missing("api_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": "up"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server);
    let response = api.status().await.unwrap();
    assert_eq!(response.into_body().unwrap().value, "up");
}

#[test]
fn test_missing_auth_strategy_fails_before_any_request() {
    let client = ApiClient::new("http://127.0.0.1:9").unwrap();
    let result = client.create_service::<EchoApi>();
    assert!(matches!(
        result,
        Err(ConfigError::MissingAuthStrategy { surface: "EchoApi", operation: "echo", .. })
    ));
}

// ============================================================================
// Bodies and statuses
// ============================================================================

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submit/v1"))
        .and(query_param("api_key", "test-key"))
        .and(body_json(serde_json::json!({
            "id": "Seoul",
            "points": [[37.56, 126.99]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server);
    let submission = Submission {
        id: "Seoul",
        points: vec![[37.56, 126.99]],
    };
    let response = api.submit(&submission).await.unwrap();
    assert!(response.is_successful());
}

#[tokio::test]
async fn test_not_found_is_a_response_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/echo/v1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"error\":\"no match\"}"))
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server);
    let response = tokio_test::assert_ok!(api.echo("missing").await);

    assert!(!response.is_successful());
    assert_eq!(response.code(), 404);
    assert!(response.body().is_none());
    assert_eq!(response.error_body(), Some("{\"error\":\"no match\"}"));

    let remote = response.into_result().unwrap_err();
    assert_eq!(remote.status, 404);
}

#[tokio::test]
async fn test_unauthorized_is_a_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/echo/v1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server);
    let response = api.echo("x").await.unwrap();
    assert_eq!(response.code(), 401);
    assert!(response.error_body().is_none());
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/echo/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server);
    let result = api.echo("x").await;

    assert!(
        matches!(result, Err(TransportError::Decode { status: 200, .. })),
        "Expected Decode error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_no_content_is_an_empty_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/echo/v1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server);
    let response = api.echo("x").await.unwrap();

    assert!(response.is_successful());
    assert_eq!(response.code(), 204);
    assert!(response.body().is_none());
    assert!(response.error_body().is_none());
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let api = ApiClient::builder()
        .base_url(format!("http://127.0.0.1:{port}"))
        .api_key(ApiKeyAuth::query("k"))
        .build()
        .unwrap()
        .create_service::<EchoApi>()
        .unwrap();

    let err = api.echo("x").await.unwrap_err();
    assert!(
        matches!(err, TransportError::ConnectionFailed(_)),
        "Expected ConnectionFailed, got: {err:?}"
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/echo/v1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"value": "late"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let api = ApiClient::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(500))
        .connect_timeout(Duration::from_millis(500))
        .api_key(ApiKeyAuth::query("k"))
        .build()
        .unwrap()
        .create_service::<EchoApi>()
        .unwrap();

    let err = api.echo("x").await.unwrap_err();
    assert!(
        matches!(err, TransportError::Timeout { timeout: Some(t) } if t == Duration::from_millis(500)),
        "Expected 500ms timeout, got: {err:?}"
    );
    assert_eq!(err.to_string(), "Request timed out after 500ms");
}

#[tokio::test]
async fn test_prebuilt_http_client_timeout_is_not_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/echo/v1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"value": "late"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let api = ApiClient::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_secs(60))
        .http_client(http)
        .api_key(ApiKeyAuth::query("k"))
        .build()
        .unwrap()
        .create_service::<EchoApi>()
        .unwrap();

    let err = api.echo("x").await.unwrap_err();
    assert!(
        matches!(err, TransportError::Timeout { timeout: None }),
        "Expected timeout without a reported limit, got: {err:?}"
    );
}

// ============================================================================
// Call styles
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_execute_from_plain_thread() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/echo/v1"))
        .and(query_param("value", "blocking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": "blocking"})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server);
    let handle = std::thread::spawn(move || {
        let first = api.echo("blocking").execute();
        let second = api.echo("blocking").execute();
        (first, second)
    });
    let (first, second) = handle.join().unwrap();

    assert_eq!(first.unwrap().into_body().unwrap().value, "blocking");
    assert_eq!(second.unwrap().into_body().unwrap().value, "blocking");
}

#[tokio::test]
async fn test_execute_inside_async_context_is_rejected() {
    let mock_server = MockServer::start().await;
    let api = create_test_api(&mock_server);

    let result = api.echo("x").execute();
    assert!(matches!(result, Err(TransportError::Runtime(_))));
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/echo/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": "c"})))
        .expect(8)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server);
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let api = api.clone();
            tokio::spawn(async move { api.echo(&i.to_string()).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert!(response.is_successful());
    }
}

#[tokio::test]
async fn test_call_is_lazy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server);
    let call = api.echo("never-sent");
    assert_eq!(call.operation().id, "echo");
    assert_eq!(call.parts().query_pairs().len(), 1);
    drop(call);
}
