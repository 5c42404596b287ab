//! End-to-end integration tests — the demo routers served by a running
//! `WebhookServer`, exercised over real HTTP.

use hasura_router_server::demo;
use hasura_transport::{ServerConfig, WebhookServer};
use serde_json::{Value, json};

/// Start the demo server on an OS-assigned port.
async fn start_test_server() -> WebhookServer {
    let config = ServerConfig {
        port: 0,
        hostname: "127.0.0.1".into(),
        enable_cors: false,
    };
    WebhookServer::start(config, demo::routes(false).unwrap())
        .await
        .unwrap()
}

async fn post(server: &WebhookServer, path: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}{path}", server.port()))
        .header("x-request-id", "it-req")
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.json::<Value>().await.unwrap();
    (status, body)
}

fn action(name: &str, session: Value, input: Value) -> Value {
    json!({
        "action": {"name": name},
        "input": input,
        "session_variables": session,
        "request_query": "mutation { goHello(message: \"hi\") { message } }",
    })
}

fn event(trigger: &str) -> Value {
    json!({
        "event": {
            "session_variables": {"x-hasura-role": "admin"},
            "op": "UPDATE",
            "data": {"old": {"id": 1}, "new": {"id": 1, "name": "ada"}},
        },
        "created_at": "2024-01-01T00:00:00Z",
        "id": "85558393-c75d-4d2f-9c15-e80591b83894",
        "trigger": {"name": trigger},
        "table": {"schema": "public", "name": "users"},
        "delivery_info": {"max_retries": 0, "current_retry": 0},
    })
}

fn cron(name: &str) -> Value {
    json!({
        "id": "d2b4f5a0-0000-4000-8000-000000000000",
        "name": name,
        "scheduled_time": "2024-06-01T00:00:00Z",
        "payload": {},
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_action_hello() {
    let mut server = start_test_server().await;

    let (status, body) = post(
        &server,
        "/actions",
        action("goHello", json!({"x-hasura-role": "user"}), json!({"message": "hi"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "hi"}));

    server.stop().await;
}

#[tokio::test]
async fn test_action_failure() {
    let mut server = start_test_server().await;

    let (status, body) = post(
        &server,
        "/actions",
        action("goFailure", json!({"x-hasura-role": "user"}), json!({})),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({"code": "action_failure", "message": "fail action"}));

    server.stop().await;
}

#[tokio::test]
async fn test_action_requires_role() {
    let mut server = start_test_server().await;

    let (status, body) = post(
        &server,
        "/actions",
        action("goHello", json!({}), json!({"message": "hi"})),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "bad_request");

    server.stop().await;
}

#[tokio::test]
async fn test_action_bad_input_is_unknown() {
    let mut server = start_test_server().await;

    let (status, body) = post(
        &server,
        "/actions",
        action("goHello", json!({"x-hasura-role": "user"}), json!({"message": 42})),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "unknown");

    server.stop().await;
}

#[tokio::test]
async fn test_action_unknown_name() {
    let mut server = start_test_server().await;

    let (status, body) = post(
        &server,
        "/actions",
        action("goNowhere", json!({"x-hasura-role": "user"}), json!({})),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "not_found");

    server.stop().await;
}

// ─────────────────────────────────────────────────────────────────────────────
// Event triggers
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_event_insert() {
    let mut server = start_test_server().await;

    let (status, body) = post(&server, "/events", event("goUserInsert")).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "world!"}));

    let (status, body) = post(&server, "/events", event("goUserUpdate")).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({"code": "event_failure", "message": "fail event"}));

    let (status, body) = post(&server, "/events", event("goUserDelete")).await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "bad_request");

    server.stop().await;
}

// ─────────────────────────────────────────────────────────────────────────────
// Cron triggers
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_cron_events() {
    let mut server = start_test_server().await;

    let (status, body) = post(&server, "/crons", cron("goCronSuccess")).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "success!"}));

    let (status, body) = post(&server, "/crons", cron("goCronFailure")).await;
    assert_eq!(status, 400);
    assert_eq!(
        body,
        json!({"code": "bad_request", "message": "error in executing event: fail cron event"})
    );

    server.stop().await;
}

// ─────────────────────────────────────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_and_malformed_body() {
    let mut server = start_test_server().await;
    let base = format!("http://127.0.0.1:{}", server.port());
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{base}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let resp = client
        .post(format!("{base}/actions"))
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "bad_request");

    server.stop().await;
}

#[tokio::test]
async fn test_server_stops() {
    let mut server = start_test_server().await;
    let port = server.port();
    server.stop().await;

    let result = reqwest::Client::new()
        .get(format!("http://127.0.0.1:{port}/health"))
        .send()
        .await;
    assert!(result.is_err());
}
