//! Transport layer tests — response shaping, route mounting, server lifecycle.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, Bytes, to_bytes};
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use hasura_protocol::HasuraError;
    use hasura_transport::*;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Replies with the request body, or a `bad_request` error when it is empty.
    struct EchoWebhook;

    impl Webhook for EchoWebhook {
        async fn serve(&self, headers: HeaderMap, body: Bytes) -> WebhookResponse {
            if body.is_empty() {
                let err = HasuraError::bad_request("empty body")
                    .with_extension("request_id", json!(request_id(&headers)));
                return WebhookResponse::error(&err);
            }
            WebhookResponse::ok(body)
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────
    // WebhookResponse
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn error_response_is_always_400() {
        for err in [
            HasuraError::bad_request("a"),
            HasuraError::not_found("b"),
            HasuraError::internal("c"),
            HasuraError::unknown("d"),
        ] {
            let resp = WebhookResponse::error(&err);
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert!(!resp.is_success());
        }
    }

    #[test]
    fn ok_response_keeps_body() {
        let resp = WebhookResponse::ok(br#"{"message":"hi"}"#.to_vec());
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body(), br#"{"message":"hi"}"#);
    }

    #[test]
    fn request_id_ignores_empty_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), None);
        headers.insert("x-request-id", "".parse().unwrap());
        assert_eq!(request_id(&headers), None);
        headers.insert("x-request-id", "abc".parse().unwrap());
        assert_eq!(request_id(&headers), Some("abc"));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Routing
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn mounted_webhook_answers_json() {
        let app = mount(Arc::new(EchoWebhook), "/actions");
        let response = app
            .oneshot(
                Request::post("/actions")
                    .body(Body::from(r#"{"message":"hi"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_json(response).await, json!({"message": "hi"}));
    }

    #[tokio::test]
    async fn mounted_webhook_accepts_any_method() {
        let app = mount(Arc::new(EchoWebhook), "/events");
        let response = app
            .oneshot(
                Request::put("/events")
                    .header("x-request-id", "req-7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "bad_request");
        assert_eq!(body["extensions"]["request_id"], "req-7");
    }

    #[tokio::test]
    async fn mounted_webhook_accepts_large_bodies() {
        let app = mount(Arc::new(EchoWebhook), "/events");
        let payload = json!({"rows": "r".repeat(3 * 1024 * 1024)}).to_string();
        let response = app
            .oneshot(
                Request::post("/events")
                    .body(Body::from(payload.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.len(), payload.len());
    }

    // ─────────────────────────────────────────────────────────────────────
    // WebhookServer
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn server_serves_routes_and_health() {
        let config = ServerConfig {
            port: 0,
            hostname: "127.0.0.1".into(),
            enable_cors: true,
        };
        let mut server = WebhookServer::start(config, mount(Arc::new(EchoWebhook), "/crons"))
            .await
            .unwrap();
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
            .post(format!("{base}/crons"))
            .body(r#"{"ok":true}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"ok": true}));

        server.stop().await;
    }

    #[tokio::test]
    async fn server_rejects_invalid_hostname() {
        let config = ServerConfig {
            port: 0,
            hostname: "not a host".into(),
            enable_cors: false,
        };
        let result = WebhookServer::start(config, mount(Arc::new(EchoWebhook), "/x")).await;
        assert!(matches!(result, Err(TransportError::InvalidAddress(_))));
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 9001);
        assert_eq!(config.hostname, "0.0.0.0");
        assert!(!config.enable_cors);
    }
}
