//! Router-level tests: real routing, method fallbacks and JSON rejections.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use dropship_api::auth::StaticSessions;
use dropship_api::{ApiState, build_router};
use dropship_deploy::{Orchestrator, SimulatedDeployer};
use dropship_state::HistoryStore;

fn app() -> Router {
    let deployer = SimulatedDeployer::new(Duration::ZERO, "example.com");
    let sessions = StaticSessions::new(HashMap::from([(
        "t0ken".to_string(),
        "alice".to_string(),
    )]));
    build_router(ApiState::new(
        Orchestrator::new(Arc::new(deployer)),
        HistoryStore::open_in_memory().unwrap(),
        Arc::new(sessions),
    ))
}

fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn deploy_python_in_simulation() {
    let body = json!({ "code": "def main():\n    print(\"hi\")\n" }).to_string();
    let (status, body) = send(app(), json_request(Method::POST, "/api/deploy", &body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "Python");
    let url = body["liveUrl"].as_str().unwrap();
    let id = body["deploymentId"].as_str().unwrap();
    assert_eq!(url, format!("https://python-app-{id}.example.com"));
}

#[tokio::test]
async fn deploy_javascript_in_simulation() {
    let body = json!({ "code": "const x = 1;\nconsole.log(x);" }).to_string();
    let (status, body) = send(app(), json_request(Method::POST, "/api/deploy", &body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "JavaScript");
    assert!(
        body["liveUrl"]
            .as_str()
            .unwrap()
            .starts_with("https://javascript-app-")
    );
}

#[tokio::test]
async fn deploy_empty_body_fields() {
    for payload in [r#"{}"#, r#"{"code":""}"#, r#"{"code":null}"#] {
        let (status, body) = send(app(), json_request(Method::POST, "/api/deploy", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body["message"], "No code provided");
    }
}

#[tokio::test]
async fn deploy_malformed_json() {
    let (status, body) = send(app(), json_request(Method::POST, "/api/deploy", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body: ")
    );
}

#[tokio::test]
async fn deploy_rejects_get() {
    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/deploy")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "Method not allowed");
}

#[tokio::test]
async fn deployments_history_flow() {
    let app = app();

    let unauthorized = Request::builder()
        .uri("/api/deployments")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app.clone(), unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let record = json!({
        "deploymentId": "abc123",
        "code": "print(1)",
        "language": "Python",
        "liveUrl": "https://python-app-abc123.example.com"
    })
    .to_string();
    let create = Request::builder()
        .method(Method::POST)
        .uri("/api/deployments")
        .header("content-type", "application/json")
        .header("authorization", "Bearer t0ken")
        .body(Body::from(record))
        .unwrap();
    let (status, created) = send(app.clone(), create).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "active");

    let list = Request::builder()
        .uri("/api/deployments")
        .header("authorization", "Bearer t0ken")
        .body(Body::empty())
        .unwrap();
    let (status, list) = send(app.clone(), list).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["deploymentId"], "abc123");

    let delete = Request::builder()
        .method(Method::DELETE)
        .uri("/api/deployments")
        .header("authorization", "Bearer t0ken")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, delete).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn docs_are_served() {
    let req = Request::builder()
        .uri("/api/docs")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"][0]["path"], "/api/deploy");
}
