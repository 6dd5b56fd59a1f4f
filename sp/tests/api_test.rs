//! HTTP API tests
//!
//! Drive the router in-process with a scripted model client.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use smartplanner::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use smartplanner::{AppState, PlanService, PromptLoader, router};

const ORIGIN: &str = "http://localhost:3001";

/// Replays scripted replies; `Err(status)` becomes an API error
struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, u16>>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn new(replies: Vec<Result<String, u16>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(CompletionResponse::text(text)),
            Some(Err(status)) => Err(LlmError::ApiError {
                status,
                message: "upstream unavailable".to_string(),
            }),
            None => Err(LlmError::InvalidResponse("no scripted reply".to_string())),
        }
    }
}

fn app(client: Arc<ScriptedClient>) -> axum::Router {
    let planner = Arc::new(PlanService::new(client, PromptLoader::embedded_only(), 2048));
    let origins = vec![ORIGIN.to_string(), "http://127.0.0.1:3001".to_string()];
    router(AppState { planner }, &origins).expect("router builds")
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/generate_plan")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn structured_reply() -> String {
    json!({
        "assumptions": "Weekends only",
        "summary": "Three clear steps",
        "variants": {
            "balanced": {
                "tasks": [
                    {"id": "t1", "title": "Choose stack", "description": "Pick tools", "est_hours": 4, "dependencies": [], "risk_score": 2},
                    {"id": "t2", "title": "Build pages", "description": "HTML/CSS", "est_hours": 16, "dependencies": ["t1"], "risk_score": 3},
                    {"id": "t3", "title": "Deploy", "description": "Ship it", "est_hours": 2, "dependencies": ["t2"], "risk_score": 2}
                ],
                "critical_path": ["t1", "t2", "t3"],
                "reasoning": "Steady pace"
            },
            "safe": {
                "tasks": [{"id": "t1", "title": "Choose stack", "est_hours": 6}],
                "critical_path": ["t1"],
                "reasoning": "Extra buffer"
            }
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_health() {
    let response = app(ScriptedClient::new(vec![]))
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok", "service": "smart-task-planner"}));
}

#[tokio::test]
async fn test_generate_structured_plan() {
    let client = ScriptedClient::new(vec![Ok(format!("Here is your plan:\n```json\n{}\n```", structured_reply()))]);
    let response = app(client.clone())
        .oneshot(post_json(r#"{"goal": "Build a personal website", "team_size": 1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert!(body["plan_id"].as_str().unwrap().starts_with("plan_3_"));
    assert_eq!(body["summary"], "Three clear steps");
    assert_eq!(body["assumptions"], "Weekends only");

    let variants = body["variants"].as_object().unwrap();
    assert_eq!(variants.len(), 3);

    let balanced = body["variants"]["balanced"]["tasks"].as_array().unwrap();
    assert_eq!(balanced.len(), 3);
    assert_eq!(balanced[0]["team_member"], "1");
    assert_eq!(balanced[0]["team_size"], 1);
    assert_eq!(balanced[1]["start"], balanced[0]["end"]);
    assert_eq!(body["variants"]["balanced"]["critical_path"], json!(["t1", "t2", "t3"]));

    assert_eq!(body["variants"]["aggressive"]["tasks"], json!([]));
    assert_eq!(body["variants"]["aggressive"]["reasoning"], "Aggressive approach to the project");
    assert_eq!(body["variants"]["safe"]["reasoning"], "Extra buffer");
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_generate_text_reply_for_team() {
    let client = ScriptedClient::new(vec![Ok("Sorry, I can only answer in prose today.".to_string())]);
    let response = app(client)
        .oneshot(post_json(r#"{"goal": "Launch a mobile app", "team_size": 3, "mode": "aggressive"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["summary"], "AI-generated plan for: Launch a mobile app");
    for kind in ["balanced", "aggressive", "safe"] {
        let tasks = body["variants"][kind]["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 9, "{} should be replaced by specialized subtasks", kind);
        assert_eq!(tasks[0]["title"], "Team Member 1: Design Homepage Layout");
        assert_eq!(tasks[4]["team_member"], "2");
        assert_eq!(tasks[4]["dependencies"], json!(["t2"]));
    }
}

#[tokio::test]
async fn test_null_optional_fields_take_defaults() {
    let client = ScriptedClient::new(vec![Ok("no structure".to_string())]);
    let response = app(client)
        .oneshot(post_json(r#"{"goal": "Learn to juggle", "team_size": null, "mode": null}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let tasks = body["variants"]["balanced"]["tasks"].as_array().unwrap();
    assert!(tasks.iter().all(|t| t["team_member"] == "1" && t["team_size"] == 1));
}

#[tokio::test]
async fn test_missing_goal_is_unprocessable() {
    let client = ScriptedClient::new(vec![]);
    let response = app(client.clone())
        .oneshot(post_json(r#"{"team_size": 2}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("goal"));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_empty_goal_is_unprocessable() {
    let client = ScriptedClient::new(vec![]);
    let response = app(client.clone()).oneshot(post_json(r#"{"goal": "   "}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["detail"], "goal must not be empty");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_invalid_team_size_is_unprocessable() {
    for body in [r#"{"goal": "x", "team_size": 0}"#, r#"{"goal": "x", "team_size": -4}"#] {
        let response = app(ScriptedClient::new(vec![])).oneshot(post_json(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_json(response).await["detail"].as_str().unwrap().contains("team_size"));
    }
}

#[tokio::test]
async fn test_team_size_over_limit_names_service_limit() {
    let client = ScriptedClient::new(vec![]);
    let response = app(client.clone())
        .oneshot(post_json(r#"{"goal": "x", "team_size": 1001}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["detail"],
        "team_size 1001 exceeds the service limit of 1000 members"
    );
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_unprocessable() {
    let response = app(ScriptedClient::new(vec![]))
        .oneshot(post_json(r#"{"goal": "x",,}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(response).await["detail"].is_string());
}

#[tokio::test]
async fn test_model_failure_is_server_error() {
    let client = ScriptedClient::new(vec![Err(503)]);
    let response = app(client).oneshot(post_json(r#"{"goal": "Plan a wedding"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["detail"],
        "LLM error: API error 503: upstream unavailable"
    );
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/generate_plan")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app(ScriptedClient::new(vec![])).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "https://evil.example.com")
        .body(Body::empty())
        .unwrap();

    let response = app(ScriptedClient::new(vec![])).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
