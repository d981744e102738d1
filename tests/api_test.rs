// tests/api_test.rs — Integration test: HTTP surface end to end
//
// Exercises the router with no network: executions run through the mock
// path (no credential configured), so every provider concern stays local.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use promptbench::api::{build_router, AppState};
use promptbench::core::orchestrator::Orchestrator;
use promptbench::core::store::ExecutionStore;
use promptbench::core::types::ExecutionResult;
use promptbench::infra::config::Settings;

fn test_state() -> AppState {
    let settings = Arc::new(Settings {
        inter_call_delay: Duration::ZERO,
        ..Settings::default()
    });
    let store = ExecutionStore::new();
    let orchestrator = Arc::new(Orchestrator::with_default_provider(
        settings.clone(),
        store.clone(),
    ));
    AppState {
        settings,
        store,
        orchestrator,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn execute_body() -> serde_json::Value {
    serde_json::json!({
        "test_cases": [
            {"prompt": "What is 2+2?", "expected_response": "4",
             "category": "response_accuracy", "description": "math"},
            {"prompt": "Hello!", "category": "prompt_understanding",
             "description": "greeting"}
        ],
        "api_key": "dummy_key",
        "model": "test-model"
    })
}

#[tokio::test]
async fn banner_and_health() {
    let app = build_router(test_state());

    let resp = app.clone().oneshot(get("/api/v1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["message"], "Prompt Bench API");

    let resp = app.oneshot(get("/api/v1/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "promptbench");
}

#[tokio::test]
async fn categories_lists_all_five() {
    let app = build_router(test_state());
    let resp = app.oneshot(get("/api/v1/test-categories")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 5);
    assert_eq!(categories[0]["value"], "prompt_understanding");
    assert_eq!(categories[0]["name"], "PROMPT_UNDERSTANDING");
    assert_eq!(categories[0]["description"], "Prompt Understanding");
}

#[tokio::test]
async fn predefined_cases_cover_all_categories() {
    let app = build_router(test_state());
    let resp = app
        .oneshot(get("/api/v1/predefined-test-cases"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let cases = body["test_cases"].as_object().unwrap();
    assert_eq!(cases.len(), 5);
    assert_eq!(cases["response_accuracy"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn execute_then_fetch_execution_report_and_stats() {
    let app = build_router(test_state());

    // Execute through the mock path (no credential configured).
    let resp = app
        .clone()
        .oneshot(post_json("/api/v1/execute-tests", execute_body()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let execution: ExecutionResult = serde_json::from_value(json_body(resp).await).unwrap();
    assert_eq!(execution.total_tests, 2);
    assert_eq!(execution.passed_tests, 2);
    assert_eq!(execution.summary.success_rate, 100.0);

    // List endpoint contains it.
    let resp = app.clone().oneshot(get("/api/v1/executions")).await.unwrap();
    let body = json_body(resp).await;
    assert_eq!(body["executions"].as_array().unwrap().len(), 1);

    // Direct lookup.
    let uri = format!("/api/v1/executions/{}", execution.execution_id);
    let resp = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Report recomputes the same figures from the result list.
    let uri = format!("/api/v1/executions/{}/report", execution.execution_id);
    let resp = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let report = json_body(resp).await;
    assert_eq!(report["success_rate"], 100.0);
    assert_eq!(report["total_tests"], 2);
    assert_eq!(report["detailed_results"].as_array().unwrap().len(), 2);

    // Stats aggregate across stored executions.
    let resp = app.oneshot(get("/api/v1/stats")).await.unwrap();
    let stats = json_body(resp).await;
    assert_eq!(stats["total_executions"], 1);
    assert_eq!(stats["total_tests"], 2);
    assert_eq!(stats["total_passed"], 2);
    assert_eq!(stats["average_success_rate"], 100.0);
    assert_eq!(stats["system_status"], "operational");
}

#[tokio::test]
async fn execute_tests_requires_key_and_cases() {
    let app = build_router(test_state());

    let mut body = execute_body();
    body["api_key"] = serde_json::json!("");
    let resp = app
        .clone()
        .oneshot(post_json("/api/v1/execute-tests", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({"test_cases": [], "api_key": "dummy_key"});
    let resp = app
        .oneshot(post_json("/api/v1/execute-tests", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["detail"], "At least one test case is required");
}

#[tokio::test]
async fn quick_test_validates_then_runs_mock() {
    let app = build_router(test_state());

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/quick-test",
            serde_json::json!({"prompt": "", "web_page_url": "https://example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/quick-test",
            serde_json::json!({"prompt": "Does it load?", "web_page_url": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .oneshot(post_json(
            "/api/v1/quick-test",
            serde_json::json!({"prompt": "Does it load?", "web_page_url": "https://example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["status"], "passed");
    assert_eq!(body["metadata"]["mock"], true);
}

#[tokio::test]
async fn unknown_execution_is_404_not_500() {
    let app = build_router(test_state());

    let resp = app
        .clone()
        .oneshot(get("/api/v1/executions/no-such-id"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .oneshot(get("/api/v1/executions/no-such-id/report"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = json_body(resp).await;
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("no-such-id"));
}

#[tokio::test]
async fn generate_suite_rejects_unknown_category() {
    let app = build_router(test_state());

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/generate-test-suite",
            serde_json::json!({"categories": ["response_accuracy", "vibes"]}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("vibes"));
    assert!(detail.contains("prompt_understanding"));

    // Valid categories succeed, drawing from the catalog (no key configured).
    let resp = app
        .oneshot(post_json(
            "/api/v1/generate-test-suite",
            serde_json::json!({"categories": ["performance"], "cases_per_category": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["test_cases"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn stats_on_empty_store_are_zeroed() {
    let app = build_router(test_state());
    let resp = app.oneshot(get("/api/v1/stats")).await.unwrap();
    let stats = json_body(resp).await;
    assert_eq!(stats["total_executions"], 0);
    assert_eq!(stats["average_success_rate"], 0.0);
    assert_eq!(stats["system_status"], "operational");
}
