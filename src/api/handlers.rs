// src/api/handlers.rs

use axum::extract::{Path, State};
use axum::Json;

use crate::api::{types::*, AppState};
use crate::core::types::{ExecutionResult, TestCategory, TestReport, TestResult, TestSuite};
use crate::core::{catalog, report};
use crate::infra::errors::ServiceError;

/// GET /api/v1 — Service identity banner.
pub async fn root() -> Json<ServiceBanner> {
    Json(ServiceBanner {
        message: "Prompt Bench API".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// GET /api/v1/health — Liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        service: "promptbench".into(),
    })
}

/// GET /api/v1/test-categories — The five fixed categories.
pub async fn test_categories() -> Json<CategoriesResponse> {
    let categories = TestCategory::ALL
        .iter()
        .map(|cat| CategoryInfo {
            value: cat.as_str().into(),
            name: cat.variant_name(),
            description: cat.display_name(),
        })
        .collect();
    Json(CategoriesResponse { categories })
}

/// GET /api/v1/predefined-test-cases — Catalog contents for all categories.
pub async fn predefined_test_cases() -> Json<PredefinedCasesResponse> {
    Json(PredefinedCasesResponse {
        test_cases: catalog::all(),
    })
}

/// POST /api/v1/execute-tests — Run a batch of test cases.
pub async fn execute_tests(
    State(state): State<AppState>,
    Json(request): Json<crate::core::types::ExecutionRequest>,
) -> Result<Json<ExecutionResult>, ServiceError> {
    if request.api_key.trim().is_empty() {
        return Err(ServiceError::Validation("API key is required".into()));
    }
    if request.test_cases.is_empty() {
        return Err(ServiceError::Validation(
            "At least one test case is required".into(),
        ));
    }

    tracing::info!("Executing {} test cases", request.test_cases.len());
    let result = state.orchestrator.execute(request).await?;
    Ok(Json(result))
}

/// POST /api/v1/quick-test — One ad-hoc test against a page.
pub async fn quick_test(
    State(state): State<AppState>,
    Json(request): Json<QuickTestRequest>,
) -> Result<Json<TestResult>, ServiceError> {
    if request.web_page_url.trim().is_empty() {
        return Err(ServiceError::Validation("Web page URL is required".into()));
    }
    if request.prompt.trim().is_empty() {
        return Err(ServiceError::Validation("Prompt is required".into()));
    }

    let result = state
        .orchestrator
        .quick_test(&request.prompt, &request.web_page_url)
        .await?;
    Ok(Json(result))
}

/// GET /api/v1/executions — All stored executions.
pub async fn list_executions(State(state): State<AppState>) -> Json<ExecutionsResponse> {
    Json(ExecutionsResponse {
        executions: state.store.all().await,
    })
}

/// GET /api/v1/executions/{id} — One execution, 404 if absent.
pub async fn get_execution(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExecutionResult>, ServiceError> {
    state
        .store
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ServiceError::NotFound(format!("Execution {id} not found")))
}

/// GET /api/v1/executions/{id}/report — Derived report, 404 if absent.
pub async fn execution_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TestReport>, ServiceError> {
    let report = report::report(&state.store, &id).await?;
    Ok(Json(report))
}

/// POST /api/v1/generate-test-suite — Build a suite across categories.
pub async fn generate_test_suite(
    State(state): State<AppState>,
    Json(request): Json<GenerateSuiteRequest>,
) -> Result<Json<TestSuite>, ServiceError> {
    let mut categories = Vec::with_capacity(request.categories.len());
    for name in &request.categories {
        let cat = TestCategory::parse(name).ok_or_else(|| {
            let valid: Vec<&str> = TestCategory::ALL.iter().map(|c| c.as_str()).collect();
            ServiceError::Validation(format!(
                "Invalid category: {name}. Valid categories: {valid:?}"
            ))
        })?;
        categories.push(cat);
    }

    let suite = state
        .orchestrator
        .generate_suite(&categories, request.cases_per_category)
        .await?;
    Ok(Json(suite))
}

/// GET /api/v1/stats — Aggregate counters across all stored executions.
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let executions = state.store.all().await;

    let total_executions = executions.len();
    let total_tests: usize = executions.iter().map(|e| e.total_tests).sum();
    let total_passed: usize = executions.iter().map(|e| e.passed_tests).sum();
    let total_failed: usize = executions.iter().map(|e| e.failed_tests).sum();

    let average_success_rate = if total_tests > 0 {
        total_passed as f64 / total_tests as f64 * 100.0
    } else {
        0.0
    };
    let average_execution_time = if total_executions > 0 {
        executions.iter().map(|e| e.execution_time).sum::<f64>() / total_executions as f64
    } else {
        0.0
    };

    Json(StatsResponse {
        total_executions,
        total_tests,
        total_passed,
        total_failed,
        average_success_rate: round2(average_success_rate),
        average_execution_time: round2(average_execution_time),
        system_status: "operational".into(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
