// src/api/types.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{ExecutionResult, TestCase};

/// Service identity banner.
#[derive(Debug, Serialize)]
pub struct ServiceBanner {
    pub message: String,
    pub version: String,
}

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// One entry in the category listing.
#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub value: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Serialize)]
pub struct PredefinedCasesResponse {
    pub test_cases: BTreeMap<String, Vec<TestCase>>,
}

/// Request body for a quick single test.
#[derive(Debug, Clone, Deserialize)]
pub struct QuickTestRequest {
    pub prompt: String,
    pub web_page_url: String,
}

fn default_cases_per_category() -> usize {
    5
}

/// Request body for suite generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateSuiteRequest {
    pub categories: Vec<String>,
    #[serde(default = "default_cases_per_category")]
    pub cases_per_category: usize,
}

#[derive(Debug, Serialize)]
pub struct ExecutionsResponse {
    pub executions: Vec<ExecutionResult>,
}

/// Aggregate counters across all stored executions.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_executions: usize,
    pub total_tests: usize,
    pub total_passed: usize,
    pub total_failed: usize,
    pub average_success_rate: f64,
    pub average_execution_time: f64,
    pub system_status: String,
}
