// src/core/types.rs — Domain model for test cases, results, and executions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The five fixed test categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCategory {
    PromptUnderstanding,
    ResponseAccuracy,
    FallbackHandling,
    TaskExecution,
    Performance,
}

impl TestCategory {
    pub const ALL: [TestCategory; 5] = [
        TestCategory::PromptUnderstanding,
        TestCategory::ResponseAccuracy,
        TestCategory::FallbackHandling,
        TestCategory::TaskExecution,
        TestCategory::Performance,
    ];

    /// Wire name, e.g. `prompt_understanding`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestCategory::PromptUnderstanding => "prompt_understanding",
            TestCategory::ResponseAccuracy => "response_accuracy",
            TestCategory::FallbackHandling => "fallback_handling",
            TestCategory::TaskExecution => "task_execution",
            TestCategory::Performance => "performance",
        }
    }

    /// Uppercase variant name, e.g. `PROMPT_UNDERSTANDING`.
    pub fn variant_name(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// Human-readable name, e.g. `Prompt Understanding`.
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse a wire name back into a category.
    pub fn parse(s: &str) -> Option<Self> {
        TestCategory::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for TestCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal (and one transient) states for a test result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Pending,
    Error,
}

fn default_timeout() -> u64 {
    30
}

fn default_model() -> String {
    "qwen/qwen-2.5-72b-instruct:free".to_string()
}

/// A single prompt to run against the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub id: Option<String>,
    /// The input prompt to test. Must be non-empty.
    pub prompt: String,
    /// Expected response pattern (case-insensitive substring), if any.
    #[serde(default)]
    pub expected_response: Option<String>,
    pub category: TestCategory,
    /// What this case is testing. Must be non-empty.
    pub description: String,
    /// Per-case timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl TestCase {
    pub fn new(
        prompt: impl Into<String>,
        expected_response: Option<&str>,
        description: impl Into<String>,
        category: TestCategory,
    ) -> Self {
        Self {
            id: None,
            prompt: prompt.into(),
            expected_response: expected_response.map(str::to_string),
            category,
            description: description.into(),
            timeout: default_timeout(),
            created_at: Utc::now(),
        }
    }
}

/// Outcome of running one test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    #[serde(default)]
    pub id: Option<String>,
    pub test_case_id: String,
    /// The model's actual output. Empty on invocation failure.
    pub actual_response: String,
    pub status: TestStatus,
    /// Wall-clock seconds for the provider round trip.
    pub response_time: f64,
    /// Heuristic score in [0, 1]. Set whenever the case was evaluated.
    pub accuracy_score: Option<f64>,
    pub error_message: Option<String>,
    /// Model name, category tag, token usage, mock flag.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A named, ordered collection of test cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuite {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Request body for a batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    #[serde(default)]
    pub test_suite_id: Option<String>,
    /// Cases to run, in order. Must be non-empty.
    pub test_cases: Vec<TestCase>,
    /// Caller-supplied credential. `"dummy_key"` or empty means
    /// "use the server-configured key, or run in mock mode".
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

/// Aggregate figures computed at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSummary {
    /// Percentage of passed cases over all cases.
    pub success_rate: f64,
    pub average_response_time: f64,
    pub category_breakdown: HashMap<String, usize>,
    pub model_used: String,
}

/// The stored record of one batch execution. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub execution_id: String,
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    /// Per-case results, in the same order as the input cases.
    pub results: Vec<TestResult>,
    /// Total wall-clock seconds for the whole batch.
    pub execution_time: f64,
    pub summary: ExecutionSummary,
}

/// Derived, read-only view over a stored execution. Never stored itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    pub execution_id: String,
    pub test_suite_name: String,
    pub execution_date: DateTime<Utc>,
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    pub success_rate: f64,
    pub average_response_time: f64,
    pub category_breakdown: HashMap<String, usize>,
    pub detailed_results: Vec<TestResult>,
}
