// src/core/orchestrator.rs — Sequential test execution
//
// Drives a batch of cases through the invoker and evaluator one at a time,
// in input order. Per-case failures become data on the TestResult; only
// structural problems with the request itself are rejected up front.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Deserialize;

use crate::core::catalog;
use crate::core::evaluator::{evaluate, EvalFailure};
use crate::core::invoker::Invoker;
use crate::core::report;
use crate::core::store::ExecutionStore;
use crate::core::types::{
    ExecutionRequest, ExecutionResult, ExecutionSummary, TestCase, TestCategory, TestResult,
    TestStatus, TestSuite,
};
use crate::infra::config::Settings;
use crate::infra::errors::ServiceError;
use crate::provider::openai_compat::OpenAICompatProvider;
use crate::provider::{ChatRequest, Message, ModelProvider};

/// Placeholder text returned when no credential is configured. The service
/// stays demonstrably functional end to end without one.
const MOCK_RESPONSE: &str =
    "This is a mock response for testing purposes. Please configure your API key in settings.";

/// Caller-supplied keys with this value mean "use the server's key".
const PLACEHOLDER_KEY: &str = "dummy_key";

/// Builds a provider for a resolved credential. Injected so tests can
/// substitute a canned provider without touching the network.
pub type ProviderFactory = Arc<dyn Fn(String) -> Arc<dyn ModelProvider> + Send + Sync>;

pub struct Orchestrator {
    settings: Arc<Settings>,
    store: ExecutionStore,
    provider_factory: ProviderFactory,
}

impl Orchestrator {
    pub fn new(settings: Arc<Settings>, store: ExecutionStore, factory: ProviderFactory) -> Self {
        Self {
            settings,
            store,
            provider_factory: factory,
        }
    }

    /// Orchestrator wired to the OpenAI-compatible HTTP provider.
    pub fn with_default_provider(settings: Arc<Settings>, store: ExecutionStore) -> Self {
        let base_url = settings.provider_base_url.clone();
        let factory: ProviderFactory = Arc::new(move |api_key| {
            Arc::new(OpenAICompatProvider::openrouter(api_key, base_url.clone()))
                as Arc<dyn ModelProvider>
        });
        Self::new(settings, store, factory)
    }

    /// Request key wins unless absent or the placeholder; then the
    /// server-configured key, if any.
    fn effective_api_key(&self, supplied: &str) -> Option<String> {
        if !supplied.is_empty() && supplied != PLACEHOLDER_KEY {
            return Some(supplied.to_string());
        }
        self.settings.fallback_api_key()
    }

    /// Run a full batch: strict input order, one case at a time, a short
    /// pause after each call. Stores the result under a fresh execution id.
    pub async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionResult, ServiceError> {
        if request.test_cases.is_empty() {
            return Err(ServiceError::Validation(
                "At least one test case is required".into(),
            ));
        }
        if request.test_cases.len() > self.settings.max_test_cases {
            return Err(ServiceError::Validation(format!(
                "Too many test cases: {} (max {})",
                request.test_cases.len(),
                self.settings.max_test_cases
            )));
        }
        for case in &request.test_cases {
            if case.prompt.trim().is_empty() || case.description.trim().is_empty() {
                return Err(ServiceError::Validation(
                    "Test case prompt and description must be non-empty".into(),
                ));
            }
        }

        let execution_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();

        let invoker = self
            .effective_api_key(&request.api_key)
            .map(|key| Invoker::new((self.provider_factory)(key), request.model.clone()));

        let total = request.test_cases.len();
        let mut results = Vec::with_capacity(total);
        let mut passed_tests = 0usize;
        let mut failed_tests = 0usize;

        for (i, case) in request.test_cases.into_iter().enumerate() {
            let mut case = case;
            tracing::info!(
                "Executing test case {}/{}: {}",
                i + 1,
                total,
                case.description
            );

            if case.id.is_none() {
                case.id = Some(uuid::Uuid::new_v4().to_string());
            }

            let result = match &invoker {
                Some(invoker) => self.run_case(invoker, &case).await,
                None => mock_result(&case, &request.model),
            };

            // Any non-passed status, including error, counts as failed.
            if result.status == TestStatus::Passed {
                passed_tests += 1;
            } else {
                failed_tests += 1;
            }
            results.push(result);

            // Crude rate-limit guard between sequential provider calls.
            tokio::time::sleep(self.settings.inter_call_delay).await;
        }

        let execution_time = started.elapsed().as_secs_f64();
        let success_rate = passed_tests as f64 / total as f64 * 100.0;

        let result = ExecutionResult {
            execution_id: execution_id.clone(),
            total_tests: total,
            passed_tests,
            failed_tests,
            execution_time,
            summary: ExecutionSummary {
                success_rate,
                average_response_time: report::average_response_time(&results),
                category_breakdown: report::category_breakdown(&results),
                model_used: request.model,
            },
            results,
        };

        self.store.insert(result.clone()).await;
        Ok(result)
    }

    /// One invoker round trip plus evaluation, folded into a TestResult.
    async fn run_case(&self, invoker: &Invoker, case: &TestCase) -> TestResult {
        let case_id = case.id.clone().unwrap_or_else(|| "unknown".into());

        match invoker.invoke(case).await {
            Ok(invocation) => {
                let verdict = evaluate(case, &invocation.text);

                let mut metadata = serde_json::Map::new();
                metadata.insert("model".into(), invoker.model().into());
                metadata.insert("category".into(), case.category.as_str().into());
                metadata.insert(
                    "tokens_used".into(),
                    invocation
                        .usage
                        .map(|u| u.total().into())
                        .unwrap_or(serde_json::Value::Null),
                );

                TestResult {
                    id: Some(uuid::Uuid::new_v4().to_string()),
                    test_case_id: case_id,
                    actual_response: invocation.text,
                    status: verdict.status,
                    response_time: invocation.elapsed,
                    accuracy_score: Some(verdict.accuracy_score),
                    error_message: verdict.error_message(),
                    metadata,
                    created_at: Utc::now(),
                }
            }
            Err(err) => {
                tracing::error!("Error testing prompt: {}", err.detail);

                let mut metadata = serde_json::Map::new();
                metadata.insert("model".into(), invoker.model().into());
                metadata.insert("category".into(), case.category.as_str().into());

                TestResult {
                    id: Some(uuid::Uuid::new_v4().to_string()),
                    test_case_id: case_id,
                    actual_response: String::new(),
                    status: TestStatus::Error,
                    response_time: err.elapsed,
                    accuracy_score: None,
                    error_message: Some(EvalFailure::ProviderFailure(err.detail).message()),
                    metadata,
                    created_at: Utc::now(),
                }
            }
        }
    }

    /// Run one synthetic prompt-understanding case. Never stored.
    pub async fn quick_test(
        &self,
        prompt: &str,
        web_page_url: &str,
    ) -> Result<TestResult, ServiceError> {
        let mut case = TestCase::new(
            format!("Web Page: {web_page_url}\n\nTest Prompt: {prompt}"),
            None,
            "Quick test",
            TestCategory::PromptUnderstanding,
        );
        case.id = Some(uuid::Uuid::new_v4().to_string());
        case.timeout = self.settings.default_timeout;

        let model = self.settings.default_model.clone();
        match self.settings.fallback_api_key() {
            Some(key) => {
                let invoker = Invoker::new((self.provider_factory)(key), model);
                Ok(self.run_case(&invoker, &case).await)
            }
            None => Ok(mock_result(&case, &model)),
        }
    }

    /// Build a suite across categories. With a credential, case generation
    /// is delegated to the model and parsed leniently; on any failure the
    /// catalog fills in. Without one, the catalog is used directly.
    pub async fn generate_suite(
        &self,
        categories: &[TestCategory],
        cases_per_category: usize,
    ) -> Result<TestSuite, ServiceError> {
        let mut test_cases = Vec::new();

        let key = self.settings.fallback_api_key();
        for &category in categories {
            let cases = match &key {
                Some(key) => {
                    self.generate_cases(key.clone(), category, cases_per_category)
                        .await
                }
                None => catalog::predefined_up_to(category, cases_per_category),
            };
            test_cases.extend(cases);
        }

        let description = format!(
            "Auto-generated test suite with {} test cases across {} categories",
            test_cases.len(),
            categories.len()
        );

        Ok(TestSuite {
            id: Some(uuid::Uuid::new_v4().to_string()),
            name: format!(
                "Generated Test Suite - {}",
                Utc::now().format("%Y-%m-%d %H:%M")
            ),
            description,
            test_cases,
            created_at: Utc::now(),
        })
    }

    /// Ask the model to propose cases for one category. Best-effort: any
    /// remote or parse failure silently falls back to the catalog.
    async fn generate_cases(
        &self,
        api_key: String,
        category: TestCategory,
        count: usize,
    ) -> Vec<TestCase> {
        let provider = (self.provider_factory)(api_key);
        let request = ChatRequest {
            model: self.settings.default_model.clone(),
            system: Some("You are a test case generator for AI systems.".into()),
            messages: vec![Message::user(generation_prompt(category, count))],
        };

        let content = match provider.chat(request).await {
            Ok(response) => response.content,
            Err(e) => {
                tracing::warn!("Error generating test cases for {category}: {e}");
                return catalog::predefined_up_to(category, count);
            }
        };

        let mut cases = parse_generated_cases(&content, category, self.settings.default_timeout);
        if cases.is_empty() {
            tracing::warn!("Unparseable generation output for {category}, using catalog");
            return catalog::predefined_up_to(category, count);
        }
        cases.truncate(count);
        cases
    }
}

fn mock_result(case: &TestCase, model: &str) -> TestResult {
    let mut metadata = serde_json::Map::new();
    metadata.insert("model".into(), model.into());
    metadata.insert("category".into(), case.category.as_str().into());
    metadata.insert("mock".into(), true.into());

    TestResult {
        id: Some(uuid::Uuid::new_v4().to_string()),
        test_case_id: case.id.clone().unwrap_or_else(|| "unknown".into()),
        actual_response: MOCK_RESPONSE.to_string(),
        status: TestStatus::Passed,
        response_time: 0.1,
        accuracy_score: Some(1.0),
        error_message: None,
        metadata,
        created_at: Utc::now(),
    }
}

fn generation_prompt(category: TestCategory, count: usize) -> String {
    format!(
        "Generate {count} test cases for AI agent testing in the category: {category}\n\
         \n\
         For each test case, provide:\n\
         1. A realistic user prompt\n\
         2. Expected response pattern (optional)\n\
         3. Brief description of what we're testing\n\
         \n\
         Return as a JSON array with format:\n\
         [{{\"prompt\": \"user input\", \"expected_response\": \"expected pattern (optional)\", \
         \"description\": \"what we're testing\"}}]"
    )
}

#[derive(Debug, Deserialize)]
struct GeneratedCase {
    prompt: String,
    #[serde(default)]
    expected_response: Option<String>,
    description: String,
}

/// Lenient parse of model output: tolerates code fences and surrounding
/// prose by extracting the outermost JSON array. Empty on any difficulty.
fn parse_generated_cases(content: &str, category: TestCategory, timeout: u64) -> Vec<TestCase> {
    let start = match content.find('[') {
        Some(i) => i,
        None => return Vec::new(),
    };
    let end = match content.rfind(']') {
        Some(i) if i > start => i,
        _ => return Vec::new(),
    };

    let parsed: Vec<GeneratedCase> = match serde_json::from_str(&content[start..=end]) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    parsed
        .into_iter()
        .filter(|g| !g.prompt.trim().is_empty() && !g.description.trim().is_empty())
        .map(|g| {
            let mut case = TestCase::new(
                g.prompt,
                g.expected_response
                    .as_deref()
                    .filter(|e| !e.trim().is_empty()),
                g.description,
                category,
            );
            case.timeout = timeout;
            case
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_accepts_fenced_json_array() {
        let content = "Here you go:\n```json\n[\
            {\"prompt\": \"What is 3+3?\", \"expected_response\": \"6\", \"description\": \"math\"},\
            {\"prompt\": \"Name a color\", \"description\": \"open question\"}\
            ]\n```\nHope that helps!";
        let cases =
            parse_generated_cases(content, TestCategory::ResponseAccuracy, 30);
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].expected_response.as_deref(), Some("6"));
        assert_eq!(cases[1].expected_response, None);
        assert_eq!(cases[1].category, TestCategory::ResponseAccuracy);
    }

    #[test]
    fn parse_rejects_prose_and_malformed_json() {
        assert!(parse_generated_cases("I cannot do that.", TestCategory::Performance, 30)
            .is_empty());
        assert!(
            parse_generated_cases("[{\"prompt\": }", TestCategory::Performance, 30).is_empty()
        );
    }

    #[test]
    fn parse_drops_cases_with_empty_fields() {
        let content = r#"[
            {"prompt": "", "description": "no prompt"},
            {"prompt": "ok", "description": ""},
            {"prompt": "keep me", "description": "valid", "expected_response": "  "}
        ]"#;
        let cases = parse_generated_cases(content, TestCategory::TaskExecution, 30);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].prompt, "keep me");
        // Blank expected patterns are treated as absent.
        assert_eq!(cases[0].expected_response, None);
    }

    #[test]
    fn generation_prompt_names_the_category() {
        let prompt = generation_prompt(TestCategory::FallbackHandling, 4);
        assert!(prompt.contains("Generate 4 test cases"));
        assert!(prompt.contains("fallback_handling"));
        assert!(prompt.contains("JSON array"));
    }
}
