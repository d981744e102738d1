// src/core/evaluator.rs — Heuristic response evaluation
//
// Pure string-containment logic, no I/O. Precedence is fixed:
// empty response > expected-pattern check > fallback heuristic > default pass.

use crate::core::types::{TestCase, TestCategory, TestStatus};

/// Phrases that indicate the model gracefully declined to answer.
const FALLBACK_INDICATORS: [&str; 5] = [
    "i don't know",
    "i'm not sure",
    "i can't",
    "i don't have",
    "unable to",
];

/// Closed set of reasons an evaluation can come out non-passing.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalFailure {
    EmptyResponse,
    PatternMismatch,
    NoFallbackDetected,
    /// The provider call itself failed; the detail is the transport/auth error.
    ProviderFailure(String),
    /// The evaluator itself misbehaved.
    EvaluationFault(String),
}

impl EvalFailure {
    /// Human-readable message stored on the TestResult.
    pub fn message(&self) -> String {
        match self {
            EvalFailure::EmptyResponse => "Empty response".to_string(),
            EvalFailure::PatternMismatch => {
                "Response doesn't match expected pattern".to_string()
            }
            EvalFailure::NoFallbackDetected => "No fallback handling detected".to_string(),
            EvalFailure::ProviderFailure(detail) => detail.clone(),
            EvalFailure::EvaluationFault(detail) => format!("Evaluation error: {detail}"),
        }
    }
}

/// Result of evaluating one (case, response) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub status: TestStatus,
    pub accuracy_score: f64,
    pub failure: Option<EvalFailure>,
}

impl Verdict {
    fn passed(score: f64) -> Self {
        Self {
            status: TestStatus::Passed,
            accuracy_score: score,
            failure: None,
        }
    }

    fn failed(score: f64, failure: EvalFailure) -> Self {
        Self {
            status: TestStatus::Failed,
            accuracy_score: score,
            failure: Some(failure),
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.failure.as_ref().map(EvalFailure::message)
    }
}

/// Evaluate a model response against a test case. Deterministic and idempotent.
pub fn evaluate(case: &TestCase, actual_response: &str) -> Verdict {
    if actual_response.trim().is_empty() {
        return Verdict::failed(0.0, EvalFailure::EmptyResponse);
    }

    let lowered = actual_response.to_lowercase();

    if let Some(expected) = &case.expected_response {
        return if lowered.contains(&expected.to_lowercase()) {
            Verdict::passed(1.0)
        } else {
            Verdict::failed(0.0, EvalFailure::PatternMismatch)
        };
    }

    if case.category == TestCategory::FallbackHandling {
        return if FALLBACK_INDICATORS.iter().any(|ind| lowered.contains(ind)) {
            Verdict::passed(0.8)
        } else {
            Verdict::failed(0.3, EvalFailure::NoFallbackDetected)
        };
    }

    // Any non-empty response without a declared expectation counts as a pass.
    Verdict::passed(0.7)
}
