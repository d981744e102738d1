// src/core/catalog.rs — Built-in test cases, three per category
//
// Serves as the fallback when AI-assisted generation is unavailable or
// fails, and as the source for the catalog-listing endpoint.

use std::collections::BTreeMap;

use crate::core::types::{TestCase, TestCategory};

/// All predefined cases for one category, in authoring order.
pub fn predefined(category: TestCategory) -> Vec<TestCase> {
    let specs: &[(&str, Option<&str>, &str)] = match category {
        TestCategory::PromptUnderstanding => &[
            ("Hello, how are you?", None, "Basic greeting understanding"),
            ("What's the weather like?", None, "Ambiguous query handling"),
            (
                "Can you help me with my homework?",
                None,
                "Request for assistance",
            ),
        ],
        TestCategory::ResponseAccuracy => &[
            ("What is 2+2?", Some("4"), "Basic math accuracy"),
            (
                "Who is the current president of the United States?",
                None,
                "Factual information accuracy",
            ),
            (
                "What is the capital of France?",
                Some("Paris"),
                "Geographic knowledge",
            ),
        ],
        TestCategory::FallbackHandling => &[
            (
                "What is the meaning of life?",
                None,
                "Philosophical question handling",
            ),
            (
                "Tell me about the future",
                None,
                "Speculative question handling",
            ),
            (
                "What's the secret to eternal youth?",
                None,
                "Impossible question handling",
            ),
        ],
        TestCategory::TaskExecution => &[
            (
                "Write a short poem about cats",
                None,
                "Creative task execution",
            ),
            (
                "Explain quantum physics in simple terms",
                None,
                "Complex topic explanation",
            ),
            (
                "Give me a recipe for chocolate chip cookies",
                None,
                "Instruction provision",
            ),
        ],
        TestCategory::Performance => &[
            (
                "Summarize the benefits of exercise",
                None,
                "Concise summarization",
            ),
            (
                "List 5 ways to save money",
                None,
                "Structured response generation",
            ),
            (
                "Explain photosynthesis in one sentence",
                None,
                "Brevity requirement",
            ),
        ],
    };

    specs
        .iter()
        .map(|(prompt, expected, description)| {
            TestCase::new(*prompt, *expected, *description, category)
        })
        .collect()
}

/// First `count` predefined cases for one category.
pub fn predefined_up_to(category: TestCategory, count: usize) -> Vec<TestCase> {
    let mut cases = predefined(category);
    cases.truncate(count);
    cases
}

/// The full catalog keyed by category wire name.
pub fn all() -> BTreeMap<String, Vec<TestCase>> {
    TestCategory::ALL
        .iter()
        .map(|cat| (cat.as_str().to_string(), predefined(*cat)))
        .collect()
}
