// src/core/invoker.rs — Remote prompt invocation
//
// Wraps the one external dependency. Every failure mode (transport, auth,
// provider error, timeout) comes back as a typed error with elapsed time
// attached; nothing here panics or escapes past the orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::types::{TestCase, TestCategory};
use crate::provider::{ChatRequest, Message, ModelProvider, TokenUsage};

/// System instruction per category. Static data, not dispatch.
pub fn system_instruction(category: TestCategory) -> &'static str {
    match category {
        TestCategory::PromptUnderstanding => {
            "You are a helpful AI assistant. Respond naturally to user queries."
        }
        TestCategory::ResponseAccuracy => {
            "You are a helpful AI assistant. Provide accurate and relevant information."
        }
        TestCategory::FallbackHandling => {
            "You are a helpful AI assistant. If you don't know something, say so politely."
        }
        TestCategory::TaskExecution => {
            "You are a helpful AI assistant. Execute tasks as requested."
        }
        TestCategory::Performance => {
            "You are a helpful AI assistant. Provide concise and efficient responses."
        }
    }
}

/// A successful round trip: generated text plus usage, with timing.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub text: String,
    pub usage: Option<TokenUsage>,
    /// Wall-clock seconds around the call.
    pub elapsed: f64,
}

/// A failed round trip, still carrying how long it took.
#[derive(Debug, Clone)]
pub struct InvokeError {
    pub detail: String,
    pub elapsed: f64,
}

/// Sends one prompt at a time to a model provider.
pub struct Invoker {
    provider: Arc<dyn ModelProvider>,
    model: String,
}

impl Invoker {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one case's prompt against the model. The case's timeout bounds
    /// the whole round trip; elapsed time is measured regardless of outcome.
    pub async fn invoke(&self, case: &TestCase) -> Result<Invocation, InvokeError> {
        let request = ChatRequest {
            model: self.model.clone(),
            system: Some(system_instruction(case.category).to_string()),
            messages: vec![Message::user(&case.prompt)],
        };

        let started = Instant::now();
        let outcome =
            tokio::time::timeout(Duration::from_secs(case.timeout), self.provider.chat(request))
                .await;
        let elapsed = started.elapsed().as_secs_f64();

        match outcome {
            Ok(Ok(response)) => Ok(Invocation {
                text: response.content,
                usage: response.usage,
                elapsed,
            }),
            Ok(Err(e)) => Err(InvokeError {
                detail: e.to_string(),
                elapsed,
            }),
            Err(_) => Err(InvokeError {
                detail: format!("Provider call timed out after {}s", case.timeout),
                elapsed,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::errors::ServiceError;
    use crate::provider::ChatResponse;
    use async_trait::async_trait;

    struct CannedProvider(String);

    #[async_trait]
    impl ModelProvider for CannedProvider {
        fn id(&self) -> &str {
            "canned"
        }
        fn name(&self) -> &str {
            "Canned"
        }
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ServiceError> {
            Ok(ChatResponse {
                content: self.0.clone(),
                usage: Some(TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                }),
            })
        }
    }

    struct StuckProvider;

    #[async_trait]
    impl ModelProvider for StuckProvider {
        fn id(&self) -> &str {
            "stuck"
        }
        fn name(&self) -> &str {
            "Stuck"
        }
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ServiceError> {
            std::future::pending().await
        }
    }

    fn case(category: TestCategory, timeout: u64) -> TestCase {
        let mut c = TestCase::new("hello", None, "greeting", category);
        c.timeout = timeout;
        c
    }

    #[test]
    fn instruction_varies_by_category() {
        let all: Vec<&str> = TestCategory::ALL
            .iter()
            .map(|c| system_instruction(*c))
            .collect();
        for instruction in &all {
            assert!(instruction.starts_with("You are a helpful AI assistant."));
        }
        assert!(system_instruction(TestCategory::FallbackHandling).contains("say so politely"));
    }

    #[tokio::test]
    async fn invoke_returns_text_usage_and_timing() {
        let invoker = Invoker::new(Arc::new(CannedProvider("hi there".into())), "m");
        let inv = invoker
            .invoke(&case(TestCategory::PromptUnderstanding, 30))
            .await
            .unwrap();
        assert_eq!(inv.text, "hi there");
        assert_eq!(inv.usage.unwrap().total(), 15);
        assert!(inv.elapsed >= 0.0);
    }

    #[tokio::test]
    async fn invoke_enforces_case_timeout() {
        let invoker = Invoker::new(Arc::new(StuckProvider), "m");
        let err = invoker
            .invoke(&case(TestCategory::Performance, 0))
            .await
            .unwrap_err();
        assert!(err.detail.contains("timed out"));
    }
}
