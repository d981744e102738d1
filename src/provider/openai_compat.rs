// src/provider/openai_compat.rs — Generic OpenAI-compatible provider
//
// Used with OpenRouter by default; works against any endpoint that speaks
// the /chat/completions shape (OpenAI, Groq, Together, custom gateways).

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse, ModelProvider, TokenUsage};
use crate::infra::errors::ServiceError;

/// Attribution headers OpenRouter uses for rankings. Harmless elsewhere.
const REFERER: &str = "https://github.com/promptbench/promptbench";
const TITLE: &str = "Prompt Bench";

pub struct OpenAICompatProvider {
    id_str: String,
    name_str: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAICompatProvider {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        api_key: String,
        base_url: String,
    ) -> Self {
        Self {
            id_str: id.into(),
            name_str: name.into(),
            api_key,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Provider pointed at OpenRouter's chat-completions endpoint.
    pub fn openrouter(api_key: String, base_url: String) -> Self {
        Self::new("openrouter", "OpenRouter", api_key, base_url)
    }

    fn provider_err(&self, message: impl Into<String>) -> ServiceError {
        ServiceError::Provider {
            provider: self.id_str.clone(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAICompatProvider {
    fn id(&self) -> &str {
        &self.id_str
    }

    fn name(&self) -> &str {
        &self.name_str
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ServiceError> {
        let messages: Vec<serde_json::Value> = {
            let mut msgs = Vec::new();
            if let Some(system) = &request.system {
                msgs.push(serde_json::json!({"role": "system", "content": system}));
            }
            for m in &request.messages {
                msgs.push(serde_json::json!({
                    "role": m.role.as_str(),
                    "content": m.content,
                }));
            }
            msgs
        };

        let body = serde_json::json!({
            "model": request.model,
            "messages": messages,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.provider_err(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(self.provider_err(format!("HTTP {status}: {error_body}")));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| self.provider_err(e.to_string()))?;

        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();

        // Usage is optional on some gateways.
        let usage = resp["usage"].as_object().map(|_| TokenUsage {
            prompt_tokens: resp["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            completion_tokens: resp["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
        });

        Ok(ChatResponse { content, usage })
    }
}
