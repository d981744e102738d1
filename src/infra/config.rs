// src/infra/config.rs — Environment-sourced settings

use std::time::Duration;

/// Process-wide configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub openrouter_api_key: String,
    pub openai_api_key: String,
    /// Model used when a request doesn't name one, and for quick tests.
    pub default_model: String,
    /// OpenAI-compatible chat-completions base URL.
    pub provider_base_url: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Upper bound on cases per execution request.
    pub max_test_cases: usize,
    /// Default per-case timeout in seconds.
    pub default_timeout: u64,
    /// Pause between sequential provider calls (crude rate-limit guard).
    pub inter_call_delay: Duration,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openrouter_api_key: String::new(),
            openai_api_key: String::new(),
            default_model: "qwen/qwen-2.5-72b-instruct:free".into(),
            provider_base_url: "https://openrouter.ai/api/v1".into(),
            host: "0.0.0.0".into(),
            port: 8000,
            cors_origins: vec![
                "http://localhost:3000".into(),
                "http://localhost:5173".into(),
                "http://127.0.0.1:3000".into(),
                "http://127.0.0.1:5173".into(),
            ],
            max_test_cases: 100,
            default_timeout: 30,
            inter_call_delay: Duration::from_millis(100),
            log_level: "info".into(),
        }
    }
}

impl Settings {
    /// Load settings from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Settings::default();
        Self {
            openrouter_api_key: env_or("OPENROUTER_API_KEY", ""),
            openai_api_key: env_or("OPENAI_API_KEY", ""),
            default_model: env_or("OPENROUTER_MODEL", &defaults.default_model),
            provider_base_url: env_or("OPENROUTER_BASE_URL", &defaults.provider_base_url),
            host: env_or("HOST", &defaults.host),
            port: env_parsed("PORT", defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .ok()
                .map(|v| parse_origins(&v))
                .unwrap_or(defaults.cors_origins),
            max_test_cases: env_parsed("MAX_TEST_CASES", defaults.max_test_cases),
            default_timeout: env_parsed("TEST_TIMEOUT", defaults.default_timeout),
            inter_call_delay: Duration::from_millis(env_parsed("INTER_CALL_DELAY_MS", 100)),
            log_level: env_or("LOG_LEVEL", &defaults.log_level),
        }
    }

    /// The server-side credential used when a request doesn't carry a real one.
    /// OpenRouter takes precedence over OpenAI, matching startup docs.
    pub fn fallback_api_key(&self) -> Option<String> {
        [&self.openrouter_api_key, &self.openai_api_key]
            .into_iter()
            .find(|k| !k.is_empty())
            .cloned()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_sane() {
        let s = Settings::default();
        assert_eq!(s.port, 8000);
        assert_eq!(s.max_test_cases, 100);
        assert_eq!(s.default_timeout, 30);
        assert_eq!(s.inter_call_delay, Duration::from_millis(100));
        assert_eq!(s.cors_origins.len(), 4);
    }

    #[test]
    fn fallback_key_prefers_openrouter() {
        let mut s = Settings::default();
        assert_eq!(s.fallback_api_key(), None);
        s.openai_api_key = "oa".into();
        assert_eq!(s.fallback_api_key().as_deref(), Some("oa"));
        s.openrouter_api_key = "or".into();
        assert_eq!(s.fallback_api_key().as_deref(), Some("or"));
    }

    #[test]
    fn origins_parse_from_comma_list() {
        assert_eq!(
            parse_origins("http://a.example, http://b.example ,"),
            vec!["http://a.example".to_string(), "http://b.example".to_string()]
        );
    }
}
