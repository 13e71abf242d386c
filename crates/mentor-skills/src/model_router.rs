//! Model Router: picks the model client for the fallback responder (live Gemini, mock, or none).

use crate::gemini::GeminiClient;
use async_trait::async_trait;
use mentor_core::{CoreConfig, ModelClient, ModelError, GEMINI_API_KEY_ENV};
use std::sync::Arc;

/// Mode for LLM invocation: live (Gemini API when a key is present), mock (deterministic text), or off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LlmMode {
    #[default]
    Live,
    Mock,
    Off,
}

impl LlmMode {
    /// Unknown values fall back to live.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => LlmMode::Mock,
            "off" | "disabled" | "none" => LlmMode::Off,
            "live" | "gemini" => LlmMode::Live,
            other => {
                tracing::warn!(llm_mode = other, "Unknown llm_mode, using live");
                LlmMode::Live
            }
        }
    }
}

/// Mock LLM for local development: answers deterministically from the question in the prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockModel;

impl MockModel {
    fn mock_generate(&self, prompt: &str) -> String {
        let question = prompt
            .split("Вопрос:")
            .nth(1)
            .map(|s| s.lines().next().unwrap_or(s).trim())
            .filter(|s| !s.is_empty())
            .unwrap_or("…");
        let preview = question
            .chars()
            .take(80)
            .chain(if question.chars().count() > 80 { "…" } else { "" }.chars())
            .collect::<String>();
        format!(
            "[Mock LLM] По вопросу «{}» точного ответа в базе знаний нет. Уточните детали у кураторов.",
            preview
        )
    }
}

#[async_trait]
impl ModelClient for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        Ok(self.mock_generate(prompt))
    }
}

/// Builds the model client for `config.llm_mode`. `None` disables the model path: the service
/// keeps running and answers misses from the static fallback list.
pub fn route_model(config: &CoreConfig, api_key: Option<String>) -> Option<Arc<dyn ModelClient>> {
    match LlmMode::parse(&config.llm_mode) {
        LlmMode::Off => {
            tracing::info!("LLM mode is off, model fallback disabled");
            None
        }
        LlmMode::Mock => {
            tracing::info!("LLM mode is mock");
            Some(Arc::new(MockModel))
        }
        LlmMode::Live => {
            let Some(key) = api_key.filter(|k| !k.trim().is_empty()) else {
                tracing::warn!("{} not found in environment. Gemini disabled.", GEMINI_API_KEY_ENV);
                return None;
            };
            match GeminiClient::new(
                key,
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
                config.model_timeout(),
            ) {
                Ok(client) => {
                    tracing::info!(model = client.model(), "Gemini initialized");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Gemini initialization failed");
                    None
                }
            }
        }
    }
}
